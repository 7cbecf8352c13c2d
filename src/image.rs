use anyhow::{anyhow, Result};
use base64::Engine as _;

/// An in-memory drawing to analyze: encoded image bytes plus their MIME
/// type. The crate never decodes pixels; bytes travel to the model as-is.
#[derive(Debug, Clone)]
pub struct DrawingImage {
    bytes: Vec<u8>,
    mime_type: String,
}

impl DrawingImage {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }

    /// Accept a browser canvas export of the form
    /// `data:image/jpeg;base64,<payload>`.
    pub fn from_data_url(url: &str) -> Result<Self> {
        let rest = url
            .strip_prefix("data:")
            .ok_or_else(|| anyhow!("not a data URL"))?;
        let (mime_type, payload) = rest
            .split_once(";base64,")
            .ok_or_else(|| anyhow!("data URL is not base64-encoded"))?;
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(payload)
            .map_err(|err| anyhow!("invalid base64 payload: {err}"))?;
        Ok(Self::new(bytes, mime_type))
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Base64 form used for inline transport to the model API.
    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.bytes)
    }
}
