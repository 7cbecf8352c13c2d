//! Gemini REST backend for the [`VisionModel`] seam.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace, warn};

use crate::capability::{VisionError, VisionModel};
use crate::config::GeminiConfig;
use crate::image::DrawingImage;

const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text { text: &'a str },
    InlineData { inline_data: InlineData<'a> },
}

#[derive(Serialize)]
struct InlineData<'a> {
    mime_type: &'a str,
    data: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

/// Production [`VisionModel`] backed by the Gemini `generateContent` API.
///
/// The API key travels as the `key` query parameter. No timeout or retry is
/// applied here; callers that need bounded latency wrap the call
/// themselves.
pub struct GeminiModel {
    http: reqwest::Client,
    api_key: String,
    model: String,
    api_url: String,
}

impl GeminiModel {
    pub fn new(config: &GeminiConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            api_url: config
                .api_url
                .clone()
                .unwrap_or_else(|| GEMINI_API_URL.to_string()),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl VisionModel for GeminiModel {
    #[instrument(level = "trace", skip(self, prompt, image))]
    async fn generate(&self, prompt: &str, image: &DrawingImage) -> Result<String, VisionError> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text { text: prompt },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: image.mime_type(),
                            data: image.to_base64(),
                        },
                    },
                ],
            }],
        };

        let url = self.endpoint();
        debug!(url = %url, model = %self.model, "sending generateContent request");

        let resp = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let err_text = resp.text().await.unwrap_or_default();
            warn!(%status, "Gemini API error");
            return Err(VisionError::new(format!(
                "Gemini API error {status}: {err_text}"
            )));
        }

        let raw = resp.text().await?;
        let snippet: String = raw.chars().take(200).collect();
        debug!(snippet = %snippet, "generateContent response body");

        let reply: GenerateResponse = serde_json::from_str(&raw)
            .map_err(|err| VisionError::new(format!("malformed Gemini response: {err}")))?;

        let text: String = reply
            .candidates
            .first()
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .iter()
                    .map(|part| part.text.as_str())
                    .collect()
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(VisionError::new("Gemini returned no candidate text"));
        }

        trace!(reply = %text, "model reply");
        Ok(text)
    }
}
