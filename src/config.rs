use std::env;

use tracing::debug;

/// Model the analysis prompt was tuned against.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Settings for the Gemini backend.
///
/// `api_url` overrides the public endpoint base; tests point it at a local
/// mock server and leave it `None` in production.
#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub api_url: Option<String>,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            api_url: None,
        }
    }

    /// Read settings from the environment, loading `.env` first when
    /// present. Returns `None` without `GEMINI_API_KEY`; `GEMINI_MODEL`
    /// and `GEMINI_API_URL` are optional overrides.
    pub fn from_env() -> Option<Self> {
        dotenvy::dotenv().ok();
        let api_key = env::var("GEMINI_API_KEY").ok()?;
        let model = env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let api_url = env::var("GEMINI_API_URL").ok();
        debug!(model = %model, custom_url = api_url.is_some(), "Gemini config loaded");
        Some(Self {
            api_key,
            model,
            api_url,
        })
    }
}
