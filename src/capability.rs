//! The seam between the analysis pipeline and the multimodal backend.

use async_trait::async_trait;
use thiserror::Error;

use crate::image::DrawingImage;

/// Failure reported by a vision backend.
///
/// A reply fragment read before the failure may survive in
/// `partial_reply`; the pipeline runs its salvage pass over it instead of
/// discarding it.
#[derive(Debug, Error)]
#[error("vision model call failed: {message}")]
pub struct VisionError {
    message: String,
    partial_reply: Option<String>,
}

impl VisionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            partial_reply: None,
        }
    }

    /// Attach reply text that was recovered before the failure.
    pub fn with_partial_reply(mut self, reply: impl Into<String>) -> Self {
        self.partial_reply = Some(reply.into());
        self
    }

    pub fn partial_reply(&self) -> Option<&str> {
        self.partial_reply.as_deref()
    }
}

impl From<reqwest::Error> for VisionError {
    fn from(err: reqwest::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// The external multimodal capability: given an instruction prompt and an
/// image, return the model's free-text reply.
///
/// Implemented by [`GeminiModel`](crate::GeminiModel) in production and by
/// deterministic stubs in tests. Implementations report transport and API
/// failures through [`VisionError`]; interpreting the reply text is the
/// caller's job.
#[async_trait]
pub trait VisionModel: Send + Sync {
    async fn generate(&self, prompt: &str, image: &DrawingImage) -> Result<String, VisionError>;
}
