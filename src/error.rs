use thiserror::Error;

use crate::capability::VisionError;

/// Everything that can interrupt the analysis pipeline.
///
/// Only [`Serialization`](AnalysisError::Serialization) ever reaches callers
/// of [`analyze_drawing`](crate::analyze_drawing); the other variants are
/// absorbed by the salvage pass and reported as records instead. They stay
/// public so callers that drive [`parse_records`](crate::normalize::parse_records)
/// or a [`VisionModel`](crate::VisionModel) by hand can tell the failures
/// apart.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The variable bindings could not be rendered into the prompt.
    #[error("variable bindings are not serializable: {0}")]
    Serialization(#[from] serde_json::Error),

    /// No parse strategy accepted the cleaned reply. Carries the message
    /// from the strict JSON attempt, the first strategy to reject the text.
    #[error("could not parse model reply: {0}")]
    Parse(String),

    /// The reply parsed, but no element carried both `expr` and `result`.
    #[error("model reply contained no usable records")]
    EmptyResult,

    /// The vision backend call itself failed.
    #[error(transparent)]
    Vision(#[from] VisionError),
}
