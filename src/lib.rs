//! sketchcalc turns freehand drawings into structured analysis records.
//!
//! A drawing (handwritten math, shapes, diagrams) and a set of known
//! variable bindings go in; a list of typed [`AnalysisRecord`]s comes out.
//! The heavy lifting is delegated to a multimodal model behind the
//! [`VisionModel`] trait. This crate builds the instruction prompt and,
//! more importantly, beats the model's free-text reply back into shape
//! with a chain of increasingly forgiving parsers; see [`normalize`].
//!
//! [`analyze_drawing`] is the front door. Once the prompt is built it
//! cannot fail: backend errors and unparseable replies degrade into
//! placeholder records rather than surfacing, so a canvas frontend always
//! has something to render.
//!
//! One quirk is deliberate: reply cleaning removes every whitespace
//! character before parsing, including whitespace inside `expr` and
//! `result` string values, so `'2 + 3'` comes back as `"2+3"`. Downstream
//! consumers rely on the stripped form; see
//! [`normalize::clean_reply_text`].
//!
//! ```no_run
//! use serde_json::json;
//! use sketchcalc::{analyze_drawing, DrawingImage, GeminiConfig, GeminiModel};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     tracing_subscriber::fmt()
//!         .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
//!         .init();
//!
//!     let config = GeminiConfig::from_env().expect("GEMINI_API_KEY is not set");
//!     let model = GeminiModel::new(&config);
//!     let image = DrawingImage::new(std::fs::read("drawing.png")?, "image/png");
//!
//!     for record in analyze_drawing(&model, &image, &json!({ "x": 4 })).await? {
//!         println!("{} = {} [{}]", record.expr, record.result, record.kind);
//!     }
//!     Ok(())
//! }
//! ```

use serde::Serialize;
use tracing::{instrument, warn};

pub mod capability;
pub mod config;
pub mod error;
pub mod gemini;
pub mod image;
mod literal;
pub mod normalize;
pub mod prompt;
pub mod record;

pub use capability::{VisionError, VisionModel};
pub use config::GeminiConfig;
pub use error::AnalysisError;
pub use gemini::GeminiModel;
pub use image::DrawingImage;
pub use normalize::normalize_reply;
pub use prompt::build_analysis_prompt;
pub use record::AnalysisRecord;

/// Variable bindings in the shape drawing frontends send: a JSON object
/// mapping variable names to values. [`analyze_drawing`] itself accepts
/// any [`Serialize`] value.
pub type VariableBindings = serde_json::Map<String, serde_json::Value>;

/// Analyze one drawing: build the prompt, call the model, normalize the
/// reply.
///
/// The only error callers ever see is
/// [`AnalysisError::Serialization`], raised before the model is called
/// when `variables` cannot be rendered to JSON. A failed backend call is
/// logged and salvaged, running the reply salvage over whatever partial
/// text the error carries, and an unparseable reply degrades the same
/// way, so the success path always yields at least one record.
#[instrument(level = "trace", skip(model, image, variables))]
pub async fn analyze_drawing<M, V>(
    model: &M,
    image: &DrawingImage,
    variables: &V,
) -> Result<Vec<AnalysisRecord>, AnalysisError>
where
    M: VisionModel + ?Sized,
    V: Serialize + ?Sized,
{
    let prompt = prompt::build_analysis_prompt(variables)?;

    let raw = match model.generate(&prompt, image).await {
        Ok(reply) => reply,
        Err(err) => {
            let partial = err.partial_reply().map(str::to_owned);
            let err = AnalysisError::Vision(err);
            warn!(error = %err, "vision model call failed, salvaging partial reply");
            return Ok(normalize::salvage_or_fallback(
                partial.as_deref().unwrap_or_default(),
            ));
        }
    };

    Ok(normalize::normalize_reply(&raw))
}
