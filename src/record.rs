use serde::{Deserialize, Serialize};

/// One interpreted item recovered from a model reply.
///
/// `expr` is a human-readable description of what was recognized and
/// `result` the computed or described outcome. `kind` travels as `type` on
/// the wire; the model is asked to tag items as `math`, `shape`, `graph` or
/// `drawing`, and the crate itself emits `error` for the terminal fallback
/// record, but unknown tags pass through coercion untouched. `assign` is
/// reserved for variable-assignment replies and is always `false` today.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub expr: String,
    pub result: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub assign: bool,
}

impl AnalysisRecord {
    /// Tag applied when a reply element carries no `type` key.
    pub const DEFAULT_KIND: &'static str = "math";

    pub fn new(
        expr: impl Into<String>,
        result: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            expr: expr.into(),
            result: result.into(),
            kind: kind.into(),
            assign: false,
        }
    }

    /// Terminal record returned when nothing could be recovered from a
    /// reply. The one guaranteed output of the normalizer.
    pub fn fallback() -> Self {
        Self::new("Error processing expression", "Invalid input", "error")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_the_wire_field_names() {
        let json = serde_json::to_string(&AnalysisRecord::new("2+2", "4", "math")).unwrap();
        assert_eq!(
            json,
            r#"{"expr":"2+2","result":"4","type":"math","assign":false}"#
        );
    }

    #[test]
    fn deserializes_without_an_assign_field() {
        let record: AnalysisRecord =
            serde_json::from_str(r#"{"expr":"x","result":"1","type":"math"}"#).unwrap();
        assert!(!record.assign);
    }

    #[test]
    fn fallback_record_is_tagged_as_error() {
        let record = AnalysisRecord::fallback();
        assert_eq!(record.kind, "error");
        assert_eq!(record.result, "Invalid input");
        assert!(!record.assign);
    }
}
