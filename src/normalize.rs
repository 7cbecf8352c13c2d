//! Reply normalization: the fallback chain that turns whatever text the
//! model produced into [`AnalysisRecord`]s.
//!
//! The model is asked for a bare JSON array, but real replies arrive fenced
//! in markdown, quoted Python-style, sprinkled with smart punctuation, or
//! wrapped in prose. [`normalize_reply`] copes in stages: clean the text,
//! try increasingly forgiving parsers, coerce whatever parsed into records,
//! and when everything fails, salvage a single `{…}` object out of the raw
//! text or emit the terminal error record. The function is total; no input
//! leaves it empty-handed.
//!
//! Cleaning removes every whitespace character before parsing, including
//! whitespace inside string values, so `'2 + 3'` comes back as `"2+3"`.
//! Downstream consumers rely on the stripped form; keep it.

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use tracing::{debug, instrument, trace, warn};

use crate::error::AnalysisError;
use crate::literal::parse_literal;
use crate::record::AnalysisRecord;

/// First `{…}` group with a non-empty body, the salvage candidate.
static BRACE_OBJECT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{[^}]+\}").expect("brace pattern is valid"));

/// Ordered parse strategies. Each gets the cleaned text; the first success
/// wins and later entries never run.
const STRATEGIES: [(&str, fn(&str) -> Result<Value>); 3] = [
    ("strict_json", parse_strict_json),
    ("python_literal", parse_python_literal),
    ("ascii_json", parse_ascii_json),
];

/// Turn a raw model reply into records. Total: every input, including the
/// empty string and binary garbage, produces at least one record.
#[instrument(level = "trace", skip(raw))]
pub fn normalize_reply(raw: &str) -> Vec<AnalysisRecord> {
    match parse_records(raw) {
        Ok(records) => {
            debug!(count = records.len(), "reply normalized");
            records
        }
        Err(err) => {
            warn!(error = %err, "reply rejected by every strategy, salvaging");
            salvage_or_fallback(raw)
        }
    }
}

/// The strict half of the pipeline: clean, parse, coerce, no salvage net.
///
/// Callers that want errors instead of placeholder records use this
/// directly; [`normalize_reply`] is the total wrapper around it.
pub fn parse_records(raw: &str) -> Result<Vec<AnalysisRecord>, AnalysisError> {
    let cleaned = clean_reply_text(raw);
    trace!(cleaned = %cleaned, "cleaned model reply");
    coerce_records(parse_value(&cleaned)?)
}

/// Peel markdown fencing and normalize quoting.
///
/// When the text holds at least one complete ``` pair, only the first
/// fenced block survives, minus a bare `json`/`python` language tag line.
/// Every whitespace character is then removed, string values included, and
/// single quotes become double quotes so Python-styled replies read as
/// JSON.
pub fn clean_reply_text(raw: &str) -> String {
    let mut text = raw;
    if raw.contains("```") {
        let parts: Vec<&str> = raw.split("```").collect();
        if parts.len() >= 3 {
            text = parts[1];
            if let Some((tag, body)) = text.split_once('\n') {
                if matches!(tag.to_lowercase().as_str(), "json" | "python") {
                    text = body;
                }
            }
        }
    }
    let collapsed: String = text.split_whitespace().collect();
    collapsed.replace('\'', "\"")
}

/// Pull the first `{…}` object out of otherwise unusable text, or fall
/// back to the terminal error record. Never fails.
pub fn salvage_or_fallback(raw: &str) -> Vec<AnalysisRecord> {
    match salvage_record(raw) {
        Some(record) => vec![record],
        None => vec![AnalysisRecord::fallback()],
    }
}

fn parse_strict_json(cleaned: &str) -> Result<Value> {
    serde_json::from_str(cleaned).map_err(Into::into)
}

/// The reply may be Python `repr` output. Undo the quote normalization from
/// cleaning and read the text as a literal.
fn parse_python_literal(cleaned: &str) -> Result<Value> {
    parse_literal(&cleaned.replace('"', "'"))
}

/// Last resort before salvage: drop every non-ASCII and control character
/// that slipped through, then try JSON once more. Catches smart quotes and
/// stray escape bytes.
fn parse_ascii_json(cleaned: &str) -> Result<Value> {
    let filtered: String = cleaned
        .chars()
        .filter(|c| c.is_ascii() && !c.is_ascii_control())
        .collect();
    serde_json::from_str(&filtered).map_err(Into::into)
}

fn parse_value(cleaned: &str) -> Result<Value, AnalysisError> {
    let mut first_error = None;
    for (name, strategy) in STRATEGIES {
        match strategy(cleaned) {
            Ok(value) => {
                debug!(strategy = name, "reply parsed");
                return Ok(value);
            }
            Err(err) => {
                trace!(strategy = name, error = %err, "parse strategy rejected reply");
                first_error.get_or_insert(err.to_string());
            }
        }
    }
    // The reported message is the strict JSON one; the later strategies are
    // retries, not the contract.
    Err(AnalysisError::Parse(first_error.unwrap_or_default()))
}

/// Shape whatever parsed into records. A lone object counts as a
/// one-element array. Elements that are not objects, or that lack `expr`
/// or `result`, are dropped; a missing `type` defaults to
/// [`AnalysisRecord::DEFAULT_KIND`].
fn coerce_records(value: Value) -> Result<Vec<AnalysisRecord>, AnalysisError> {
    let items = match value {
        Value::Array(items) => items,
        other => vec![other],
    };
    let mut records = Vec::new();
    for item in items {
        let Value::Object(map) = item else {
            trace!("dropping non-object reply element");
            continue;
        };
        let (Some(expr), Some(result)) = (map.get("expr"), map.get("result")) else {
            trace!("dropping reply element without expr or result");
            continue;
        };
        let kind = map
            .get("type")
            .map(coerce_string)
            .unwrap_or_else(|| AnalysisRecord::DEFAULT_KIND.to_string());
        records.push(AnalysisRecord::new(
            coerce_string(expr),
            coerce_string(result),
            kind,
        ));
    }
    if records.is_empty() {
        return Err(AnalysisError::EmptyResult);
    }
    Ok(records)
}

/// Strings pass through, every other value renders as compact JSON.
fn coerce_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn salvage_record(raw: &str) -> Option<AnalysisRecord> {
    let candidate = BRACE_OBJECT.find(raw)?.as_str();
    // Quotes are normalized but only newlines are stripped here; unlike the
    // main path, spaces inside the matched object survive.
    let candidate = candidate.replace('\'', "\"").replace('\n', "");
    let map: Map<String, Value> = match serde_json::from_str(&candidate) {
        Ok(map) => map,
        Err(err) => {
            debug!(error = %err, "salvage candidate did not parse");
            return None;
        }
    };
    debug!("salvaged one record from an unparseable reply");
    Some(AnalysisRecord::new(
        map.get("expr")
            .map(coerce_string)
            .unwrap_or_else(|| "Expression".to_string()),
        map.get("result").map(coerce_string).unwrap_or_default(),
        map.get("type")
            .map(coerce_string)
            .unwrap_or_else(|| AnalysisRecord::DEFAULT_KIND.to_string()),
    ))
}
