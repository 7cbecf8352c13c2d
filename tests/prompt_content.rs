use std::collections::HashMap;

use serde_json::json;
use sketchcalc::{build_analysis_prompt, AnalysisError};

#[test]
fn prompt_embeds_the_serialized_bindings() {
    let prompt = build_analysis_prompt(&json!({"x": 4, "y": 1.5})).unwrap();
    assert!(prompt.contains(r#"use these values: {"x":4,"y":1.5}"#));
}

#[test]
fn prompt_keeps_the_record_contract() {
    let prompt = build_analysis_prompt(&json!({})).unwrap();
    assert!(prompt.contains("'expr'"));
    assert!(prompt.contains("'result'"));
    assert!(prompt.contains("'type'"));
    assert!(prompt.contains("math/shape/graph/drawing"));
    assert!(prompt.contains("Return each item as a separate object in the array"));
}

#[test]
fn prompt_forbids_markdown_and_pretty_printing() {
    let prompt = build_analysis_prompt(&json!({})).unwrap();
    assert!(prompt.contains("DO NOT use markdown or pretty printing"));
    assert!(prompt.contains("JSON array of single objects"));
}

#[test]
fn prompt_covers_every_input_kind() {
    let prompt = build_analysis_prompt(&json!({})).unwrap();
    for needle in [
        "Mathematical expressions",
        "Geometric shapes",
        "Diagrams or graphs",
        "Drawings or illustrations",
        "color_usage",
        "Solve using PEMDAS rules",
        "top to bottom, left to right",
    ] {
        assert!(prompt.contains(needle), "prompt is missing {needle:?}");
    }
}

#[test]
fn unserializable_bindings_are_rejected() {
    let bindings: HashMap<(i32, i32), i32> = HashMap::from([((0, 0), 1)]);
    let err = build_analysis_prompt(&bindings).unwrap_err();
    assert!(matches!(err, AnalysisError::Serialization(_)));
}
