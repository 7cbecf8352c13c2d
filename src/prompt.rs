//! The instruction set sent with every drawing.
//!
//! Everything here is static except the caller's variable bindings, which
//! are serialized into the text so the model substitutes known values when
//! it recognizes a variable name. The reply format the prompt demands is
//! what [`normalize_reply`](crate::normalize_reply) expects on the way
//! back; edit both together.

use serde::Serialize;

use crate::error::AnalysisError;

/// Classification and calculation rules, up to the variable bindings slot.
const PROMPT_RULES: &str = r#"You are an advanced calculator and drawing analyzer that processes handwritten mathematical expressions, drawn shapes and diagrams, and identifies the purpose of colors used.
Given an image containing handwritten content and drawings:
1. First, identify the type of input and analyze any colors used:
   a) Mathematical expressions (equations, arithmetic)
   b) Geometric shapes (circles, rectangles, triangles)
   c) Diagrams or graphs
   d) Drawings or illustrations
2. For any colors used in the drawing:
   - Identify the purpose of each distinct color (example: blue for sky, green for trees, yellow for sun)
   - Include this in the 'color_usage' field of the response
3. For mathematical expressions:
   - Identify and analyze each separate expression
   - Consider expressions separate if on different lines or spatially distinct
   - Transcribe numbers, operators (+, -, x, ÷, ^), parentheses
   - Solve using PEMDAS rules
4. For geometric shapes:
   - Identify the shape type (circle, rectangle, triangle, etc.)
   - Calculate relevant measurements (area, perimeter, volume if 3D)
   - If dimensions are marked, use them in calculations
   - For unlabeled shapes, provide formulas with variables
5. For diagrams and graphs:
   - Identify the type (function graph, data plot, etc.)
   - Extract key points or relationships
   - Calculate slopes, intersections, or other relevant values
6. Return ALL results in this exact format:
   [{'expr': 'input description', 'result': 'calculated result', 'type': 'math/shape/graph/drawing'}]
Examples:
- Math: {'expr': '2 + 3', 'result': '5', 'type': 'math'}
- Shape: {'expr': 'Circle(radius=5)', 'result': 'Area: 78.54, Circumference: 31.42', 'type': 'shape'}
- Drawing: {'expr': 'Landscape', 'result': 'Natural scene drawing', 'type': 'drawing'}
Important:
- Return each item as a separate object in the array
- Maintain order as they appear (top to bottom, left to right)
- Include units for geometric calculations
- For variables, use these values: "#;

/// Closing instructions, appended after the bindings.
const PROMPT_CODA: &str = "\nIf handwriting is unclear, use mathematical context for interpretation.\nReturn the response as a JSON array of single objects. DO NOT use markdown or pretty printing.";

/// Build the full prompt for one analysis call.
///
/// Fails only when `variables` cannot be serialized to JSON, which happens
/// before any network traffic.
pub fn build_analysis_prompt<V>(variables: &V) -> Result<String, AnalysisError>
where
    V: Serialize + ?Sized,
{
    let bindings = serde_json::to_string(variables)?;
    Ok(format!("{PROMPT_RULES}{bindings}{PROMPT_CODA}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bindings_land_between_rules_and_coda() {
        let prompt = build_analysis_prompt(&json!({"x": 4})).unwrap();
        assert!(prompt.contains(r#"use these values: {"x":4}"#));
        assert!(prompt.ends_with("DO NOT use markdown or pretty printing."));
    }

    #[test]
    fn empty_bindings_serialize_as_an_empty_object() {
        let prompt = build_analysis_prompt(&json!({})).unwrap();
        assert!(prompt.contains("use these values: {}"));
    }
}
