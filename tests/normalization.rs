use sketchcalc::normalize::{clean_reply_text, parse_records};
use sketchcalc::{normalize_reply, AnalysisError, AnalysisRecord};

fn record(expr: &str, result: &str, kind: &str) -> AnalysisRecord {
    AnalysisRecord::new(expr, result, kind)
}

#[test]
fn well_formed_arrays_keep_every_valid_record() {
    let reply = r#"[{"expr":"2+3","result":"5","type":"math"},{"expr":"Circle(radius=2)","result":"Area:12.57","type":"shape"}]"#;
    assert_eq!(
        normalize_reply(reply),
        vec![
            record("2+3", "5", "math"),
            record("Circle(radius=2)", "Area:12.57", "shape"),
        ]
    );
}

#[test]
fn fenced_replies_match_their_unfenced_form() {
    let body = r#"[{"expr": "7*6", "result": "42", "type": "math"}]"#;
    let fenced = format!("```json\n{body}\n```");
    assert_eq!(normalize_reply(&fenced), normalize_reply(body));
}

#[test]
fn single_quoted_replies_lose_inner_whitespace() {
    // Cleaning strips whitespace inside string values too; "2 + 3" is
    // intentionally reduced to "2+3".
    let records = normalize_reply("{'expr': '2 + 3', 'result': '5', 'type': 'math'}");
    assert_eq!(records, vec![record("2+3", "5", "math")]);
    assert!(!records[0].assign);
}

#[test]
fn python_constants_pass_through_the_literal_strategy() {
    let reply = "[{'expr': 'check', 'result': True, 'type': None},]";
    assert_eq!(normalize_reply(reply), vec![record("check", "true", "null")]);
}

#[test]
fn smart_quoted_wrapping_passes_the_ascii_retry() {
    let reply = "\u{201c}[{\"expr\":\"1/2\",\"result\":\"0.5\"}]\u{201d}";
    assert_eq!(normalize_reply(reply), vec![record("1/2", "0.5", "math")]);
}

#[test]
fn elements_missing_expr_or_result_are_dropped() {
    let reply = r#"[{"expr":"x^2","result":"x*x"},{"expr":"orphan"},{"result":"orphan"},17]"#;
    assert_eq!(normalize_reply(reply), vec![record("x^2", "x*x", "math")]);
}

#[test]
fn prose_replies_yield_the_error_record() {
    let records = normalize_reply("I could not quite make out the drawing, sorry!");
    assert_eq!(records, vec![AnalysisRecord::fallback()]);
    assert_eq!(records[0].kind, "error");
}

#[test]
fn salvage_recovers_the_first_object_and_keeps_its_spaces() {
    let reply = "The best I can do: {'expr': '9 - 4', 'result': '5'} ... the rest was smudged";
    assert_eq!(normalize_reply(reply), vec![record("9 - 4", "5", "math")]);
}

#[test]
fn apostrophes_inside_values_defeat_every_strategy() {
    let reply = r#"[{"expr": "John's age", "result": "12"}]"#;
    assert_eq!(normalize_reply(reply), vec![AnalysisRecord::fallback()]);
}

#[test]
fn degenerate_inputs_still_produce_a_record() {
    for reply in ["", "\u{0}\u{1}binary\u{7f}", "[[[[[[", "{{{{", "````````"] {
        let records = normalize_reply(reply);
        assert!(!records.is_empty(), "no records for {reply:?}");
    }
}

#[test]
fn deeply_nested_arrays_fail_closed() {
    let bomb = format!("{}1{}", "[".repeat(5000), "]".repeat(5000));
    assert_eq!(normalize_reply(&bomb), vec![AnalysisRecord::fallback()]);
}

#[test]
fn normalization_is_deterministic() {
    let reply = "```json\n[{'expr': 'a', 'result': 'b'}]\n```";
    assert_eq!(normalize_reply(reply), normalize_reply(reply));
}

#[test]
fn parse_records_reports_the_strict_json_error() {
    let err = parse_records("not json at all").unwrap_err();
    match err {
        AnalysisError::Parse(message) => assert!(!message.is_empty()),
        other => panic!("expected Parse, got {other:?}"),
    }
}

#[test]
fn parse_records_flags_replies_with_no_usable_elements() {
    let err = parse_records(r#"["just", "strings"]"#).unwrap_err();
    assert!(matches!(err, AnalysisError::EmptyResult));
}

#[test]
fn cleaning_is_observable_through_the_public_helper() {
    assert_eq!(
        clean_reply_text("```json\n[1, 2]\n```"),
        "[1,2]"
    );
    assert_eq!(clean_reply_text("{'a': 1}"), r#"{"a":1}"#);
}
