use serde_json::json;

use vigil_gate::judgment::{parse_judgment, parse_judgment_text, strip_fences};

const BODY: &str = r#"{"pass": true, "alignment_score": 4, "trend_accuracy_score": 5, "severity_accuracy_score": 4, "risk_accuracy_score": 3, "domain_coverage_score": 4, "unsupported_claims": [], "missed_critical_info": ["sleep"]}"#;

#[test]
fn fences_are_stripped_with_or_without_language_tag() {
    assert_eq!(strip_fences("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
    assert_eq!(strip_fences("```\n{\"a\": 1}\n```\n"), "{\"a\": 1}");
    assert_eq!(strip_fences("  {\"a\": 1}  "), "{\"a\": 1}");
}

#[test]
fn plain_json_text_parses() {
    let judgment = parse_judgment_text(BODY).unwrap();
    assert!(judgment.pass);
    assert_eq!(judgment.alignment_score, Some(4.0));
    assert_eq!(judgment.min_sub_score(), Some(3.0));
    assert_eq!(judgment.missed_critical_info.len(), 1);
}

#[test]
fn fenced_block_parses() {
    let text = format!("```json\n{BODY}\n```");
    assert!(parse_judgment_text(&text).unwrap().pass);
}

#[test]
fn object_embedded_in_prose_parses() {
    let text = format!("Here is my assessment of the summary.\n\n{BODY}\n\nLet me know if you need more.");
    let judgment = parse_judgment_text(&text).unwrap();
    assert_eq!(judgment.trend_accuracy_score, Some(5.0));
}

#[test]
fn braces_inside_strings_do_not_split_the_object() {
    let text = r#"Result: {"pass": false, "alignment_score": 2, "unsupported_claims": ["claims {improvement} without data"]} done"#;
    let judgment = parse_judgment_text(text).unwrap();
    assert!(!judgment.pass);
    assert_eq!(judgment.unsupported_claims.len(), 1);
}

#[test]
fn wrapped_object_inside_prose_is_unwrapped() {
    let text = r#"Result: {"result": {"pass": true, "alignment_score": 4, "risk_accuracy_score": 3}} end"#;
    let judgment = parse_judgment_text(text).unwrap();
    assert!(judgment.pass);
    assert_eq!(judgment.min_sub_score(), Some(3.0));
}

#[test]
fn envelopes_are_followed() {
    let value = json!([{ "json": { "output": format!("```json\n{BODY}\n```") } }]);
    let judgment = parse_judgment(&value).unwrap();
    assert_eq!(judgment.domain_coverage_score, Some(4.0));
}

#[test]
fn direct_object_with_loose_types() {
    let value = json!({"pass": "yes", "alignment_score": "4", "risk_accuracy_score": null});
    let judgment = parse_judgment(&value).unwrap();
    assert!(judgment.pass);
    assert_eq!(judgment.alignment_score, Some(4.0));
    assert_eq!(judgment.risk_accuracy_score, None);
}

#[test]
fn unrecoverable_output_is_absent() {
    assert!(parse_judgment_text("I could not evaluate this summary.").is_none());
    assert!(parse_judgment_text("{not json at all}").is_none());
    assert!(parse_judgment(&json!({"unrelated": 1})).is_none());
    assert!(parse_judgment(&json!(null)).is_none());
}
