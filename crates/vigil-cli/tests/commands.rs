use jiff::Timestamp;
use serde_json::{Value, json};

use vigil_cli::commands::{run_evaluate, run_facts, run_gate, run_preprocess, run_validate};
use vigil_core::models::decision::DecisionKind;
use vigil_core::models::retry::{RetryOutcome, RetryState};
use vigil_gate::GateConfig;
use vigil_instruments::registry::standard_registry;

fn records() -> Value {
    json!({
        "records": [
            {"instrument": "PHQ-9", "timepoint": 1, "raw_score": 22, "severity_label": "severe"},
            {"instrument": "PHQ-9", "timepoint": 2, "raw_score": 21, "severity_label": "severe"}
        ]
    })
}

fn facts() -> Value {
    let facts = run_facts(records(), standard_registry(), Timestamp::UNIX_EPOCH).unwrap();
    serde_json::to_value(facts).unwrap()
}

#[test]
fn preprocess_accepts_rows_under_a_key() {
    let rows = json!({"rows": [
        {"questionnaire": "GAD-7", "timepoint": 1, "question": "q1", "answer": 2},
        {"questionnaire": "GAD-7", "timepoint": 1, "question": "q2", "answer": 3}
    ]});
    let output = run_preprocess(rows).unwrap();
    assert_eq!(output.records.len(), 1);
    assert_eq!(output.records[0].raw_score, Some(5.0));
    assert!(run_preprocess(json!("rows")).is_err());
}

#[test]
fn validate_reads_record_envelopes() {
    let report = run_validate(records()).unwrap();
    assert_eq!(report.total_items, 2);
    assert!(run_validate(json!(42)).is_err());
}

#[test]
fn evaluate_reports_missing_narrative_with_diagnostic() {
    let err = run_evaluate(&facts(), &json!({"unrelated": true}), standard_registry()).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("narrative text is missing"));
    assert!(message.contains("\"narrative_found\": false"));
}

#[test]
fn gate_without_judgment_regenerates_or_fails_but_decides() {
    let narrative = json!({"output": "Depression scores stayed severe. Please contact your GP or a crisis line today."});
    let run = run_gate(
        &facts(),
        &narrative,
        None,
        0,
        &GateConfig::default(),
        standard_registry(),
        Timestamp::UNIX_EPOCH,
    )
    .unwrap();
    assert!(!run.decision.pass);
    assert!(!run.decision.safety_override);
    assert_ne!(run.decision.decision, DecisionKind::Pass);
    assert!(matches!(run.retry, RetryOutcome::Regenerate { attempt: 1, .. }));
    assert_eq!(run.next_state, RetryState::Attempting { attempt: 1 });
}

#[test]
fn gate_at_budget_escalates() {
    let narrative = Value::String("Depression scores stayed severe.".to_string());
    let run = run_gate(
        &facts(),
        &narrative,
        Some(&Value::String("not a judgment".to_string())),
        3,
        &GateConfig::default(),
        standard_registry(),
        Timestamp::UNIX_EPOCH,
    )
    .unwrap();
    assert!(run.decision.safety_override);
    assert_eq!(run.decision.decision, DecisionKind::AdminReview);
    assert!(matches!(run.retry, RetryOutcome::Escalated { attempts: 3, .. }));
}
