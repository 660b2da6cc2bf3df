use jiff::Timestamp;
use serde_json::json;
use vigil_core::error::CoreError;
use vigil_core::models::decision::{Action, DecisionKind, FailReason};
use vigil_core::models::evaluation::Rating;
use vigil_core::models::facts::{FACTS_SCHEMA_VERSION, Facts, FactsStatus};
use vigil_core::models::judgment::FactualJudgment;
use vigil_core::models::record::MeasurementRecord;
use vigil_core::models::retry::{RetryOutcome, RetryState};

#[test]
fn record_accepts_preprocessor_field_names_and_mixed_types() {
    let record: MeasurementRecord = serde_json::from_value(json!({
        "questionnaire": " PHQ-9 ",
        "timepoints": "2",
        "date": "2024-03-01",
        "raw_total": "14",
        "severity": "moderate",
        "clinical_flags": "PHQ-9 ≥10 (moderate depression)",
        "derived": {"total_score": 14}
    }))
    .expect("record parses");

    assert_eq!(record.instrument, "PHQ-9");
    assert_eq!(record.timepoint, Some(2.0));
    assert_eq!(record.raw_score, Some(14.0));
    assert_eq!(record.severity_label.as_deref(), Some("moderate"));
    assert_eq!(record.clinical_flags.len(), 1);
    assert_eq!(record.derived_fields["total_score"], json!(14));
    assert_eq!(
        record.date_value(),
        Some(jiff::civil::date(2024, 3, 1))
    );
}

#[test]
fn record_tolerates_blank_and_malformed_values() {
    let record: MeasurementRecord = serde_json::from_value(json!({
        "instrument": "GAD-7",
        "timepoint": null,
        "date": "",
        "raw_score": "n/a",
        "severity_label": "   ",
        "clinical_flags": null,
        "derived_fields": "oops"
    }))
    .expect("record parses");

    assert_eq!(record.timepoint, None);
    assert_eq!(record.date, None);
    assert_eq!(record.raw_score, None);
    assert_eq!(record.severity_label, None);
    assert!(record.clinical_flags.is_empty());
    assert!(record.derived_fields.is_empty());
}

#[test]
fn rating_bands() {
    assert_eq!(Rating::from_score(4.5), Rating::A);
    assert_eq!(Rating::from_score(4.49), Rating::B);
    assert_eq!(Rating::from_score(3.5), Rating::B);
    assert_eq!(Rating::from_score(2.5), Rating::C);
    assert_eq!(Rating::from_score(1.5), Rating::D);
    assert_eq!(Rating::from_score(1.49), Rating::F);
    assert_eq!("b".parse::<Rating>(), Ok(Rating::B));
    assert!("E".parse::<Rating>().is_err());
}

#[test]
fn min_sub_score_ignores_missing_and_zero() {
    let judgment: FactualJudgment = serde_json::from_value(json!({
        "pass": "true",
        "alignment_score": 4,
        "trend_accuracy_score": 0,
        "severity_accuracy_score": "3.5",
        "risk_accuracy_score": null
    }))
    .expect("judgment parses");

    assert!(judgment.pass);
    assert_eq!(judgment.min_sub_score(), Some(3.5));
    assert_eq!(FactualJudgment::default().min_sub_score(), None);
}

#[test]
fn decision_vocabulary_serializes_upper_snake() {
    assert_eq!(
        serde_json::to_value(DecisionKind::AdminReview).expect("serialize"),
        json!("ADMIN_REVIEW")
    );
    assert_eq!(
        serde_json::to_value(Action::Escalate).expect("serialize"),
        json!("ESCALATE")
    );
    let reason = FailReason::SafetyScoreBelowMinimum {
        score: 1,
        minimum: 4,
    };
    assert_eq!(
        serde_json::to_value(&reason).expect("serialize"),
        json!({"code": "safety_score_below_minimum", "score": 1, "minimum": 4})
    );
    assert_eq!(reason.to_string(), "safety score 1 below 4");
}

#[test]
fn escalated_outcome_persists_terminal_state() {
    let outcome = RetryOutcome::Escalated {
        attempts: 3,
        reason: "max retries exceeded".to_string(),
        prior_fail_reasons: vec![FailReason::SafetyOverride],
    };
    assert_eq!(
        outcome.next_state(),
        RetryState::Escalated {
            attempts: 3,
            reason: "max retries exceeded".to_string()
        }
    );
    assert_eq!(RetryState::default(), RetryState::Attempting { attempt: 0 });
}

#[test]
fn facts_reject_other_schema_versions() {
    let facts = Facts::no_data(Timestamp::UNIX_EPOCH, 4);
    assert_eq!(facts.status, FactsStatus::NoData);
    assert_eq!(facts.metadata.unrecognized_records, 4);

    let mut value = serde_json::to_value(&facts).expect("serialize");
    let parsed = Facts::from_value(value.clone()).expect("current version loads");
    assert_eq!(parsed, facts);

    value["metadata"]["schema_version"] = json!(FACTS_SCHEMA_VERSION + 1);
    assert!(matches!(
        Facts::from_value(value),
        Err(CoreError::UnsupportedSchema { found: 2, expected: 1 })
    ));

    assert!(matches!(
        Facts::from_value(json!({"domains": {}})),
        Err(CoreError::MissingField(_))
    ));
}
