use jiff::Timestamp;
use serde_json::json;

use vigil_core::models::domain::ClinicalDomain;
use vigil_core::models::record::MeasurementRecord;
use vigil_facts::extract_facts;
use vigil_instruments::registry::standard_registry;
use vigil_narrative::context::{ContextSource, EvaluationContext};
use vigil_narrative::ingest::{FactsInput, classify_facts, locate_narrative, prepare};

fn facts_json() -> serde_json::Value {
    let records = vec![
        MeasurementRecord {
            instrument: "PHQ-9".to_string(),
            timepoint: Some(1.0),
            raw_score: Some(21.0),
            severity_label: Some("severe".to_string()),
            ..MeasurementRecord::default()
        },
        MeasurementRecord {
            instrument: "GAD-7".to_string(),
            timepoint: Some(1.0),
            raw_score: Some(6.0),
            severity_label: Some("mild".to_string()),
            ..MeasurementRecord::default()
        },
    ];
    let facts = extract_facts(&records, standard_registry(), Timestamp::UNIX_EPOCH);
    serde_json::to_value(facts).unwrap()
}

#[test]
fn narrative_is_found_in_known_envelopes() {
    let cases = [
        (json!("Plain text."), "$"),
        (json!({"narrative": "Plain text."}), "narrative"),
        (
            json!({"choices": [{"message": {"role": "assistant", "content": "Plain text."}}]}),
            "choices[0].message.content",
        ),
        (
            json!({"content": [{"type": "text", "text": "Plain text."}]}),
            "content[0].text",
        ),
        (json!([{"json": {"output": "Plain text."}}]), "$[0].json.output"),
    ];
    for (envelope, path) in cases {
        let located = locate_narrative(&envelope).unwrap();
        assert_eq!(located.text, "Plain text.");
        assert_eq!(located.path, path);
    }
}

#[test]
fn blank_or_foreign_envelopes_have_no_narrative() {
    assert!(locate_narrative(&json!("   ")).is_none());
    assert!(locate_narrative(&json!({"status": 200})).is_none());
    assert!(locate_narrative(&json!(null)).is_none());
}

#[test]
fn facts_contract_is_recognized_through_wrappers() {
    let facts = facts_json();
    assert!(matches!(classify_facts(&facts), FactsInput::Facts(_)));
    assert!(matches!(
        classify_facts(&json!([{"json": {"facts": facts.clone()}}])),
        FactsInput::Facts(_)
    ));
}

#[test]
fn wrong_schema_version_is_rejected_with_reason() {
    let mut facts = facts_json();
    facts["metadata"]["schema_version"] = json!(99);
    match classify_facts(&facts) {
        FactsInput::Unrecognized { reason } => assert!(reason.contains("unsupported facts schema version 99")),
        other => panic!("expected unrecognized, got {}", other.shape()),
    }
}

#[test]
fn unknown_shapes_name_their_keys() {
    match classify_facts(&json!({"summary": "x", "patient": 1})) {
        FactsInput::Unrecognized { reason } => {
            assert!(reason.contains("patient"));
            assert!(reason.contains("summary"));
        }
        other => panic!("expected unrecognized, got {}", other.shape()),
    }
}

#[test]
fn legacy_summary_builds_a_context() {
    let legacy = json!({
        "detailed_trends": [
            {
                "questionnaire": "PHQ-9 Depression",
                "questionnaire_key": "phq9",
                "score_analysis": {"trend_direction": "improvement"},
                "severity_analysis": {"latest_severity": "mild"},
                "history": [
                    {"severity": "severe", "clinical_flags": []},
                    {"severity": "mild", "clinical_flags": []}
                ]
            },
            {
                "questionnaire": "GAD-7",
                "questionnaire_key": "gad7",
                "severity_analysis": {"latest_severity": "moderate"},
                "history": [{"severity": "moderate", "clinical_flags": "High risk - review"}]
            },
            {"questionnaire": "Unknown Scale", "questionnaire_key": "unknown", "history": []}
        ]
    });
    let input = classify_facts(&legacy);
    assert_eq!(input.shape(), "legacy_summary");
    let context = input.context(standard_registry()).unwrap();
    assert_eq!(context.source, ContextSource::LegacySummary);
    assert_eq!(
        context.populated,
        vec![ClinicalDomain::Depression, ClinicalDomain::Anxiety]
    );
    assert!(context.historical_severe());
    assert!(context.current_severe());
    assert!(context.low_confidence.is_none());
}

#[test]
fn facts_context_carries_risk_and_confidence() {
    let FactsInput::Facts(facts) = classify_facts(&facts_json()) else {
        panic!("expected facts");
    };
    let context = EvaluationContext::from_facts(&facts);
    assert_eq!(
        context.populated,
        vec![ClinicalDomain::Depression, ClinicalDomain::Anxiety]
    );
    assert!(context.current_severe());
    assert_eq!(context.low_confidence.as_ref().map(Vec::len), Some(2));
}

#[test]
fn missing_narrative_is_diagnosed() {
    let facts = facts_json();
    let err = prepare(Some(&facts), Some(&json!({"status": "ok"})), standard_registry()).unwrap_err();
    let diagnostic = err.diagnostic();
    assert_eq!(diagnostic.reason, "narrative text is missing");
    assert_eq!(diagnostic.facts_shape, "facts");
    assert!(!diagnostic.narrative_found);
    assert_eq!(diagnostic.narrative_keys, vec!["status"]);
}

#[test]
fn missing_everything_is_diagnosed() {
    let err = prepare(None, None, standard_registry()).unwrap_err();
    let diagnostic = err.diagnostic();
    assert_eq!(diagnostic.reason, "facts and narrative text are both missing");
    assert_eq!(diagnostic.facts_shape, "absent");
    assert!(err.to_string().starts_with("missing input:"));
}
