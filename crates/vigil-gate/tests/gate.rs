use std::collections::BTreeMap;

use jiff::Timestamp;
use serde_json::json;

use vigil_core::models::decision::{Action, DecisionKind, FailReason, GateThresholds};
use vigil_core::models::evaluation::{DimensionScores, FinalScore, NarrativeEvaluation, Rating};
use vigil_core::models::facts::GlobalRiskSummary;
use vigil_core::models::judgment::FactualJudgment;
use vigil_gate::decide;

fn evaluation(score: f64, safety: u8, cue: bool) -> NarrativeEvaluation {
    NarrativeEvaluation {
        word_count: 250,
        domains_mentioned: BTreeMap::new(),
        domain_coverage: 1.0,
        trend_language: true,
        trend_term_count: 1,
        confidence_language: false,
        safety_cue_present: cue,
        professional_contact_present: cue,
        safety_matches: Vec::new(),
        sections_found: Vec::new(),
        action_count: 4,
        empathy_present: true,
        structure_markers: 3,
        hard_safety_rule: false,
        scores: DimensionScores {
            accuracy: 3,
            empathy: 4,
            insight: 4,
            action: 4,
            relevance: 4,
            safety,
            clarity: 4,
            length: 5,
        },
        final_score: FinalScore {
            score,
            percentage: score / 5.0 * 100.0,
            rating: Rating::from_score(score),
        },
    }
}

fn judgment(pass: bool) -> FactualJudgment {
    serde_json::from_value(json!({
        "pass": pass,
        "alignment_score": 4,
        "trend_accuracy_score": 4,
        "severity_accuracy_score": 4,
        "risk_accuracy_score": 5,
        "domain_coverage_score": 4
    }))
    .unwrap()
}

fn no_risk() -> GlobalRiskSummary {
    GlobalRiskSummary::default()
}

fn current_risk() -> GlobalRiskSummary {
    GlobalRiskSummary {
        current_severe: true,
        historical_severe: true,
        ..GlobalRiskSummary::default()
    }
}

fn now() -> Timestamp {
    Timestamp::from_second(1_700_000_000).unwrap()
}

#[test]
fn everything_passing_publishes() {
    let thresholds = GateThresholds::default();
    let decision = decide(&evaluation(4.2, 5, true), &no_risk(), Some(&judgment(true)), &thresholds, 0, now());
    assert!(decision.pass);
    assert_eq!(decision.decision, DecisionKind::Pass);
    assert_eq!(decision.action, Action::Publish);
    assert!(decision.fail_reasons.is_empty());
    assert_eq!(decision.thresholds, thresholds);
    assert_eq!(decision.timestamp, now());
    assert_eq!(decision.factual.min_sub_score, Some(4.0));
}

#[test]
fn single_failure_with_decent_score_regenerates() {
    let decision = decide(
        &evaluation(4.2, 5, true),
        &no_risk(),
        Some(&judgment(false)),
        &GateThresholds::default(),
        1,
        now(),
    );
    assert!(!decision.pass);
    assert_eq!(decision.fail_reasons, vec![FailReason::FactualJudgmentFailed]);
    assert_eq!(decision.decision, DecisionKind::Regenerate);
    assert_eq!(decision.action, Action::Retry);
    assert_eq!(decision.attempt, 1);
}

#[test]
fn single_failure_with_low_score_fails() {
    let thresholds = GateThresholds {
        heuristic_min_score: 2.0,
        acceptable_ratings: vec![Rating::A, Rating::B, Rating::C, Rating::D],
        ..GateThresholds::default()
    };
    let decision = decide(&evaluation(2.8, 5, true), &no_risk(), Some(&judgment(false)), &thresholds, 0, now());
    assert_eq!(decision.fail_reasons.len(), 1);
    assert_eq!(decision.decision, DecisionKind::Fail);
    assert_eq!(decision.action, Action::AdminReview);
}

#[test]
fn several_failures_fail() {
    let decision = decide(
        &evaluation(3.2, 3, true),
        &no_risk(),
        Some(&judgment(true)),
        &GateThresholds::default(),
        0,
        now(),
    );
    assert_eq!(
        decision.fail_reasons,
        vec![
            FailReason::HeuristicScoreBelowMinimum { score: 3.2, minimum: 3.5 },
            FailReason::SafetyScoreBelowMinimum { score: 3, minimum: 4 },
            FailReason::RatingNotAcceptable { rating: Rating::C },
        ]
    );
    assert_eq!(decision.decision, DecisionKind::Fail);
    assert_eq!(decision.action, Action::AdminReview);
}

#[test]
fn lowest_nonzero_sub_score_is_checked() {
    let judgment: FactualJudgment = serde_json::from_value(json!({
        "pass": true,
        "alignment_score": 2,
        "trend_accuracy_score": 0,
        "severity_accuracy_score": 5
    }))
    .unwrap();
    let decision = decide(&evaluation(4.2, 5, true), &no_risk(), Some(&judgment), &GateThresholds::default(), 0, now());
    assert_eq!(
        decision.fail_reasons,
        vec![FailReason::FactualSubScoreBelowMinimum { score: 2.0, minimum: 3.0 }]
    );
    assert_eq!(decision.decision, DecisionKind::Regenerate);
}

#[test]
fn judgment_without_sub_scores_clears_the_sub_score_check() {
    let judgment: FactualJudgment = serde_json::from_value(json!({"pass": true})).unwrap();
    let decision = decide(&evaluation(4.2, 5, true), &no_risk(), Some(&judgment), &GateThresholds::default(), 0, now());
    assert!(decision.pass);
}

#[test]
fn missing_judgment_is_one_failed_condition() {
    let decision = decide(&evaluation(4.2, 5, true), &no_risk(), None, &GateThresholds::default(), 0, now());
    assert_eq!(decision.fail_reasons, vec![FailReason::FactualJudgmentMissing]);
    assert!(!decision.factual.present);
    assert_eq!(decision.decision, DecisionKind::Regenerate);
}

#[test]
fn many_unsupported_claims_escalate() {
    let mut judgment = judgment(false);
    judgment.unsupported_claims = vec![json!("a"), json!("b"), json!("c")];
    let decision = decide(&evaluation(4.2, 5, true), &no_risk(), Some(&judgment), &GateThresholds::default(), 0, now());
    assert_eq!(decision.decision, DecisionKind::AdminReview);
    assert_eq!(decision.action, Action::Escalate);
    assert_eq!(decision.factual.unsupported_claims, 3);
}

#[test]
fn safety_override_beats_a_passing_composite() {
    let decision = decide(&evaluation(4.8, 5, false), &current_risk(), Some(&judgment(true)), &GateThresholds::default(), 0, now());
    assert!(!decision.pass);
    assert!(decision.safety_override);
    assert_eq!(decision.fail_reasons, vec![FailReason::SafetyOverride]);
    assert_eq!(decision.decision, DecisionKind::AdminReview);
    assert_eq!(decision.action, Action::Escalate);
}

#[test]
fn historical_risk_alone_also_needs_a_cue() {
    let risk = GlobalRiskSummary {
        historical_severe: true,
        ..GlobalRiskSummary::default()
    };
    let silent = decide(&evaluation(4.8, 5, false), &risk, Some(&judgment(true)), &GateThresholds::default(), 0, now());
    assert!(silent.safety_override);
    let cued = decide(&evaluation(4.8, 5, true), &risk, Some(&judgment(true)), &GateThresholds::default(), 0, now());
    assert!(!cued.safety_override);
    assert!(cued.pass);
}

#[test]
fn decision_serializes_with_wire_names() {
    let decision = decide(&evaluation(4.8, 5, false), &current_risk(), Some(&judgment(true)), &GateThresholds::default(), 2, now());
    let value = serde_json::to_value(&decision).unwrap();
    assert_eq!(value["decision"], "ADMIN_REVIEW");
    assert_eq!(value["action"], "ESCALATE");
    assert_eq!(value["fail_reasons"][0]["code"], "safety_override");
    assert_eq!(value["attempt"], 2);
    assert_eq!(value["thresholds"]["acceptable_ratings"], json!(["A", "B"]));
}
