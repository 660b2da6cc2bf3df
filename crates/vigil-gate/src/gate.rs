//! The Decision Gate.
//!
//! A case passes only when every condition holds. The safety override is
//! evaluated independently of the composite score and can fail a case
//! whose every other signal passes.

use jiff::Timestamp;
use tracing::{info, warn};

use vigil_core::models::decision::{
    Action, Decision, DecisionKind, FactualBreakdown, FailReason, GateThresholds,
    HeuristicBreakdown,
};
use vigil_core::models::evaluation::NarrativeEvaluation;
use vigil_core::models::facts::GlobalRiskSummary;
use vigil_core::models::judgment::FactualJudgment;

/// Lowest composite score that may still be regenerated rather than failed.
pub const REGENERATE_MIN_SCORE: f64 = 3.0;
/// More unsupported claims than this sends a failing case to a human.
pub const MAX_UNSUPPORTED_CLAIMS: usize = 2;

/// Severe risk somewhere in the case and no safety cue of any kind in the
/// narrative.
pub fn safety_override(evaluation: &NarrativeEvaluation, risk: &GlobalRiskSummary) -> bool {
    risk.any_severe() && !evaluation.safety_cue_present
}

/// Every failed pass condition, in a fixed order.
pub fn fail_reasons(
    evaluation: &NarrativeEvaluation,
    risk: &GlobalRiskSummary,
    judgment: Option<&FactualJudgment>,
    thresholds: &GateThresholds,
) -> Vec<FailReason> {
    let mut reasons = Vec::new();
    let final_score = &evaluation.final_score;

    match judgment {
        None => reasons.push(FailReason::FactualJudgmentMissing),
        Some(j) if !j.pass => reasons.push(FailReason::FactualJudgmentFailed),
        Some(_) => {}
    }
    if final_score.score < thresholds.heuristic_min_score {
        reasons.push(FailReason::HeuristicScoreBelowMinimum {
            score: final_score.score,
            minimum: thresholds.heuristic_min_score,
        });
    }
    if evaluation.scores.safety < thresholds.heuristic_safety_min {
        reasons.push(FailReason::SafetyScoreBelowMinimum {
            score: evaluation.scores.safety,
            minimum: thresholds.heuristic_safety_min,
        });
    }
    if !thresholds.acceptable_ratings.contains(&final_score.rating) {
        reasons.push(FailReason::RatingNotAcceptable {
            rating: final_score.rating,
        });
    }
    // No sub-scores at all leaves nothing to fall below the minimum.
    let lowest = judgment.and_then(FactualJudgment::min_sub_score);
    if let Some(min) = lowest.filter(|m| *m < thresholds.factual_min_score) {
        reasons.push(FailReason::FactualSubScoreBelowMinimum {
            score: min,
            minimum: thresholds.factual_min_score,
        });
    }
    if safety_override(evaluation, risk) {
        reasons.push(FailReason::SafetyOverride);
    }
    reasons
}

fn categorize(
    reasons: &[FailReason],
    overridden: bool,
    unsupported_claims: usize,
    score: f64,
) -> (DecisionKind, Action) {
    if reasons.is_empty() {
        (DecisionKind::Pass, Action::Publish)
    } else if overridden || unsupported_claims > MAX_UNSUPPORTED_CLAIMS {
        (DecisionKind::AdminReview, Action::Escalate)
    } else if reasons.len() == 1 && score >= REGENERATE_MIN_SCORE {
        (DecisionKind::Regenerate, Action::Retry)
    } else {
        (DecisionKind::Fail, Action::AdminReview)
    }
}

fn factual_breakdown(judgment: Option<&FactualJudgment>) -> FactualBreakdown {
    let j = judgment.cloned().unwrap_or_default();
    FactualBreakdown {
        present: judgment.is_some(),
        pass: j.pass,
        alignment_score: j.alignment_score,
        trend_accuracy_score: j.trend_accuracy_score,
        severity_accuracy_score: j.severity_accuracy_score,
        risk_accuracy_score: j.risk_accuracy_score,
        domain_coverage_score: j.domain_coverage_score,
        min_sub_score: j.min_sub_score(),
        unsupported_claims: j.unsupported_claims.len(),
        missed_critical_info: j.missed_critical_info.len(),
    }
}

/// Decide one attempt. `now` is recorded for audit only.
pub fn decide(
    evaluation: &NarrativeEvaluation,
    risk: &GlobalRiskSummary,
    judgment: Option<&FactualJudgment>,
    thresholds: &GateThresholds,
    attempt: u32,
    now: Timestamp,
) -> Decision {
    let reasons = fail_reasons(evaluation, risk, judgment, thresholds);
    let overridden = safety_override(evaluation, risk);
    let factual = factual_breakdown(judgment);
    let (decision, action) = categorize(
        &reasons,
        overridden,
        factual.unsupported_claims,
        evaluation.final_score.score,
    );

    if overridden {
        warn!(
            current_severe = risk.current_severe,
            historical_severe = risk.historical_severe,
            "safety override: severe risk with no safety cue in narrative"
        );
    }
    info!(
        attempt,
        decision = ?decision,
        action = ?action,
        fail_reasons = reasons.len(),
        score = evaluation.final_score.score,
        rating = %evaluation.final_score.rating,
        "gate decided"
    );

    Decision {
        pass: reasons.is_empty(),
        decision,
        action,
        fail_reasons: reasons,
        safety_override: overridden,
        heuristic: HeuristicBreakdown {
            score: evaluation.final_score.score,
            percentage: evaluation.final_score.percentage,
            rating: evaluation.final_score.rating,
            scores: evaluation.scores,
            safety_cue_present: evaluation.safety_cue_present,
            hard_safety_rule: evaluation.hard_safety_rule,
        },
        factual,
        thresholds: thresholds.clone(),
        attempt,
        timestamp: now,
    }
}
