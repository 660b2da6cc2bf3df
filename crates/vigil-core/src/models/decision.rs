use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::evaluation::{DimensionScores, Rating};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum DecisionKind {
    Pass,
    Regenerate,
    AdminReview,
    Fail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum Action {
    Publish,
    Retry,
    Escalate,
    AdminReview,
}

/// Thresholds a decision was made against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GateThresholds {
    #[serde(default = "default_heuristic_min_score")]
    pub heuristic_min_score: f64,
    #[serde(default = "default_heuristic_safety_min")]
    pub heuristic_safety_min: u8,
    #[serde(default = "default_factual_min_score")]
    pub factual_min_score: f64,
    #[serde(default = "default_acceptable_ratings")]
    pub acceptable_ratings: Vec<Rating>,
}

fn default_heuristic_min_score() -> f64 {
    3.5
}

fn default_heuristic_safety_min() -> u8 {
    4
}

fn default_factual_min_score() -> f64 {
    3.0
}

fn default_acceptable_ratings() -> Vec<Rating> {
    vec![Rating::A, Rating::B]
}

impl Default for GateThresholds {
    fn default() -> Self {
        Self {
            heuristic_min_score: default_heuristic_min_score(),
            heuristic_safety_min: default_heuristic_safety_min(),
            factual_min_score: default_factual_min_score(),
            acceptable_ratings: default_acceptable_ratings(),
        }
    }
}

/// One failed gate condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "code", rename_all = "snake_case")]
#[ts(export)]
pub enum FailReason {
    FactualJudgmentMissing,
    FactualJudgmentFailed,
    HeuristicScoreBelowMinimum { score: f64, minimum: f64 },
    SafetyScoreBelowMinimum { score: u8, minimum: u8 },
    RatingNotAcceptable { rating: Rating },
    FactualSubScoreBelowMinimum { score: f64, minimum: f64 },
    SafetyOverride,
}

impl std::fmt::Display for FailReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailReason::FactualJudgmentMissing => {
                f.write_str("factual judgment missing or unparseable")
            }
            FailReason::FactualJudgmentFailed => f.write_str("factual judgment did not pass"),
            FailReason::HeuristicScoreBelowMinimum { score, minimum } => {
                write!(f, "heuristic score {score:.2} below {minimum}")
            }
            FailReason::SafetyScoreBelowMinimum { score, minimum } => {
                write!(f, "safety score {score} below {minimum}")
            }
            FailReason::RatingNotAcceptable { rating } => {
                write!(f, "rating {rating} not acceptable")
            }
            FailReason::FactualSubScoreBelowMinimum { score, minimum } => {
                write!(f, "lowest factual sub-score {score} below {minimum}")
            }
            FailReason::SafetyOverride => {
                f.write_str("severe risk present but narrative has no safety cue")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct HeuristicBreakdown {
    pub score: f64,
    pub percentage: f64,
    pub rating: Rating,
    pub scores: DimensionScores,
    pub safety_cue_present: bool,
    pub hard_safety_rule: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FactualBreakdown {
    pub present: bool,
    pub pass: bool,
    pub alignment_score: Option<f64>,
    pub trend_accuracy_score: Option<f64>,
    pub severity_accuracy_score: Option<f64>,
    pub risk_accuracy_score: Option<f64>,
    pub domain_coverage_score: Option<f64>,
    pub min_sub_score: Option<f64>,
    pub unsupported_claims: usize,
    pub missed_critical_info: usize,
}

/// The authoritative publish/retry/escalate verdict for one attempt.
/// This is the audit record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Decision {
    pub pass: bool,
    pub decision: DecisionKind,
    pub action: Action,
    pub fail_reasons: Vec<FailReason>,
    pub safety_override: bool,
    pub heuristic: HeuristicBreakdown,
    pub factual: FactualBreakdown,
    pub thresholds: GateThresholds,
    pub attempt: u32,
    pub timestamp: jiff::Timestamp,
}
