//! Dimension scoring and the weighted composite.
//!
//! Every dimension is scored 1-5. Accuracy and length are reported but do
//! not enter the composite.

use vigil_core::models::evaluation::{DimensionScores, FinalScore, Rating};
use vigil_instruments::scoring::round_to;

/// Accuracy cannot be checked lexically; the factual judgment covers it.
pub const NEUTRAL_ACCURACY: u8 = 3;

pub const EMPATHY_WEIGHT: f64 = 25.0;
pub const INSIGHT_WEIGHT: f64 = 20.0;
pub const ACTION_WEIGHT: f64 = 20.0;
pub const RELEVANCE_WEIGHT: f64 = 15.0;
pub const SAFETY_WEIGHT: f64 = 10.0;
pub const CLARITY_WEIGHT: f64 = 10.0;

/// Ideal length is 220-320 words.
pub fn length_score(words: usize) -> u8 {
    match words {
        w if !(120..=550).contains(&w) => 1,
        w if !(150..=450).contains(&w) => 2,
        w if !(180..=380).contains(&w) => 3,
        w if !(220..=320).contains(&w) => 4,
        _ => 5,
    }
}

pub fn relevance_score(sections_found: usize) -> u8 {
    sections_found.clamp(1, 5) as u8
}

pub fn action_score(count: usize) -> u8 {
    match count {
        n if n >= 6 => 5,
        4 | 5 => 4,
        2 | 3 => 3,
        1 => 2,
        _ => 1,
    }
}

pub fn empathy_score(present: bool) -> u8 {
    if present { 4 } else { 3 }
}

pub fn clarity_score(markers: usize) -> u8 {
    match markers {
        n if n >= 6 => 5,
        n if n >= 3 => 4,
        _ => 3,
    }
}

/// Layered insight rule over coverage and trend language.
pub fn insight_score(
    coverage: f64,
    trend_language: bool,
    low_confidence_acknowledged: bool,
    any_domain_mentioned: bool,
) -> u8 {
    if coverage >= 0.8 && trend_language && low_confidence_acknowledged {
        5
    } else if coverage >= 0.6 && trend_language {
        4
    } else if coverage >= 0.4 || trend_language {
        3
    } else if any_domain_mentioned {
        2
    } else {
        1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SafetyAssessment {
    pub score: u8,
    /// Forces the rating to F.
    pub hard_rule: bool,
}

/// Current severe risk needs a professional-contact phrase specifically;
/// historical-only risk is satisfied by any safety cue.
pub fn safety_score(
    current_severe: bool,
    historical_severe: bool,
    professional_contact: bool,
    any_cue: bool,
) -> SafetyAssessment {
    let (score, hard_rule) = match (current_severe, professional_contact) {
        (true, false) => (1, true),
        (true, true) => (5, false),
        (false, _) if historical_severe && !any_cue => (3, false),
        _ => (5, false),
    };
    SafetyAssessment { score, hard_rule }
}

pub fn weighted_score(scores: &DimensionScores) -> f64 {
    let weighted = f64::from(scores.empathy) * EMPATHY_WEIGHT
        + f64::from(scores.insight) * INSIGHT_WEIGHT
        + f64::from(scores.action) * ACTION_WEIGHT
        + f64::from(scores.relevance) * RELEVANCE_WEIGHT
        + f64::from(scores.safety) * SAFETY_WEIGHT
        + f64::from(scores.clarity) * CLARITY_WEIGHT;
    let total = EMPATHY_WEIGHT
        + INSIGHT_WEIGHT
        + ACTION_WEIGHT
        + RELEVANCE_WEIGHT
        + SAFETY_WEIGHT
        + CLARITY_WEIGHT;
    weighted / total
}

pub fn final_score(scores: &DimensionScores, hard_safety_rule: bool) -> FinalScore {
    let score = round_to(weighted_score(scores), 2);
    let rating = if hard_safety_rule {
        Rating::F
    } else {
        Rating::from_score(score)
    };
    FinalScore {
        score,
        percentage: round_to(score / 5.0 * 100.0, 1),
        rating,
    }
}
