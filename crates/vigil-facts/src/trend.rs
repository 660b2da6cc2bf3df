//! Trend classification over an ordered score series.

use vigil_core::models::domain::Direction;
use vigil_core::models::facts::{Trend, TrendConfidence};

/// Scores needed before the recent-trend window applies.
const RECENT_WINDOW_MIN: usize = 4;
const RECENT_WINDOW: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendAnalysis {
    pub trend: Trend,
    pub recent_trend: Trend,
    pub confidence: TrendConfidence,
    pub consistent: bool,
}

/// Classify a score change against a tolerance, honouring which direction
/// is clinically worse.
pub fn classify(diff: f64, tolerance: f64, direction: Direction) -> Trend {
    let higher_is_worse = match direction {
        Direction::HigherWorse => true,
        Direction::LowerWorse | Direction::HigherBetter => false,
        Direction::Unrecognized => return Trend::Unknown,
    };
    if diff == 0.0 || diff.abs() < tolerance {
        return Trend::Stable;
    }
    if (diff > 0.0) == higher_is_worse {
        Trend::Worsening
    } else {
        Trend::Improving
    }
}

/// True when the series never reverses direction. Fewer than two points
/// are trivially consistent.
pub fn is_consistent(scores: &[f64]) -> bool {
    let non_decreasing = scores.windows(2).all(|w| w[1] >= w[0]);
    let non_increasing = scores.windows(2).all(|w| w[1] <= w[0]);
    non_decreasing || non_increasing
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Mean of the last three against the mean of the first three; the overall
/// trend when the series is too short.
pub fn recent_trend(scores: &[f64], tolerance: f64, direction: Direction, overall: Trend) -> Trend {
    if scores.len() < RECENT_WINDOW_MIN {
        return overall;
    }
    let head = &scores[..RECENT_WINDOW];
    let tail = &scores[scores.len() - RECENT_WINDOW..];
    classify(mean(tail) - mean(head), tolerance, direction)
}

/// Confidence from the number of valid points, downgraded one level for an
/// inconsistent trajectory of three or more points.
pub fn confidence(points: usize, consistent: bool) -> TrendConfidence {
    let base = match points {
        0 | 1 => return TrendConfidence::Insufficient,
        n if n >= 6 => TrendConfidence::High,
        4 | 5 => TrendConfidence::Moderate,
        _ => TrendConfidence::Low,
    };
    if consistent || points < 3 {
        return base;
    }
    match base {
        TrendConfidence::High => TrendConfidence::Moderate,
        _ => TrendConfidence::Low,
    }
}

pub fn analyze(scores: &[f64], tolerance: f64, direction: Direction) -> TrendAnalysis {
    let consistent = is_consistent(scores);
    match (scores.first(), scores.last()) {
        (Some(first), Some(last)) if scores.len() >= 2 => {
            let trend = classify(last - first, tolerance, direction);
            TrendAnalysis {
                trend,
                recent_trend: recent_trend(scores, tolerance, direction, trend),
                confidence: confidence(scores.len(), consistent),
                consistent,
            }
        }
        _ => TrendAnalysis {
            trend: Trend::Unknown,
            recent_trend: Trend::Unknown,
            confidence: TrendConfidence::Insufficient,
            consistent,
        },
    }
}
