//! Change magnitude, elapsed time, and per-record history for a domain.

use vigil_core::models::facts::{
    HistoryPoint, ScoreChange, Snapshot, Timeline, TimelineMethod,
};
use vigil_core::models::record::{MeasurementRecord, parse_date};
use vigil_instruments::registry::InstrumentConfig;
use vigil_instruments::scoring::round_to;
use vigil_instruments::severity::SeverityLexicon;

/// Assumed spacing between consecutive timepoints when dates are missing.
pub const DAYS_PER_TIMEPOINT: i64 = 35;

pub fn score_change(first: f64, last: f64) -> ScoreChange {
    let diff = last - first;
    let percent = if first > 0.0 {
        round_to(diff.abs() / first * 100.0, 1)
    } else {
        0.0
    };
    ScoreChange { diff, percent }
}

fn timepoint_label(timepoint: Option<f64>) -> String {
    match timepoint {
        Some(tp) if tp.fract() == 0.0 => format!("timepoint {}", tp as i64),
        Some(tp) => format!("timepoint {tp}"),
        None => "timepoint ?".to_string(),
    }
}

fn endpoint(snapshot: &Snapshot) -> String {
    match snapshot.date.as_deref() {
        Some(date) if !date.is_empty() => date.to_string(),
        _ => timepoint_label(snapshot.timepoint),
    }
}

pub fn timeline(baseline: &Snapshot, latest: &Snapshot) -> Timeline {
    let period = format!("{} to {}", endpoint(baseline), endpoint(latest));
    let dates = (
        baseline.date.as_deref().and_then(parse_date),
        latest.date.as_deref().and_then(parse_date),
    );
    let timepoints = (
        baseline.timepoint.filter(|tp| *tp != 0.0),
        latest.timepoint.filter(|tp| *tp != 0.0),
    );

    let (span_days, method) = match (dates, timepoints) {
        ((Some(start), Some(end)), _) => (
            start
                .until(end)
                .map(|span| i64::from(span.get_days()).abs())
                .unwrap_or(0),
            TimelineMethod::ActualDates,
        ),
        (_, (Some(start), Some(end))) => {
            // Casts saturate, so only the multiply can overflow.
            let steps = (end - start).abs().round() as i64;
            match steps.checked_mul(DAYS_PER_TIMEPOINT) {
                Some(days) => (days, TimelineMethod::EstimatedFromTimepoints),
                None => (0, TimelineMethod::Unknown),
            }
        }
        _ => (0, TimelineMethod::Unknown),
    };

    Timeline {
        period,
        span_days,
        method,
    }
}

pub fn severity_change(baseline: Option<&str>, latest: Option<&str>) -> String {
    let from = baseline.unwrap_or("unknown");
    let to = latest.unwrap_or("unknown");
    if from == to {
        format!("remained {from}")
    } else {
        format!("from {from} to {to}")
    }
}

pub fn history(
    records: &[&MeasurementRecord],
    config: &InstrumentConfig,
    lexicon: &SeverityLexicon,
) -> Vec<HistoryPoint> {
    records
        .iter()
        .map(|record| HistoryPoint {
            timepoint: record.timepoint,
            date: record.date.clone(),
            score: config.extract_score(record),
            severity_label: record.severity_label.clone(),
            clinical_flags: record.clinical_flags.clone(),
            severe: lexicon.record_is_severe(record.severity_label.as_deref(), &record.clinical_flags),
        })
        .collect()
}
