//! Data-quality checkpoint run over measurement records before extraction.
//!
//! Errors (missing required fields, negative scores, no derived data at all)
//! fail the batch; anything else that looks off is a warning.

use std::collections::BTreeMap;

use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use vigil_core::models::record::MeasurementRecord;

const CRITICAL_FLAG_KEYWORDS: [&str; 4] = ["severe", "abnormal", "high risk", "clinical attention"];
const MAX_MISSING_DETAILS: usize = 5;
const MAX_CRITICAL_DETAILS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum ValidationStatus {
    Pass,
    Warning,
    Fail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum SortMethod {
    DatePrimary,
    TimepointOnly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MissingFields {
    pub item_index: usize,
    pub instrument: String,
    pub missing_fields: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RequiredFieldsCheck {
    pub pass: bool,
    pub items_with_all_required: usize,
    pub items_missing_fields: usize,
    pub details: Vec<MissingFields>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DateRange {
    pub earliest: Date,
    pub latest: Date,
    pub span_days: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TimepointRange {
    pub earliest: f64,
    pub latest: f64,
    pub unique_timepoints: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DateQuality {
    pub items_with_dates: usize,
    pub items_with_valid_timepoints: usize,
    pub invalid_dates: usize,
    pub date_range: Option<DateRange>,
    pub timepoint_range: Option<TimepointRange>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InstrumentSummary {
    pub instrument: String,
    pub total_assessments: usize,
    pub unique_timepoints: usize,
    pub assessments_with_dates: usize,
    pub assessments_with_derived: usize,
    pub score_min: f64,
    pub score_max: f64,
    pub ready_for_trends: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DerivedQuality {
    pub items_with_derived: usize,
    pub items_with_empty_derived: usize,
    pub items_with_scale_info: usize,
    pub items_with_interpretations: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScoreValidity {
    pub items_with_zero_scores: usize,
    pub items_with_negative_scores: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TrendReadiness {
    pub ready: bool,
    pub sort_method: Option<SortMethod>,
    pub issues: Vec<String>,
    pub instruments_with_trends: usize,
    pub total_instruments: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CriticalFlag {
    pub instrument: String,
    pub timepoint: Option<f64>,
    pub flag: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FlagSummary {
    pub items_with_flags: usize,
    pub total_flags: usize,
    pub critical_flags: usize,
    pub critical_details: Vec<CriticalFlag>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ValidationReport {
    pub status: ValidationStatus,
    pub total_items: usize,
    pub required_fields: RequiredFieldsCheck,
    pub dates: DateQuality,
    pub instruments: Vec<InstrumentSummary>,
    pub derived: DerivedQuality,
    pub scores: ScoreValidity,
    pub trend_readiness: TrendReadiness,
    pub flags: FlagSummary,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub recommendations: Vec<String>,
}

impl ValidationReport {
    fn empty() -> Self {
        Self {
            status: ValidationStatus::Fail,
            total_items: 0,
            required_fields: RequiredFieldsCheck::default(),
            dates: DateQuality::default(),
            instruments: Vec::new(),
            derived: DerivedQuality::default(),
            scores: ScoreValidity::default(),
            trend_readiness: TrendReadiness::default(),
            flags: FlagSummary::default(),
            errors: vec!["No data received - empty input".to_string()],
            warnings: Vec::new(),
            recommendations: Vec::new(),
        }
    }
}

fn missing_fields(record: &MeasurementRecord) -> Vec<String> {
    let mut missing = Vec::new();
    if record.instrument.trim().is_empty() {
        missing.push("instrument".to_string());
    }
    if record.timepoint.is_none() {
        missing.push("timepoint".to_string());
    }
    if record.raw_score.is_none() {
        missing.push("raw_score".to_string());
    }
    if record.severity_label.is_none() {
        missing.push("severity_label".to_string());
    }
    missing
}

fn valid_timepoint(record: &MeasurementRecord) -> Option<f64> {
    record.timepoint.filter(|tp| *tp > 0.0)
}

fn unique_count(mut values: Vec<f64>) -> usize {
    values.sort_by(f64::total_cmp);
    values.dedup();
    values.len()
}

fn check_dates(records: &[MeasurementRecord]) -> DateQuality {
    let mut dates: Vec<Date> = Vec::new();
    let mut invalid = 0;
    for record in records {
        match (record.date_value(), record.date.as_deref()) {
            (Some(date), _) => dates.push(date),
            (None, Some(raw)) if !raw.trim().is_empty() => invalid += 1,
            _ => {}
        }
    }
    let timepoints: Vec<f64> = records.iter().filter_map(valid_timepoint).collect();

    dates.sort();
    let date_range = match (dates.first(), dates.last()) {
        (Some(&earliest), Some(&latest)) => Some(DateRange {
            earliest,
            latest,
            span_days: earliest
                .until(latest)
                .map(|span| i64::from(span.get_days()))
                .unwrap_or(0),
        }),
        _ => None,
    };
    let timepoint_range = timepoints
        .iter()
        .copied()
        .reduce(f64::min)
        .zip(timepoints.iter().copied().reduce(f64::max))
        .map(|(earliest, latest)| TimepointRange {
            earliest,
            latest,
            unique_timepoints: unique_count(timepoints.clone()),
        });

    DateQuality {
        items_with_dates: dates.len(),
        items_with_valid_timepoints: timepoints.len(),
        invalid_dates: invalid,
        date_range,
        timepoint_range,
    }
}

fn summarize_instruments(records: &[MeasurementRecord]) -> Vec<InstrumentSummary> {
    let mut order: Vec<&str> = Vec::new();
    let mut groups: BTreeMap<&str, Vec<&MeasurementRecord>> = BTreeMap::new();
    for record in records {
        let name = record.instrument.as_str();
        if !groups.contains_key(name) {
            order.push(name);
        }
        groups.entry(name).or_default().push(record);
    }

    order
        .into_iter()
        .filter_map(|name| groups.get(name).map(|group| (name, group)))
        .map(|(name, group)| {
            let scores: Vec<f64> = group.iter().map(|r| r.raw_score.unwrap_or(0.0)).collect();
            let unique_timepoints =
                unique_count(group.iter().map(|r| r.timepoint.unwrap_or(0.0)).collect());
            InstrumentSummary {
                instrument: name.to_string(),
                total_assessments: group.len(),
                unique_timepoints,
                assessments_with_dates: group.iter().filter(|r| r.date.is_some()).count(),
                assessments_with_derived: group
                    .iter()
                    .filter(|r| !r.derived_fields.is_empty())
                    .count(),
                score_min: scores.iter().copied().fold(f64::INFINITY, f64::min),
                score_max: scores.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                ready_for_trends: unique_timepoints >= 2,
            }
        })
        .collect()
}

fn is_critical(flag: &str) -> bool {
    let flag = flag.to_lowercase();
    CRITICAL_FLAG_KEYWORDS.iter().any(|k| flag.contains(k))
}

/// Run every data-quality check over a batch of records.
pub fn validate_records(records: &[MeasurementRecord]) -> ValidationReport {
    if records.is_empty() {
        return ValidationReport::empty();
    }
    let total = records.len();
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    let mut recommendations = Vec::new();

    // Required fields
    let missing: Vec<MissingFields> = records
        .iter()
        .enumerate()
        .filter_map(|(item_index, record)| {
            let missing_fields = missing_fields(record);
            (!missing_fields.is_empty()).then(|| MissingFields {
                item_index,
                instrument: record.instrument.clone(),
                missing_fields,
            })
        })
        .collect();
    if !missing.is_empty() {
        errors.push(format!(
            "{} items missing required fields: instrument, timepoint, raw_score, severity_label",
            missing.len()
        ));
    }
    let required_fields = RequiredFieldsCheck {
        pass: missing.is_empty(),
        items_with_all_required: total - missing.len(),
        items_missing_fields: missing.len(),
        details: missing.into_iter().take(MAX_MISSING_DETAILS).collect(),
    };

    // Dates and timepoints
    let dates = check_dates(records);
    if dates.items_with_dates < total {
        let pct = dates.items_with_dates as f64 / total as f64 * 100.0;
        warnings.push(format!(
            "Only {}/{} ({pct:.1}%) items have valid dates",
            dates.items_with_dates, total
        ));
        if pct < 50.0 {
            recommendations
                .push("Consider adding dates to more items for better trend analysis".to_string());
        }
    }
    if dates.invalid_dates > 0 {
        warnings.push(format!(
            "{} items have invalid date formats",
            dates.invalid_dates
        ));
    }

    // Per-instrument distribution
    let instruments = summarize_instruments(records);
    let single_timepoint: Vec<&str> = instruments
        .iter()
        .filter(|s| !s.ready_for_trends)
        .map(|s| s.instrument.as_str())
        .collect();
    if !single_timepoint.is_empty() {
        warnings.push(format!(
            "{} questionnaire(s) have only 1 timepoint - cannot analyze trends: {}",
            single_timepoint.len(),
            single_timepoint.join(", ")
        ));
        recommendations
            .push("Collect data at multiple timepoints to enable trend analysis".to_string());
    }

    // Derived data
    let empty_derived = records
        .iter()
        .filter(|r| r.derived_fields.is_empty())
        .count();
    let derived = DerivedQuality {
        items_with_derived: total - empty_derived,
        items_with_empty_derived: empty_derived,
        items_with_scale_info: records
            .iter()
            .filter(|r| r.derived_fields.get("scale").is_some_and(|v| !v.is_null()))
            .count(),
        items_with_interpretations: records
            .iter()
            .filter(|r| r.derived_fields.contains_key("interpretations"))
            .count(),
    };
    if empty_derived == total {
        errors.push(
            "All items have empty derived fields - preprocessing may not have run".to_string(),
        );
    } else if empty_derived > 0 {
        warnings.push(format!("{empty_derived} items have empty derived data"));
    }

    // Score validity
    let scores = ScoreValidity {
        items_with_zero_scores: records
            .iter()
            .filter(|r| r.raw_score.unwrap_or(0.0) == 0.0)
            .count(),
        items_with_negative_scores: records
            .iter()
            .filter(|r| r.raw_score.is_some_and(|s| s < 0.0))
            .count(),
    };
    if scores.items_with_negative_scores > 0 {
        errors.push(format!(
            "{} items have negative scores (invalid)",
            scores.items_with_negative_scores
        ));
    }
    if scores.items_with_zero_scores as f64 > total as f64 * 0.5 {
        warnings.push(format!(
            "{} items have zero scores - verify this is expected",
            scores.items_with_zero_scores
        ));
    }

    // Trend readiness
    let mut trend_readiness = TrendReadiness {
        instruments_with_trends: instruments.iter().filter(|s| s.ready_for_trends).count(),
        total_instruments: instruments.len(),
        ..TrendReadiness::default()
    };
    if dates.items_with_dates >= 2 {
        trend_readiness.ready = true;
        trend_readiness.sort_method = Some(SortMethod::DatePrimary);
    } else if dates.items_with_valid_timepoints >= 2 {
        trend_readiness.ready = true;
        trend_readiness.sort_method = Some(SortMethod::TimepointOnly);
        trend_readiness
            .issues
            .push("No dates available - will use timepoint ordering only".to_string());
    } else {
        trend_readiness.issues.push(
            "Need at least 2 items with dates or timepoints for trend analysis".to_string(),
        );
        warnings.push(
            "Insufficient data for trend analysis - need at least 2 timepoints with dates or timepoint markers"
                .to_string(),
        );
    }

    // Clinical flags
    let mut flags = FlagSummary::default();
    for record in records.iter().filter(|r| !r.clinical_flags.is_empty()) {
        flags.items_with_flags += 1;
        flags.total_flags += record.clinical_flags.len();
        for flag in record.clinical_flags.iter().filter(|f| is_critical(f)) {
            flags.critical_flags += 1;
            if flags.critical_details.len() < MAX_CRITICAL_DETAILS {
                flags.critical_details.push(CriticalFlag {
                    instrument: record.instrument.clone(),
                    timepoint: record.timepoint,
                    flag: flag.clone(),
                });
            }
        }
    }
    if flags.critical_flags > 0 {
        recommendations.push(format!(
            "{} critical clinical flags detected - review before narrative generation",
            flags.critical_flags
        ));
    }

    let status = if !errors.is_empty() {
        recommendations.push(
            "Fix errors before proceeding to trend analysis or narrative generation".to_string(),
        );
        ValidationStatus::Fail
    } else if !warnings.is_empty() {
        recommendations.push(
            "Review warnings - data may still be usable but quality could be improved".to_string(),
        );
        ValidationStatus::Warning
    } else {
        ValidationStatus::Pass
    };

    ValidationReport {
        status,
        total_items: total,
        required_fields,
        dates,
        instruments,
        derived,
        scores,
        trend_readiness,
        flags,
        errors,
        warnings,
        recommendations,
    }
}
