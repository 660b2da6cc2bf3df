use std::collections::BTreeMap;

use jiff::Timestamp;
use jiff::civil::{Date, DateTime};
use jiff::tz::TimeZone;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

use crate::lenient;

/// One administration of one instrument at one time.
///
/// Field aliases accept the questionnaire preprocessor's naming
/// (`questionnaire`, `raw_total`, `severity`, `derived`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MeasurementRecord {
    #[serde(default, alias = "questionnaire", deserialize_with = "lenient::text")]
    pub instrument: String,
    #[serde(default, alias = "timepoints", deserialize_with = "lenient::optional_number")]
    pub timepoint: Option<f64>,
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub date: Option<String>,
    #[serde(default, alias = "raw_total", deserialize_with = "lenient::optional_number")]
    pub raw_score: Option<f64>,
    #[serde(default, alias = "severity", deserialize_with = "lenient::optional_text")]
    pub severity_label: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub clinical_flags: Vec<String>,
    #[serde(default, alias = "derived", deserialize_with = "lenient::object")]
    pub derived_fields: BTreeMap<String, Value>,
}

impl MeasurementRecord {
    /// The administration date, if it parses.
    pub fn date_value(&self) -> Option<Date> {
        self.date.as_deref().and_then(parse_date)
    }
}

/// Parse an ISO calendar date, a civil datetime, or an RFC 3339 instant
/// (read in UTC) down to a calendar date.
pub fn parse_date(s: &str) -> Option<Date> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(date) = s.parse::<Date>() {
        return Some(date);
    }
    if let Ok(datetime) = s.parse::<DateTime>() {
        return Some(datetime.date());
    }
    s.parse::<Timestamp>()
        .ok()
        .map(|ts| ts.to_zoned(TimeZone::UTC).date())
}
