//! Item-level preprocessing: raw questionnaire rows in, measurement records out.
//!
//! Rows are grouped by `(questionnaire, timepoint)` in first-seen order and
//! each group is scored by the matching [`Instrument`]. Questionnaires with
//! no scorer still produce a record carrying the raw total.

use std::collections::BTreeMap;

use jiff::Span;
use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use vigil_core::lenient;
use vigil_core::models::record::{MeasurementRecord, parse_date};

use crate::scoring::{Scored, ValidationError, whole_number};
use crate::{Instrument, find_instrument};

const NULL_MARKERS: [&str; 4] = ["nan", "none", "<na>", "null"];

/// One answered item as exported from the questionnaire sheet.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawItemRow {
    #[serde(default, deserialize_with = "lenient::text")]
    pub questionnaire: String,
    #[serde(default)]
    pub timepoint: Option<Value>,
    #[serde(default)]
    pub timepoints: Option<Value>,
    #[serde(default)]
    pub date: Option<Value>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub question: String,
    #[serde(default)]
    pub answer: Option<Value>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub dimension: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub free_text: String,
}

impl RawItemRow {
    /// Accept either a bare row object or one wrapped as `{"json": {...}}`.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        let inner = match value {
            Value::Object(mut map) if map.len() == 1 && map.contains_key("json") => {
                map.remove("json").unwrap_or(Value::Null)
            }
            other => other,
        };
        serde_json::from_value(inner)
    }

    fn is_metadata(&self) -> bool {
        let name = self.questionnaire.trim();
        name.is_empty() || NULL_MARKERS.contains(&name.to_ascii_lowercase().as_str())
    }

    fn timepoint_number(&self) -> i64 {
        self.timepoint
            .as_ref()
            .or(self.timepoints.as_ref())
            .and_then(lenient::number_from_value)
            .map(|v| v.round() as i64)
            .unwrap_or(0)
    }

    fn answer_number(&self) -> f64 {
        self.answer
            .as_ref()
            .and_then(lenient::number_from_value)
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemResponse {
    pub question: String,
    pub answer: f64,
    pub dimension: String,
}

/// All items of one questionnaire at one timepoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemGroup {
    pub questionnaire: String,
    pub timepoint: i64,
    pub date: Option<Date>,
    pub responses: Vec<ItemResponse>,
    pub free_text: String,
}

impl ItemGroup {
    /// Sum of answers, truncated toward zero.
    pub fn total(&self) -> f64 {
        self.responses.iter().map(|r| r.answer).sum::<f64>().trunc()
    }

    fn push_free_text(&mut self, text: &str) {
        if text.is_empty() || self.free_text.contains(text) {
            return;
        }
        if !self.free_text.is_empty() {
            self.free_text.push_str(" | ");
        }
        self.free_text.push_str(text);
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PreprocessOutput {
    pub records: Vec<MeasurementRecord>,
    pub item_warnings: Vec<ValidationError>,
    pub skipped_rows: usize,
}

/// Normalize an export date: ISO strings and instants, or Excel serial
/// day numbers counted from 1899-12-30.
pub fn normalize_date(value: &Value) -> Option<Date> {
    match value {
        Value::String(s) => parse_date(s),
        Value::Number(n) => {
            let days = n.as_f64().filter(|v| v.is_finite())?.trunc() as i64;
            let span = Span::new().try_days(days).ok()?;
            Date::new(1899, 12, 30).ok()?.checked_add(span).ok()
        }
        _ => None,
    }
}

/// Group raw rows by `(questionnaire, timepoint)` preserving first-seen order.
pub fn group_rows(rows: &[RawItemRow]) -> (Vec<ItemGroup>, usize) {
    let mut groups: Vec<ItemGroup> = Vec::new();
    let mut index: BTreeMap<(String, i64), usize> = BTreeMap::new();
    let mut skipped = 0;

    for row in rows {
        if row.is_metadata() {
            skipped += 1;
            continue;
        }
        let questionnaire = row.questionnaire.trim().to_string();
        let timepoint = row.timepoint_number();
        let slot = *index
            .entry((questionnaire.clone(), timepoint))
            .or_insert_with(|| {
                groups.push(ItemGroup {
                    questionnaire,
                    timepoint,
                    date: row.date.as_ref().and_then(normalize_date),
                    responses: Vec::new(),
                    free_text: String::new(),
                });
                groups.len() - 1
            });

        let group = &mut groups[slot];
        group.push_free_text(row.free_text.trim());
        group.responses.push(ItemResponse {
            question: row.question.clone(),
            answer: row.answer_number(),
            dimension: row.dimension.clone(),
        });
    }

    (groups, skipped)
}

/// Score a single group into a measurement record.
pub fn score_group(group: &ItemGroup) -> (MeasurementRecord, Vec<ValidationError>) {
    let total = group.total();
    let (scored, warnings) = match find_instrument(&group.questionnaire) {
        Some(instrument) => {
            debug!(
                questionnaire = %group.questionnaire,
                instrument = instrument.id(),
                total,
                "scoring group"
            );
            (instrument.score(group), instrument.validate_items(group))
        }
        None => (unregistered(group, total), Vec::new()),
    };

    let Scored {
        severity,
        clinical_flags,
        mut derived,
    } = scored;
    if !group.free_text.is_empty() {
        derived.insert("free_text".to_string(), Value::String(group.free_text.clone()));
    }
    derived.insert("item_count".to_string(), Value::from(group.responses.len()));

    let record = MeasurementRecord {
        instrument: group.questionnaire.clone(),
        timepoint: Some(group.timepoint as f64),
        date: group.date.map(|d| d.to_string()),
        raw_score: Some(total),
        severity_label: (!severity.is_empty()).then_some(severity),
        clinical_flags,
        derived_fields: derived,
    };
    (record, warnings)
}

/// Preprocess raw rows (bare or `{"json": ...}`-wrapped) into records.
pub fn preprocess(rows: Vec<Value>) -> PreprocessOutput {
    let total_rows = rows.len();
    let mut parsed = Vec::with_capacity(total_rows);
    let mut unparseable = 0;
    for (i, value) in rows.into_iter().enumerate() {
        match RawItemRow::from_value(value) {
            Ok(row) => parsed.push(row),
            Err(e) => {
                warn!(row = i, error = %e, "skipping unreadable item row");
                unparseable += 1;
            }
        }
    }

    let (groups, skipped) = group_rows(&parsed);
    let mut output = PreprocessOutput {
        skipped_rows: skipped + unparseable,
        ..PreprocessOutput::default()
    };
    for group in &groups {
        let (record, warnings) = score_group(group);
        output.records.push(record);
        output.item_warnings.extend(warnings);
    }

    for w in &output.item_warnings {
        warn!(instrument = %w.instrument_id, question = %w.question, value = w.value, "item answer out of range");
    }
    info!(
        rows = total_rows,
        groups = output.records.len(),
        skipped = output.skipped_rows,
        "preprocessing complete"
    );
    output
}

fn unregistered(group: &ItemGroup, total: f64) -> Scored {
    let mut scored = Scored::new("see cut-offs for interpretation");
    scored
        .derive("scale", format!("{} (unknown range)", group.questionnaire))
        .derive("total_score", whole_number(total))
        .derive("direction", "unknown");
    scored
}
