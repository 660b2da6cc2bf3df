use serde_json::json;

use vigil_core::models::record::MeasurementRecord;
use vigil_facts::validate::{SortMethod, ValidationStatus, validate_records};

fn record(instrument: &str, timepoint: f64, date: Option<&str>, score: f64) -> MeasurementRecord {
    let mut record = MeasurementRecord {
        instrument: instrument.to_string(),
        timepoint: Some(timepoint),
        date: date.map(str::to_string),
        raw_score: Some(score),
        severity_label: Some("mild".to_string()),
        ..MeasurementRecord::default()
    };
    record
        .derived_fields
        .insert("total_score".to_string(), json!(score));
    record
}

fn clean() -> Vec<MeasurementRecord> {
    vec![
        record("PHQ-9", 1.0, Some("2024-01-01"), 8.0),
        record("PHQ-9", 2.0, Some("2024-02-05"), 6.0),
    ]
}

#[test]
fn empty_input_fails() {
    let report = validate_records(&[]);
    assert_eq!(report.status, ValidationStatus::Fail);
    assert_eq!(report.errors, vec!["No data received - empty input"]);
}

#[test]
fn clean_records_pass() {
    let report = validate_records(&clean());
    assert_eq!(report.status, ValidationStatus::Pass);
    assert!(report.errors.is_empty());
    assert!(report.warnings.is_empty());
    assert_eq!(report.trend_readiness.sort_method, Some(SortMethod::DatePrimary));
    let range = report.dates.date_range.unwrap();
    assert_eq!(range.span_days, 35);
    assert_eq!(report.instruments.len(), 1);
    assert!(report.instruments[0].ready_for_trends);
    assert_eq!(report.instruments[0].score_min, 6.0);
    assert_eq!(report.instruments[0].score_max, 8.0);
}

#[test]
fn missing_required_field_fails() {
    let mut records = clean();
    records[1].severity_label = None;
    let report = validate_records(&records);
    assert_eq!(report.status, ValidationStatus::Fail);
    assert_eq!(report.required_fields.items_missing_fields, 1);
    assert_eq!(report.required_fields.details[0].item_index, 1);
    assert_eq!(report.required_fields.details[0].missing_fields, vec!["severity_label"]);
}

#[test]
fn negative_score_fails() {
    let mut records = clean();
    records[0].raw_score = Some(-1.0);
    let report = validate_records(&records);
    assert_eq!(report.status, ValidationStatus::Fail);
    assert_eq!(report.scores.items_with_negative_scores, 1);
}

#[test]
fn all_empty_derived_fails() {
    let mut records = clean();
    for record in &mut records {
        record.derived_fields.clear();
    }
    let report = validate_records(&records);
    assert_eq!(report.status, ValidationStatus::Fail);
    assert_eq!(report.derived.items_with_empty_derived, 2);
}

#[test]
fn single_timepoint_instrument_warns() {
    let mut records = clean();
    records.push(record("GAD-7", 1.0, Some("2024-01-01"), 5.0));
    let report = validate_records(&records);
    assert_eq!(report.status, ValidationStatus::Warning);
    assert!(
        report
            .warnings
            .iter()
            .any(|w| w.contains("cannot analyze trends: GAD-7"))
    );
}

#[test]
fn undated_records_fall_back_to_timepoint_ordering() {
    let mut records = clean();
    records[0].date = None;
    records[1].date = Some("not a date".to_string());
    let report = validate_records(&records);
    assert_eq!(report.status, ValidationStatus::Warning);
    assert_eq!(report.dates.invalid_dates, 1);
    assert_eq!(
        report.trend_readiness.sort_method,
        Some(SortMethod::TimepointOnly)
    );
}

#[test]
fn critical_flags_are_counted() {
    let mut records = clean();
    records[1].clinical_flags = vec![
        "SDQ Emotional: 8 - Abnormal".to_string(),
        "PHQ-9 >= 10: suggests likely MDD".to_string(),
    ];
    let report = validate_records(&records);
    assert_eq!(report.flags.items_with_flags, 1);
    assert_eq!(report.flags.total_flags, 2);
    assert_eq!(report.flags.critical_flags, 1);
    assert_eq!(report.flags.critical_details[0].instrument, "PHQ-9");
}
