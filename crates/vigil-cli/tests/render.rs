use vigil_cli::render::render_validation;
use vigil_core::models::record::MeasurementRecord;
use vigil_facts::validate::validate_records;

fn record(instrument: &str, timepoint: f64, score: f64, flags: &[&str]) -> MeasurementRecord {
    MeasurementRecord {
        instrument: instrument.to_string(),
        timepoint: Some(timepoint),
        raw_score: Some(score),
        severity_label: Some("mild".to_string()),
        clinical_flags: flags.iter().map(|f| f.to_string()).collect(),
        ..MeasurementRecord::default()
    }
}

#[test]
fn empty_input_renders_failure() {
    let text = render_validation(&validate_records(&[])).unwrap();
    assert!(text.starts_with("Data quality: FAIL"));
    assert!(text.contains("No data received - empty input"));
}

#[test]
fn report_lists_instruments_and_critical_flags() {
    let records = vec![
        record("PHQ-9", 1.0, 12.0, &[]),
        record("PHQ-9", 2.0, 8.0, &[]),
        record("GAD-7", 1.0, 16.0, &["Severe anxiety"]),
    ];
    let text = render_validation(&validate_records(&records)).unwrap();
    assert!(text.contains("Records: 3"));
    assert!(text.contains("PHQ-9: 2 assessments"));
    assert!(text.contains("GAD-7: 1 assessments, 1 timepoints"));
    assert!(text.contains("(single timepoint)"));
    assert!(text.contains("Critical flags:"));
    assert!(text.contains("Severe anxiety"));
}
