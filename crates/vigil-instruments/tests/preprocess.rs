use jiff::civil::date;
use serde_json::{Value, json};
use vigil_instruments::instruments::promis::t_score;
use vigil_instruments::preprocess::{normalize_date, preprocess};
use vigil_instruments::{all_instruments, find_instrument};

fn rows(questionnaire: &str, timepoint: i64, answers: &[f64]) -> Vec<Value> {
    answers
        .iter()
        .enumerate()
        .map(|(i, a)| {
            json!({
                "questionnaire": questionnaire,
                "timepoints": timepoint,
                "date": "2024-03-01",
                "question": format!("{}. item", i + 1),
                "answer": a,
            })
        })
        .collect()
}

#[test]
fn all_instruments_have_unique_ids() {
    let instruments = all_instruments();
    let mut ids: Vec<&str> = instruments.iter().map(|i| i.id()).collect();
    let count = ids.len();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), count);
    assert!(find_instrument("PHQ-9").is_some_and(|i| i.id() == "phq9"));
    assert!(find_instrument("nonexistent").is_none());
}

#[test]
fn questionnaire_names_find_their_scorer() {
    let find = |name: &str| find_instrument(name).map(|i| i.id().to_string());
    assert_eq!(find("PHQ-9").as_deref(), Some("phq9"));
    assert_eq!(find("WHO 5 Well-Being").as_deref(), Some("who5"));
    assert_eq!(find("GAD 7").as_deref(), Some("gad7"));
    assert_eq!(find("CES-DC").as_deref(), Some("cesdc"));
    assert_eq!(find("Pediatric Symptom Checklist – 17 (PSC-17)").as_deref(), Some("psc17"));
    assert_eq!(find("SDQ Parent").as_deref(), Some("sdq"));
    assert!(find("Mystery Scale").is_none());
}

#[test]
fn phq9_total_drives_severity_and_flags() {
    let output = preprocess(rows("PHQ-9", 1, &[2.0; 9]));
    assert_eq!(output.records.len(), 1);
    let record = &output.records[0];
    assert_eq!(record.raw_score, Some(18.0));
    assert_eq!(record.severity_label.as_deref(), Some("moderately severe"));
    assert_eq!(
        record.clinical_flags,
        vec![
            "PHQ-9 ≥15 (moderately severe)".to_string(),
            "PHQ-9 ≥10 suggests likely MDD".to_string(),
        ]
    );
    assert_eq!(record.derived_fields["total_score"], json!(18));
    assert_eq!(record.derived_fields["severity_level"], json!("moderately severe"));
    assert_eq!(record.timepoint, Some(1.0));
    assert_eq!(record.date.as_deref(), Some("2024-03-01"));
}

#[test]
fn who5_index_is_four_times_raw() {
    let output = preprocess(rows("WHO-5", 1, &[2.0; 5]));
    let record = &output.records[0];
    assert_eq!(record.derived_fields["index_score"], json!(40));
    assert_eq!(record.severity_label.as_deref(), Some("reduced well-being"));
    assert_eq!(record.clinical_flags, vec!["WHO-5 ≤50 suggests poor well-being".to_string()]);
}

#[test]
fn promis_raw_total_converts_to_t_score() {
    let answers = [3.0, 3.0, 3.0, 3.0, 2.0, 2.0, 2.0, 2.0];
    let output = preprocess(rows("PROMIS Pediatric Anxiety", 2, &answers));
    let record = &output.records[0];
    assert_eq!(record.derived_fields["t_score"], json!(59.0));
    assert_eq!(record.severity_label.as_deref(), Some("moderate"));
    assert!(
        record
            .clinical_flags
            .iter()
            .any(|f| f.contains("Moderate - clinical attention warranted"))
    );
}

#[test]
fn promis_outside_table_is_reported() {
    let output = preprocess(rows("PROMIS Depression", 1, &[1.0; 4]));
    let record = &output.records[0];
    assert_eq!(
        record.severity_label.as_deref(),
        Some("raw score outside conversion range")
    );
    assert!(record.derived_fields.get("t_score").is_none());
}

#[test]
fn pedsql_all_best_answers_is_typical_range() {
    let output = preprocess(rows("PedsQL 4.0", 1, &[0.0; 23]));
    let record = &output.records[0];
    assert_eq!(record.severity_label.as_deref(), Some("typical range"));
    assert_eq!(record.derived_fields["total_score"], json!(100.0));
    assert_eq!(record.derived_fields["psychosocial_total_ratio"], json!(100.0));
}

#[test]
fn pedsql_without_numbered_items_is_insufficient() {
    let items: Vec<Value> = (0..5)
        .map(|_| json!({"questionnaire": "PedsQL", "timepoint": 1, "question": "item", "answer": 1}))
        .collect();
    let output = preprocess(items);
    assert_eq!(
        output.records[0].severity_label.as_deref(),
        Some("insufficient valid responses")
    );
}

#[test]
fn sdq_parent_version_flags_abnormal_subscales() {
    let items: Vec<Value> = (0..5)
        .map(|i| {
            json!({
                "questionnaire": "SDQ Parent",
                "timepoint": 1,
                "question": format!("{i}"),
                "answer": if i < 2 { 2 } else { 1 },
                "dimension": "Emotional symptoms",
            })
        })
        .collect();
    let output = preprocess(items);
    let record = &output.records[0];
    assert_eq!(record.severity_label.as_deref(), Some("normal"));
    assert_eq!(record.derived_fields["total_score"], json!(7));
    assert_eq!(
        record.derived_fields["interpretations"]["emotional"]["band"],
        json!("abnormal")
    );
    assert!(record.clinical_flags.iter().any(|f| f.starts_with("SDQ Emotional: 7")));
}

#[test]
fn rows_group_by_questionnaire_and_timepoint_in_first_seen_order() {
    let mut items = rows("GAD-7", 2, &[1.0; 7]);
    items.extend(rows("GAD-7", 1, &[3.0; 7]));
    items.push(json!({"questionnaire": "nan", "answer": 3}));
    items.push(json!({"questionnaire": "", "answer": 3}));

    let output = preprocess(items);
    assert_eq!(output.skipped_rows, 2);
    assert_eq!(output.records.len(), 2);
    assert_eq!(output.records[0].timepoint, Some(2.0));
    assert_eq!(output.records[0].severity_label.as_deref(), Some("mild"));
    assert_eq!(output.records[1].timepoint, Some(1.0));
    assert_eq!(output.records[1].severity_label.as_deref(), Some("severe"));
}

#[test]
fn free_text_accumulates_without_duplicates() {
    let items = vec![
        json!({"json": {"questionnaire": "RSES", "timepoint": 1, "answer": 2, "free_text": "feels better"}}),
        json!({"json": {"questionnaire": "RSES", "timepoint": 1, "answer": 2, "free_text": "feels better"}}),
        json!({"json": {"questionnaire": "RSES", "timepoint": 1, "answer": 2, "free_text": "sleeping more"}}),
    ];
    let output = preprocess(items);
    assert_eq!(output.records.len(), 1);
    assert_eq!(
        output.records[0].derived_fields["free_text"],
        json!("feels better | sleeping more")
    );
    assert_eq!(output.records[0].severity_label.as_deref(), Some("low"));
}

#[test]
fn out_of_range_answers_are_reported() {
    let mut answers = [1.0; 9];
    answers[0] = 7.0;
    let output = preprocess(rows("PHQ-9", 1, &answers));
    assert_eq!(output.item_warnings.len(), 1);
    assert_eq!(output.item_warnings[0].value, 7.0);
    assert_eq!(output.item_warnings[0].instrument_id, "phq9");
}

#[test]
fn unregistered_questionnaires_keep_their_total() {
    let output = preprocess(rows("Mystery Scale", 1, &[4.0, 5.0]));
    let record = &output.records[0];
    assert_eq!(
        record.severity_label.as_deref(),
        Some("see cut-offs for interpretation")
    );
    assert_eq!(record.derived_fields["total_score"], json!(9));
}

#[test]
fn dates_normalize_from_strings_and_excel_serials() {
    assert_eq!(normalize_date(&json!("2024-02-03")), Some(date(2024, 2, 3)));
    assert_eq!(
        normalize_date(&json!("2024-02-03T10:00:00Z")),
        Some(date(2024, 2, 3))
    );
    assert_eq!(normalize_date(&json!(45292)), Some(date(2024, 1, 1)));
    assert_eq!(normalize_date(&json!("not a date")), None);
    assert_eq!(normalize_date(&Value::Null), None);
}

#[test]
fn promis_extreme_raw_total_has_no_t_score() {
    assert_eq!(t_score("PROMIS Depression", -1e30), None);
    assert_eq!(t_score("PROMIS Depression", 1e30), None);
}
