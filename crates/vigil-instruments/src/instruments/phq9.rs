use crate::Instrument;
use crate::preprocess::ItemGroup;
use crate::scoring::{ScoreRange, Scored, whole_number};

/// PHQ-9: Patient Health Questionnaire. 9 items rated 0–3, total 0–27.
pub struct Phq9;

pub fn severity(total: f64) -> &'static str {
    match total {
        t if t <= 4.0 => "minimal",
        t if t <= 9.0 => "mild",
        t if t <= 14.0 => "moderate",
        t if t <= 19.0 => "moderately severe",
        _ => "severe",
    }
}

impl Instrument for Phq9 {
    fn id(&self) -> &str {
        "phq9"
    }

    fn name(&self) -> &str {
        "PHQ-9"
    }

    fn matches(&self, compact: &str) -> bool {
        compact.contains("phq")
    }

    fn item_range(&self) -> ScoreRange {
        ScoreRange::stepped(0.0, 3.0)
    }

    fn score(&self, group: &ItemGroup) -> Scored {
        let total = group.total();
        let mut scored = Scored::new("");
        scored
            .set_severity(severity(total))
            .derive("scale", "PHQ-9 (0-27, higher worse)")
            .derive("total_score", whole_number(total));

        if total >= 20.0 {
            scored.flag("PHQ-9 ≥20 (severe depression)");
        } else if total >= 15.0 {
            scored.flag("PHQ-9 ≥15 (moderately severe)");
        } else if total >= 10.0 {
            scored.flag("PHQ-9 ≥10 (moderate depression)");
        } else if total >= 5.0 {
            scored.flag("PHQ-9 ≥5 (mild depression)");
        }
        if total >= 10.0 {
            scored.flag("PHQ-9 ≥10 suggests likely MDD");
        }
        scored
    }
}
