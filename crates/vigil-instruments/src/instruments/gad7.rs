use crate::Instrument;
use crate::preprocess::ItemGroup;
use crate::scoring::{ScoreRange, Scored, whole_number};

/// GAD-7: Generalized Anxiety Disorder scale. 7 items rated 0–3, total 0–21.
pub struct Gad7;

pub fn severity(total: f64) -> &'static str {
    match total {
        t if t <= 4.0 => "minimal",
        t if t <= 9.0 => "mild",
        t if t <= 14.0 => "moderate",
        _ => "severe",
    }
}

impl Instrument for Gad7 {
    fn id(&self) -> &str {
        "gad7"
    }

    fn name(&self) -> &str {
        "GAD-7"
    }

    fn matches(&self, compact: &str) -> bool {
        compact.contains("gad7")
    }

    fn item_range(&self) -> ScoreRange {
        ScoreRange::stepped(0.0, 3.0)
    }

    fn score(&self, group: &ItemGroup) -> Scored {
        let total = group.total();
        let mut scored = Scored::new("");
        scored
            .set_severity(severity(total))
            .derive("scale", "GAD-7 (0-21, higher worse)")
            .derive("total_score", whole_number(total));

        if total >= 15.0 {
            scored.flag("GAD-7 ≥15 (severe anxiety)");
        } else if total >= 10.0 {
            scored.flag("GAD-7 ≥10 (moderate anxiety)");
        } else if total >= 5.0 {
            scored.flag("GAD-7 ≥5 (mild anxiety)");
        }
        scored
    }
}
