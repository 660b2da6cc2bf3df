use crate::Instrument;
use crate::preprocess::ItemGroup;
use crate::scoring::{ScoreRange, Scored, whole_number};

/// WHO-5 Well-Being Index. 5 items rated 0–5; the raw total times four
/// gives the 0–100 index. Lower is worse.
pub struct Who5;

const POOR_WELLBEING: f64 = 50.0;
const DEPRESSION_RISK: f64 = 28.0;

pub fn index(raw_total: f64) -> f64 {
    (raw_total * 4.0).clamp(0.0, 100.0)
}

impl Instrument for Who5 {
    fn id(&self) -> &str {
        "who5"
    }

    fn name(&self) -> &str {
        "WHO-5"
    }

    fn matches(&self, compact: &str) -> bool {
        compact.contains("who5")
    }

    fn item_range(&self) -> ScoreRange {
        ScoreRange::stepped(0.0, 5.0)
    }

    fn score(&self, group: &ItemGroup) -> Scored {
        let total = group.total();
        let index = index(total);
        let severity = if index <= POOR_WELLBEING {
            "reduced well-being"
        } else {
            "adequate well-being"
        };

        let mut scored = Scored::new("");
        scored
            .set_severity(severity)
            .derive("scale", "WHO-5 (0-100 index, lower worse)")
            .derive("raw_score", whole_number(total))
            .derive("total_score", whole_number(total))
            .derive("index_score", whole_number(index));

        if index <= DEPRESSION_RISK {
            scored.flag("WHO-5 ≤28 indicates depression risk");
        } else if index <= POOR_WELLBEING {
            scored.flag("WHO-5 ≤50 suggests poor well-being");
        }
        scored
    }
}
