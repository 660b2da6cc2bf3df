use crate::Instrument;
use crate::preprocess::ItemGroup;
use crate::scoring::{ScoreRange, Scored, whole_number};

/// Rosenberg Self-Esteem Scale. 10 items rated 0–3, total 0–30.
pub struct Rses;

pub fn band(total: f64) -> &'static str {
    if total < 15.0 {
        "low"
    } else if total > 25.0 {
        "high"
    } else {
        "normal"
    }
}

impl Instrument for Rses {
    fn id(&self) -> &str {
        "rses"
    }

    fn name(&self) -> &str {
        "RSES"
    }

    fn matches(&self, compact: &str) -> bool {
        compact.contains("rses") || compact.contains("rosenberg")
    }

    fn item_range(&self) -> ScoreRange {
        ScoreRange::stepped(0.0, 3.0)
    }

    fn score(&self, group: &ItemGroup) -> Scored {
        let total = group.total();
        let mut scored = Scored::new("");
        scored
            .set_severity(band(total))
            .derive("scale", "RSES (0-30; <15 low, 15-25 normal, >25 high)")
            .derive(
                "note",
                "Contains reverse-scored items; verify scoring before interpretation",
            )
            .derive("total_score", whole_number(total));
        scored
    }
}
