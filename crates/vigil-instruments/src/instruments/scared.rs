use crate::Instrument;
use crate::instruments::{subscale_total, subscale_totals, subscales_json};
use crate::preprocess::ItemGroup;
use crate::scoring::{ScoreRange, Scored, whole_number};

/// SCARED: Screen for Child Anxiety Related Disorders. 41 items rated 0–2,
/// total 0–82 with five dimension subscales.
pub struct Scared;

const SUBSCALES: [(&str, &[&str]); 5] = [
    ("Panic", &["panic"]),
    ("Generalized Anxiety (GAD)", &["gad", "generalized"]),
    ("Separation", &["separation"]),
    ("Social", &["social"]),
    ("School Phobia", &["school"]),
];

const SUBSCALE_CUTOFFS: [(&str, f64, &str); 5] = [
    ("Panic", 7.0, "SCARED Panic ≥7"),
    ("Social", 8.0, "SCARED Social ≥8"),
    ("School Phobia", 3.0, "SCARED School ≥3"),
    ("Separation", 5.0, "SCARED Separation ≥5"),
    ("Generalized Anxiety (GAD)", 9.0, "SCARED GAD ≥9"),
];

impl Instrument for Scared {
    fn id(&self) -> &str {
        "scared"
    }

    fn name(&self) -> &str {
        "SCARED"
    }

    fn matches(&self, compact: &str) -> bool {
        compact.contains("scared")
    }

    fn item_range(&self) -> ScoreRange {
        ScoreRange::stepped(0.0, 2.0)
    }

    fn score(&self, group: &ItemGroup) -> Scored {
        let total = group.total();
        let subscales = subscale_totals(group, &SUBSCALES);

        let mut scored = Scored::new("");
        scored
            .set_severity(if total >= 25.0 {
                "possible anxiety disorder (≥25)"
            } else {
                "below screening threshold"
            })
            .derive(
                "scale",
                "SCARED (total ≥25 possible anxiety disorder; subscale cut-offs apply)",
            )
            .derive("total_score", whole_number(total))
            .derive("subscales", subscales_json(&subscales));

        for (name, cutoff, flag) in SUBSCALE_CUTOFFS {
            if subscale_total(&subscales, name) >= cutoff {
                scored.flag(flag);
            }
        }
        scored
    }
}
