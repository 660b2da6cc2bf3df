use crate::Instrument;
use crate::instruments::{subscale_total, subscale_totals, subscales_json};
use crate::preprocess::ItemGroup;
use crate::scoring::{ScoreRange, Scored, whole_number};

/// PSC-17: Pediatric Symptom Checklist. 17 items rated 0–2, total 0–34.
pub struct Psc17;

const SUBSCALES: [(&str, &[&str]); 3] = [
    ("Internalizing", &["internalizing"]),
    ("Attention", &["attention"]),
    ("Externalizing", &["externalizing"]),
];

const SUBSCALE_CUTOFFS: [(&str, f64, &str); 3] = [
    ("Internalizing", 5.0, "PSC-17 Internalizing ≥5"),
    ("Attention", 7.0, "PSC-17 Attention ≥7"),
    ("Externalizing", 7.0, "PSC-17 Externalizing ≥7"),
];

impl Instrument for Psc17 {
    fn id(&self) -> &str {
        "psc17"
    }

    fn name(&self) -> &str {
        "PSC-17"
    }

    fn matches(&self, compact: &str) -> bool {
        compact.contains("psc")
    }

    fn item_range(&self) -> ScoreRange {
        ScoreRange::stepped(0.0, 2.0)
    }

    fn score(&self, group: &ItemGroup) -> Scored {
        let total = group.total();
        let subscales = subscale_totals(group, &SUBSCALES);

        let mut scored = Scored::new("");
        scored
            .set_severity(if total >= 15.0 {
                "positive screen (≥15)"
            } else {
                "below threshold"
            })
            .derive(
                "scale",
                "PSC-17 (total ≥15 positive; subscales Internalizing ≥5, Attention ≥7, Externalizing ≥7)",
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
