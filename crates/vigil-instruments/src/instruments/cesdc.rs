use crate::Instrument;
use crate::preprocess::ItemGroup;
use crate::scoring::{ScoreRange, Scored, whole_number};

/// CES-DC: Center for Epidemiological Studies Depression Scale for Children.
/// 20 items rated 0–3, total 0–60; 15 or more suggests depression risk.
pub struct CesDc;

impl Instrument for CesDc {
    fn id(&self) -> &str {
        "cesdc"
    }

    fn name(&self) -> &str {
        "CES-DC"
    }

    fn matches(&self, compact: &str) -> bool {
        compact.contains("cesdc")
    }

    fn item_range(&self) -> ScoreRange {
        ScoreRange::stepped(0.0, 3.0)
    }

    fn score(&self, group: &ItemGroup) -> Scored {
        let total = group.total();
        let positive = total >= 15.0;
        let mut scored = Scored::new("");
        scored
            .set_severity(if positive {
                "depression risk (≥15)"
            } else {
                "below risk threshold"
            })
            .derive("scale", "CES-DC (≥15 suggests risk for depression)")
            .derive("total_score", whole_number(total));
        if positive {
            scored.flag("CES-DC positive screen (≥15)");
        }
        scored
    }
}
