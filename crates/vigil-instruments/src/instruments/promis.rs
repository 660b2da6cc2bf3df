use crate::preprocess::ItemGroup;
use crate::scoring::{ScoreRange, Scored, round_to, whole_number};
use crate::{Instrument, compact_name};

/// PROMIS pediatric and parent-proxy short forms (depression, anxiety,
/// life satisfaction). Items rated 1–5; the raw total converts to a T-score
/// (mean 50, SD 10) through the published lookup tables.
pub struct Promis;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    Depression,
    Anxiety,
    LifeSatisfaction,
}

impl Measure {
    pub fn detect(compact: &str) -> Option<Self> {
        if compact.contains("depress") {
            Some(Self::Depression)
        } else if compact.contains("anxiety") {
            Some(Self::Anxiety)
        } else if compact.contains("life") || compact.contains("satisf") {
            Some(Self::LifeSatisfaction)
        } else {
            None
        }
    }

    fn title(self) -> &'static str {
        match self {
            Self::Depression => "Depression",
            Self::Anxiety => "Anxiety",
            Self::LifeSatisfaction => "Life Satisfaction",
        }
    }

    fn table(self, parent: bool) -> &'static TScoreTable {
        match (self, parent) {
            (Self::Depression, false) => &DEPRESSION_PEDIATRIC,
            (Self::Depression, true) => &DEPRESSION_PARENT,
            (Self::Anxiety, false) => &ANXIETY_PEDIATRIC,
            (Self::Anxiety, true) => &ANXIETY_PARENT,
            (Self::LifeSatisfaction, false) => &LIFE_SATISFACTION_PEDIATRIC,
            (Self::LifeSatisfaction, true) => &LIFE_SATISFACTION_PARENT,
        }
    }
}

/// Consecutive raw totals starting at `first_raw`.
pub struct TScoreTable {
    first_raw: i64,
    t_scores: &'static [f64],
}

impl TScoreTable {
    pub fn lookup(&self, raw_total: f64) -> Option<f64> {
        let offset = (raw_total.trunc() as i64).checked_sub(self.first_raw)?;
        let offset = usize::try_from(offset).ok()?;
        self.t_scores.get(offset).copied()
    }

    fn last_raw(&self) -> i64 {
        self.first_raw + self.t_scores.len() as i64 - 1
    }
}

/// Convert a raw total for the named PROMIS form.
pub fn t_score(questionnaire: &str, raw_total: f64) -> Option<f64> {
    let compact = compact_name(questionnaire);
    let measure = Measure::detect(&compact)?;
    measure.table(compact.contains("parent")).lookup(raw_total)
}

/// Severity label for a T-score.
pub fn interpret(measure: Measure, t: f64) -> &'static str {
    match measure {
        Measure::Depression | Measure::Anxiety => match t {
            t if t <= 50.0 => "within normal limits",
            t if t <= 55.0 => "mild",
            t if t <= 65.0 => "moderate",
            _ => "severe",
        },
        Measure::LifeSatisfaction => match t {
            t if t >= 70.0 => "very high",
            t if t >= 60.0 => "high",
            t if t >= 40.0 => "average",
            t if t >= 30.0 => "low",
            _ => "very low",
        },
    }
}

fn capitalize(label: &str) -> String {
    label
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

impl Instrument for Promis {
    fn id(&self) -> &str {
        "promis"
    }

    fn name(&self) -> &str {
        "PROMIS"
    }

    fn matches(&self, compact: &str) -> bool {
        compact.contains("promis")
    }

    fn item_range(&self) -> ScoreRange {
        ScoreRange::stepped(1.0, 5.0)
    }

    fn score(&self, group: &ItemGroup) -> Scored {
        let compact = compact_name(&group.questionnaire);
        let parent = compact.contains("parent");
        let form = if parent { "Parent Proxy" } else { "Pediatric" };
        let total = group.total();

        let mut scored = Scored::new("");
        scored
            .derive("raw_score", whole_number(total))
            .derive("total_score", whole_number(total));

        let Some(measure) = Measure::detect(&compact) else {
            scored
                .set_severity("unknown PROMIS measure")
                .derive("scale", "PROMIS Pediatric T-score (mean 50, SD 10)")
                .derive("note", "Unknown PROMIS measure - cannot convert to T-score")
                .flag(format!(
                    "PROMIS raw total: {}. Unable to convert - unknown measure type.",
                    whole_number(total)
                ));
            return scored;
        };

        let (direction, note) = match measure {
            Measure::LifeSatisfaction => (
                "higher better",
                "Higher T-scores indicate better life satisfaction",
            ),
            Measure::Depression => (
                "higher worse",
                "Higher T-scores indicate more depression symptoms",
            ),
            Measure::Anxiety => ("higher worse", "Higher T-scores indicate more anxiety symptoms"),
        };
        scored
            .derive(
                "scale",
                format!(
                    "PROMIS {} {form} T-score (mean 50, SD 10, {direction})",
                    measure.title()
                ),
            )
            .derive("note", note);

        let table = measure.table(parent);
        let Some(t) = table.lookup(total) else {
            scored
                .set_severity("raw score outside conversion range")
                .flag(format!(
                    "PROMIS raw total {} outside conversion table range ({}-{})",
                    whole_number(total),
                    table.first_raw,
                    table.last_raw()
                ));
            return scored;
        };

        let severity = interpret(measure, t);
        let interpretation = capitalize(severity);
        scored
            .set_severity(severity)
            .derive("t_score", round_to(t, 1))
            .derive("interpretation", interpretation.clone());

        let title = measure.title();
        match measure {
            Measure::Depression | Measure::Anxiety => {
                if t > 65.0 {
                    scored.flag(format!(
                        "PROMIS {title} T-score {t:.1} (Severe - significant clinical concern)"
                    ));
                } else if t > 55.0 {
                    scored.flag(format!(
                        "PROMIS {title} T-score {t:.1} (Moderate - clinical attention warranted)"
                    ));
                } else if t > 50.0 {
                    scored.flag(format!("PROMIS {title} T-score {t:.1} (Mild - monitor)"));
                }
            }
            Measure::LifeSatisfaction => {
                if t < 30.0 {
                    scored.flag(format!(
                        "PROMIS {title} T-score {t:.1} (Very Low - significant concern)"
                    ));
                } else if t < 40.0 {
                    scored.flag(format!("PROMIS {title} T-score {t:.1} (Low - below average)"));
                }
            }
        }
        scored.flag(format!(
            "PROMIS {title}: Raw={}, T-score={t:.1} ({interpretation})",
            whole_number(total)
        ));
        scored
    }
}

const DEPRESSION_PEDIATRIC: TScoreTable = TScoreTable {
    first_raw: 8,
    t_scores: &[
        39.9, 46.9, 49.3, 51.0, 52.4, 53.6, 54.6, 55.6,
        56.5, 57.4, 58.3, 59.1, 60.0, 60.8, 61.7, 62.5,
        63.3, 64.1, 64.9, 65.7, 66.5, 67.3, 68.0, 68.8,
        69.6, 70.4, 71.2, 72.1, 73.1, 74.2, 75.5, 77.2,
        80.3,
    ],
};

const ANXIETY_PEDIATRIC: TScoreTable = TScoreTable {
    first_raw: 8,
    t_scores: &[
        39.0, 45.4, 47.8, 49.6, 51.0, 52.2, 53.3, 54.4,
        55.3, 56.3, 57.2, 58.1, 59.0, 59.9, 60.8, 61.7,
        62.6, 63.4, 64.3, 65.1, 65.9, 66.8, 67.6, 68.4,
        69.2, 70.0, 70.9, 71.8, 72.8, 73.9, 75.2, 76.7,
        79.8,
    ],
};

const LIFE_SATISFACTION_PEDIATRIC: TScoreTable = TScoreTable {
    first_raw: 8,
    t_scores: &[
        20.5, 23.6, 25.3, 26.7, 27.9, 28.9, 29.9, 30.7,
        31.6, 32.5, 33.3, 34.1, 34.9, 35.8, 36.6, 37.4,
        38.3, 39.1, 40.0, 40.9, 41.9, 42.9, 43.9, 44.9,
        45.9, 46.9, 48.1, 49.2, 50.5, 52.0, 53.9, 56.7,
        62.5,
    ],
};

const DEPRESSION_PARENT: TScoreTable = TScoreTable {
    first_raw: 6,
    t_scores: &[
        40.8, 48.2, 51.1, 53.2, 54.9, 56.4, 57.9, 59.2,
        60.6, 61.9, 63.2, 64.6, 65.9, 67.1, 68.3, 69.6,
        70.7, 71.9, 73.0, 74.2, 75.4, 76.7, 78.2, 79.8,
        82.7,
    ],
};

const ANXIETY_PARENT: TScoreTable = TScoreTable {
    first_raw: 8,
    t_scores: &[
        38.8, 45.2, 48.0, 49.9, 51.5, 52.8, 54.0, 55.2,
        56.3, 57.3, 58.4, 59.4, 60.4, 61.4, 62.5, 63.4,
        64.4, 65.3, 66.3, 67.2, 68.1, 69.0, 69.9, 70.8,
        71.7, 72.6, 73.5, 74.5, 75.6, 76.8, 78.2, 80.0,
        82.7,
    ],
};

const LIFE_SATISFACTION_PARENT: TScoreTable = TScoreTable {
    first_raw: 8,
    t_scores: &[
        18.5, 21.4, 22.9, 24.1, 25.2, 26.1, 27.0, 27.8,
        28.6, 29.4, 30.2, 31.0, 31.8, 32.7, 33.5, 34.4,
        35.3, 36.2, 37.2, 38.2, 39.2, 40.3, 41.5, 42.7,
        43.9, 45.1, 46.4, 47.7, 49.1, 50.6, 52.5, 55.2,
        61.5,
    ],
};
