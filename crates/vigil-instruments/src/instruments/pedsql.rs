use serde_json::{Map, Value, json};

use crate::Instrument;
use crate::preprocess::ItemGroup;
use crate::scoring::{ScoreRange, Scored, round_to, whole_number};

/// PedsQL 4.0 Generic Core. 23 items rated 0–4, reverse-transformed to
/// 0–100. Interpretation bands the psychosocial-to-total ratio.
pub struct PedsQl;

/// Dimension name, first and last item number, expected item count.
const DIMENSIONS: [(&str, u32, u32); 4] = [
    ("Physical", 1, 8),
    ("Emotional", 9, 13),
    ("Social", 14, 18),
    ("School", 19, 23),
];

fn transform(raw: f64) -> Option<f64> {
    match raw.trunc() as i64 {
        0 => Some(100.0),
        1 => Some(75.0),
        2 => Some(50.0),
        3 => Some(25.0),
        4 => Some(0.0),
        _ => None,
    }
}

/// Leading item number of a question such as "12. Feeling sad".
fn question_number(question: &str) -> Option<u32> {
    let digits: String = question
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// `(severity, interpretation, mental health status)` for a ratio.
pub fn interpret_ratio(ratio: f64) -> (&'static str, &'static str, &'static str) {
    if ratio >= 80.0 {
        ("typical range", "Typical range", "Normal wellbeing")
    } else if ratio >= 70.0 {
        (
            "slightly below norms",
            "Slightly below norms",
            "Mild emotional or adjustment difficulties",
        )
    } else if ratio >= 60.0 {
        (
            "noticeably below average",
            "Noticeably below average",
            "Possible clinical concern - monitor or screen further",
        )
    } else {
        (
            "significantly impaired",
            "Significantly impaired",
            "Likely emotional/mental-health problems",
        )
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

impl Instrument for PedsQl {
    fn id(&self) -> &str {
        "pedsql"
    }

    fn name(&self) -> &str {
        "PedsQL"
    }

    fn matches(&self, compact: &str) -> bool {
        compact.contains("pedsql")
    }

    fn item_range(&self) -> ScoreRange {
        ScoreRange::stepped(0.0, 4.0)
    }

    fn score(&self, group: &ItemGroup) -> Scored {
        let mut buckets: [Vec<f64>; 4] = Default::default();
        for response in &group.responses {
            let (Some(value), Some(number)) =
                (transform(response.answer), question_number(&response.question))
            else {
                continue;
            };
            if let Some(slot) = DIMENSIONS
                .iter()
                .position(|(_, first, last)| (*first..=*last).contains(&number))
            {
                buckets[slot].push(value);
            }
        }

        let mut dimension_scores = Map::new();
        let mut total_pool = Vec::new();
        let mut psychosocial_pool = Vec::new();
        let mut insufficient = Vec::new();
        for ((name, first, last), scores) in DIMENSIONS.iter().zip(&buckets) {
            let expected = (last - first + 1) as usize;
            let answered = scores.len();
            let completion = round_to(answered as f64 / expected as f64 * 100.0, 1);
            if answered as f64 >= expected as f64 * 0.5 && answered > 0 {
                dimension_scores.insert(
                    name.to_string(),
                    json!({
                        "score": round_to(mean(scores), 2),
                        "items_answered": answered,
                        "items_expected": expected,
                        "completion_rate": completion,
                    }),
                );
                total_pool.extend_from_slice(scores);
                if *name != "Physical" {
                    psychosocial_pool.extend_from_slice(scores);
                }
            } else {
                dimension_scores.insert(
                    name.to_string(),
                    json!({
                        "score": Value::Null,
                        "items_answered": answered,
                        "items_expected": expected,
                        "completion_rate": completion,
                        "reason": "Insufficient data (>50% missing)",
                    }),
                );
                insufficient.push(format!(
                    "PedsQL {name}: Insufficient data ({completion}% complete, need ≥50%)"
                ));
            }
        }

        let mut scored = Scored::new("");
        scored
            .derive("scale", "PedsQL Psychosocial/Total Score (0-100, higher better)")
            .derive(
                "note",
                "Scores reverse-transformed: 0→100, 1→75, 2→50, 3→25, 4→0. Interpretation based on Psychosocial/Total Score ratio",
            )
            .derive("dimension_scores", Value::Object(dimension_scores))
            .derive("raw_total", whole_number(group.total()));

        if total_pool.is_empty() || psychosocial_pool.is_empty() {
            scored
                .set_severity("insufficient valid responses")
                .flag("PedsQL: No valid responses in 0-4 range for transformation");
            return scored;
        }

        let total_score = mean(&total_pool);
        let psychosocial = mean(&psychosocial_pool);
        let ratio = if total_score > 0.0 {
            psychosocial / total_score * 100.0
        } else {
            0.0
        };
        let (severity, interpretation, status) = interpret_ratio(ratio);

        scored
            .set_severity(severity)
            .derive("total_score", round_to(total_score, 2))
            .derive("psychosocial_score", round_to(psychosocial, 2))
            .derive("psychosocial_total_ratio", round_to(ratio, 2))
            .derive("interpretation", interpretation)
            .derive("mental_health_status", status);

        if ratio < 60.0 {
            scored.flag(format!(
                "PedsQL Psychosocial/Total Score {ratio:.1} < 60 (significantly impaired - likely emotional/mental-health problems)"
            ));
        } else if ratio < 70.0 {
            scored.flag(format!(
                "PedsQL Psychosocial/Total Score {ratio:.1} (60-69: noticeably below average - possible clinical concern)"
            ));
        } else if ratio < 80.0 {
            scored.flag(format!(
                "PedsQL Psychosocial/Total Score {ratio:.1} (70-79: slightly below norms - mild emotional/adjustment difficulties)"
            ));
        }
        scored.flag(format!(
            "PedsQL Total Score: {total_score:.1}, Psychosocial Score: {psychosocial:.1}, Ratio: {ratio:.1}%"
        ));
        for flag in insufficient {
            scored.flag(flag);
        }
        scored
    }
}
