use serde_json::{Map, Value, json};

use crate::Instrument;
use crate::instruments::{subscale_total, subscale_totals, subscales_json};
use crate::preprocess::ItemGroup;
use crate::scoring::{ScoreRange, Scored, whole_number};

/// SDQ: Strengths and Difficulties Questionnaire. 25 items rated 0–2 across
/// five subscales; total difficulties (0–40) excludes prosocial.
pub struct Sdq;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SdqVersion {
    SelfCompleted,
    Parent,
}

impl SdqVersion {
    /// Youth self-report unless the questionnaire name says parent or teacher.
    pub fn detect(questionnaire: &str) -> Self {
        let name = questionnaire.to_lowercase();
        if ["youth", "self", "adolescent"].iter().any(|k| name.contains(k)) {
            Self::SelfCompleted
        } else if name.contains("parent") || name.contains("teacher") {
            Self::Parent
        } else {
            Self::SelfCompleted
        }
    }

    fn key(self) -> &'static str {
        match self {
            Self::SelfCompleted => "self_completed",
            Self::Parent => "parent",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    Normal,
    Borderline,
    Abnormal,
}

impl Band {
    fn key(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Borderline => "borderline",
            Self::Abnormal => "abnormal",
        }
    }
}

/// Inclusive `(normal, borderline)` ranges; anything else is abnormal.
type Cutoffs = ((f64, f64), (f64, f64));

fn cutoffs(version: SdqVersion, scale: &str) -> Cutoffs {
    match (version, scale) {
        (SdqVersion::SelfCompleted, "total_difficulties") => ((0.0, 15.0), (16.0, 19.0)),
        (SdqVersion::SelfCompleted, "emotional") => ((0.0, 5.0), (6.0, 6.0)),
        (SdqVersion::SelfCompleted, "conduct") => ((0.0, 3.0), (4.0, 4.0)),
        (SdqVersion::SelfCompleted, "peer_problems") => ((0.0, 3.0), (4.0, 5.0)),
        (SdqVersion::Parent, "total_difficulties") => ((0.0, 13.0), (14.0, 16.0)),
        (SdqVersion::Parent, "emotional") => ((0.0, 3.0), (4.0, 4.0)),
        (SdqVersion::Parent, "conduct") => ((0.0, 2.0), (3.0, 3.0)),
        (SdqVersion::Parent, "peer_problems") => ((0.0, 2.0), (3.0, 3.0)),
        (_, "prosocial") => ((6.0, 10.0), (5.0, 5.0)),
        // hyperactivity is the same for both versions
        _ => ((0.0, 5.0), (6.0, 6.0)),
    }
}

pub fn band(version: SdqVersion, scale: &str, score: f64) -> Band {
    let ((normal_lo, normal_hi), (border_lo, border_hi)) = cutoffs(version, scale);
    if (normal_lo..=normal_hi).contains(&score) {
        Band::Normal
    } else if (border_lo..=border_hi).contains(&score) {
        Band::Borderline
    } else {
        Band::Abnormal
    }
}

fn interpretation(scale: &str, band: Band) -> &'static str {
    let prosocial = scale == "prosocial";
    match band {
        Band::Normal => {
            "close to average - clinically significant problems in this area are unlikely"
        }
        Band::Borderline if prosocial => {
            "slightly low, which may reflect clinically significant problems"
        }
        Band::Borderline => "slightly raised, which may reflect clinically significant problems",
        Band::Abnormal if prosocial => {
            "low - there is a substantial risk of clinically significant problems in this area"
        }
        Band::Abnormal => {
            "high - there is a substantial risk of clinically significant problems in this area"
        }
    }
}

const SUBSCALES: [(&str, &[&str]); 5] = [
    ("Emotional", &["emotional"]),
    ("Conduct", &["conduct"]),
    ("Hyperactivity/Inattention", &["hyperactivity", "inattention"]),
    ("Peer Problems", &["peer"]),
    ("Prosocial", &["prosocial"]),
];

fn title(key: &str) -> String {
    key.split('_')
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

impl Instrument for Sdq {
    fn id(&self) -> &str {
        "sdq"
    }

    fn name(&self) -> &str {
        "SDQ"
    }

    fn matches(&self, compact: &str) -> bool {
        compact.contains("sdq")
    }

    fn item_range(&self) -> ScoreRange {
        ScoreRange::stepped(0.0, 2.0)
    }

    fn score(&self, group: &ItemGroup) -> Scored {
        let version = SdqVersion::detect(&group.questionnaire);
        let subscales = subscale_totals(group, &SUBSCALES);
        let emotional = subscale_total(&subscales, "Emotional");
        let conduct = subscale_total(&subscales, "Conduct");
        let hyperactivity = subscale_total(&subscales, "Hyperactivity/Inattention");
        let peer = subscale_total(&subscales, "Peer Problems");
        let prosocial = subscale_total(&subscales, "Prosocial");
        let total_difficulties = emotional + conduct + hyperactivity + peer;

        let scores = [
            ("total_difficulties", total_difficulties),
            ("emotional", emotional),
            ("conduct", conduct),
            ("hyperactivity", hyperactivity),
            ("peer_problems", peer),
            ("prosocial", prosocial),
        ];

        let mut raw_scores = Map::new();
        let mut interpretations = Map::new();
        interpretations.insert("version".into(), Value::from(version.key()));
        let mut abnormal = Vec::new();
        for (scale, score) in scores {
            let level = band(version, scale, score);
            raw_scores.insert(scale.into(), whole_number(score));
            interpretations.insert(
                scale.into(),
                json!({
                    "score": whole_number(score),
                    "band": level.key(),
                    "interpretation": interpretation(scale, level),
                }),
            );
            if level == Band::Abnormal {
                abnormal.push(format!(
                    "SDQ {}: {} - {}",
                    title(scale),
                    whole_number(score),
                    interpretation(scale, level)
                ));
            }
        }

        let scale = match version {
            SdqVersion::SelfCompleted => {
                "SDQ Total Difficulties - Self-Completed (0-15 normal, 16-19 borderline, 20-40 abnormal)"
            }
            SdqVersion::Parent => {
                "SDQ Total Difficulties - Parent/Teacher (0-13 normal, 14-16 borderline, 17-40 abnormal)"
            }
        };

        let mut scored = Scored::new("");
        scored
            .set_severity(band(version, "total_difficulties", total_difficulties).key())
            .derive("scale", scale)
            .derive("total_score", whole_number(total_difficulties))
            .derive("raw_scores", Value::Object(raw_scores))
            .derive("subscales", subscales_json(&subscales))
            .derive("interpretations", Value::Object(interpretations));
        for flag in abnormal {
            scored.flag(flag);
        }
        scored
    }
}
