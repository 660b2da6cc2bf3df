//! Severity lexicon: maps free-text severity labels onto an ordinal scale.
//!
//! Ranks run 0 (unknown) to 5 (most severe). Phrases are checked in order
//! and the first substring hit wins, so longer phrases precede the shorter
//! words they contain ("moderately severe" before "severe", "below
//! threshold" before "low").

use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub const UNKNOWN_RANK: u8 = 0;
pub const MAX_RANK: u8 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SeverityPhrase {
    pub phrase: String,
    pub rank: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SeverityLexicon {
    pub phrases: Vec<SeverityPhrase>,
    /// Keywords that mark an otherwise unmatched label as most severe.
    pub fallback_keywords: Vec<String>,
    /// Substrings that mark a label or clinical flag as severe.
    pub severe_markers: Vec<String>,
}

const STANDARD_PHRASES: &[(&str, u8)] = &[
    ("moderately severe", 4),
    ("significantly impaired", 5),
    ("high risk", 5),
    ("severe", 5),
    ("possible anxiety disorder", 4),
    ("depression risk", 4),
    ("positive screen", 4),
    ("abnormal", 4),
    ("very low", 4),
    ("noticeably below average", 3),
    ("reduced well-being", 3),
    ("moderate", 3),
    ("borderline", 2),
    ("slightly below norms", 2),
    ("mild", 2),
    ("below risk threshold", 1),
    ("below screening threshold", 1),
    ("below threshold", 1),
    ("low", 2),
    ("minimal", 1),
    ("within normal limits", 1),
    ("normal", 1),
    ("typical range", 1),
    ("adequate well-being", 1),
    ("average", 1),
    ("very high", 1),
    ("high", 1),
];

const STANDARD_FALLBACK: &[&str] = &["critical", "severe", "impaired", "high risk", "danger", "suicid"];

const STANDARD_SEVERE_MARKERS: &[&str] = &[
    "severe",
    "significantly impaired",
    "abnormal",
    "high risk",
    "critical",
    "suicid",
    "self-harm",
];

impl Default for SeverityLexicon {
    fn default() -> Self {
        Self::standard()
    }
}

impl SeverityLexicon {
    pub fn standard() -> Self {
        Self {
            phrases: STANDARD_PHRASES
                .iter()
                .map(|(phrase, rank)| SeverityPhrase {
                    phrase: phrase.to_string(),
                    rank: *rank,
                })
                .collect(),
            fallback_keywords: STANDARD_FALLBACK.iter().map(|s| s.to_string()).collect(),
            severe_markers: STANDARD_SEVERE_MARKERS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    /// Ordinal rank of a severity label; 0 when nothing matches.
    pub fn rank(&self, label: &str) -> u8 {
        let label = label.trim().to_lowercase();
        if label.is_empty() {
            return UNKNOWN_RANK;
        }
        if let Some(hit) = self.phrases.iter().find(|p| label.contains(&p.phrase)) {
            return hit.rank.min(MAX_RANK);
        }
        if self.fallback_keywords.iter().any(|k| label.contains(k)) {
            return MAX_RANK;
        }
        UNKNOWN_RANK
    }

    /// Whether a label or flag contains a severe marker.
    pub fn is_severe(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        self.severe_markers.iter().any(|m| text.contains(m))
    }

    /// Whether a record is severe by its label or any of its clinical flags.
    pub fn record_is_severe(&self, label: Option<&str>, flags: &[String]) -> bool {
        label.is_some_and(|l| self.is_severe(l)) || flags.iter().any(|f| self.is_severe(f))
    }
}
