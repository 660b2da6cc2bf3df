use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::domain::ClinicalDomain;

/// Letter rating derived from the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Rating {
    A,
    B,
    C,
    D,
    F,
}

impl Rating {
    pub fn from_score(score: f64) -> Self {
        if score >= 4.5 {
            Rating::A
        } else if score >= 3.5 {
            Rating::B
        } else if score >= 2.5 {
            Rating::C
        } else if score >= 1.5 {
            Rating::D
        } else {
            Rating::F
        }
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let letter = match self {
            Rating::A => "A",
            Rating::B => "B",
            Rating::C => "C",
            Rating::D => "D",
            Rating::F => "F",
        };
        f.write_str(letter)
    }
}

impl std::str::FromStr for Rating {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(Rating::A),
            "B" => Ok(Rating::B),
            "C" => Ok(Rating::C),
            "D" => Ok(Rating::D),
            "F" => Ok(Rating::F),
            other => Err(format!("unknown rating '{other}'")),
        }
    }
}

/// Phrase categories showing that a narrative addressed risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum SafetyGroup {
    Urgent,
    HighRisk,
    Professional,
    Monitor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SafetyMatch {
    pub group: SafetyGroup,
    pub phrase: String,
    /// Byte offset of the phrase in the narrative.
    pub offset: usize,
    pub context: String,
}

/// Sections a release-ready narrative is expected to contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Section {
    CurrentPicture,
    Trends,
    FlagsAndRisks,
    Strengths,
    Recommendations,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::CurrentPicture,
        Section::Trends,
        Section::FlagsAndRisks,
        Section::Strengths,
        Section::Recommendations,
    ];
}

/// Per-dimension scores, each on a 1–5 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DimensionScores {
    pub accuracy: u8,
    pub empathy: u8,
    pub insight: u8,
    pub action: u8,
    pub relevance: u8,
    pub safety: u8,
    pub clarity: u8,
    pub length: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FinalScore {
    pub score: f64,
    pub percentage: f64,
    pub rating: Rating,
}

/// Lexical assessment of one narrative against one case's facts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NarrativeEvaluation {
    pub word_count: usize,
    pub domains_mentioned: BTreeMap<ClinicalDomain, bool>,
    pub domain_coverage: f64,
    pub trend_language: bool,
    pub trend_term_count: usize,
    pub confidence_language: bool,
    pub safety_cue_present: bool,
    pub professional_contact_present: bool,
    pub safety_matches: Vec<SafetyMatch>,
    pub sections_found: Vec<Section>,
    pub action_count: usize,
    pub empathy_present: bool,
    pub structure_markers: usize,
    /// Current severe risk without a professional-contact phrase.
    pub hard_safety_rule: bool,
    pub scores: DimensionScores,
    #[serde(rename = "final")]
    pub final_score: FinalScore,
}
