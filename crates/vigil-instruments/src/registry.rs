//! Instrument registry: which questionnaire belongs to which clinical
//! domain, where its trend score lives, which way is worse, and how much
//! change counts as real.
//!
//! The registry is plain data. [`InstrumentRegistry::standard`] builds the
//! built-in table; a JSON file of the same shape can replace it.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use vigil_core::lenient;
use vigil_core::models::domain::{ClinicalDomain, Direction};
use vigil_core::models::record::MeasurementRecord;

use crate::compact_name;
use crate::error::InstrumentError;
use crate::severity::SeverityLexicon;

/// Derived fields tried, in order, when the configured path is empty.
pub const FALLBACK_DERIVED_FIELDS: [&str; 4] = ["total_score", "t_score", "index_score", "score"];

pub const DEFAULT_TOLERANCE: f64 = 3.0;

/// Where an instrument's trend score is read from: the record's raw score
/// or a (possibly nested) derived field, written `derived.<field>[.<field>]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ScorePath {
    RawScore,
    Derived(Vec<String>),
}

impl ScorePath {
    pub fn derived(field: &str) -> Self {
        Self::Derived(vec![field.to_string()])
    }

    /// Read the score this path points at. Missing or non-numeric is `None`.
    pub fn read(&self, record: &MeasurementRecord) -> Option<f64> {
        match self {
            Self::RawScore => record.raw_score,
            Self::Derived(segments) => {
                let (first, rest) = segments.split_first()?;
                let mut value = record.derived_fields.get(first)?;
                for segment in rest {
                    value = value.get(segment)?;
                }
                lenient::number_from_value(value)
            }
        }
    }
}

impl TryFrom<String> for ScorePath {
    type Error = InstrumentError;

    fn try_from(path: String) -> Result<Self, Self::Error> {
        let trimmed = path.trim();
        match trimmed {
            "raw_score" | "raw_total" => Ok(Self::RawScore),
            _ => {
                let segments: Vec<String> = trimmed
                    .strip_prefix("derived.")
                    .ok_or_else(|| InstrumentError::InvalidScorePath(path.clone()))?
                    .split('.')
                    .map(str::to_string)
                    .collect();
                if segments.iter().any(|s| s.is_empty()) {
                    return Err(InstrumentError::InvalidScorePath(path));
                }
                Ok(Self::Derived(segments))
            }
        }
    }
}

impl From<ScorePath> for String {
    fn from(path: ScorePath) -> Self {
        match path {
            ScorePath::RawScore => "raw_score".to_string(),
            ScorePath::Derived(segments) => format!("derived.{}", segments.join(".")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InstrumentConfig {
    pub id: String,
    pub label: String,
    /// A compacted questionnaire name matches if it contains any keyword...
    pub keywords: Vec<String>,
    /// ...and every one of these.
    #[serde(default)]
    pub requires: Vec<String>,
    #[serde(default = "default_direction")]
    pub direction: Direction,
    #[serde(default = "default_score_path")]
    #[ts(type = "string")]
    pub score_path: ScorePath,
}

fn default_direction() -> Direction {
    Direction::HigherWorse
}

fn default_score_path() -> ScorePath {
    ScorePath::derived("total_score")
}

impl InstrumentConfig {
    fn new(id: &str, label: &str, keywords: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            requires: Vec::new(),
            direction: default_direction(),
            score_path: default_score_path(),
        }
    }

    fn requiring(mut self, tokens: &[&str]) -> Self {
        self.requires = tokens.iter().map(|k| k.to_string()).collect();
        self
    }

    fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    fn score_path(mut self, path: ScorePath) -> Self {
        self.score_path = path;
        self
    }

    pub fn matches(&self, compact: &str) -> bool {
        self.keywords.iter().any(|k| compact.contains(&compact_name(k)))
            && self.requires.iter().all(|r| {
                // A `requires` entry may list alternatives separated by '|'.
                r.split('|').any(|alt| compact.contains(&compact_name(alt)))
            })
    }

    /// The trend score of a record: the configured path first, then the
    /// generic derived fields, then the raw score.
    pub fn extract_score(&self, record: &MeasurementRecord) -> Option<f64> {
        self.score_path
            .read(record)
            .or_else(|| {
                FALLBACK_DERIVED_FIELDS
                    .iter()
                    .find_map(|field| ScorePath::derived(field).read(record))
            })
            .or(record.raw_score)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DomainConfig {
    pub domain: ClinicalDomain,
    pub label: String,
    pub instruments: Vec<InstrumentConfig>,
}

/// A change-threshold entry; the first entry whose pattern appears in the
/// compacted instrument id applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ThresholdEntry {
    pub pattern: String,
    pub tolerance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InstrumentRegistry {
    pub domains: Vec<DomainConfig>,
    #[serde(default)]
    pub thresholds: Vec<ThresholdEntry>,
    #[serde(default = "default_tolerance")]
    pub default_tolerance: f64,
    #[serde(default)]
    pub severity: SeverityLexicon,
}

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}

/// A resolved instrument with its owning domain.
#[derive(Debug, Clone, Copy)]
pub struct Resolved<'a> {
    pub domain: &'a DomainConfig,
    pub instrument: &'a InstrumentConfig,
}

impl Default for InstrumentRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl InstrumentRegistry {
    /// The built-in registry.
    pub fn standard() -> Self {
        use ClinicalDomain::*;
        use Direction::*;

        let domains = vec![
            DomainConfig {
                domain: Depression,
                label: "Depression".into(),
                instruments: vec![
                    InstrumentConfig::new("phq9", "PHQ-9", &["phq"]),
                    InstrumentConfig::new("cesdc", "CES-DC", &["cesdc"]),
                    InstrumentConfig::new("promis_depression", "PROMIS Depression", &["promis"])
                        .requiring(&["depress"])
                        .score_path(ScorePath::derived("t_score")),
                ],
            },
            DomainConfig {
                domain: Anxiety,
                label: "Anxiety".into(),
                instruments: vec![
                    InstrumentConfig::new("gad7", "GAD-7", &["gad7"]),
                    InstrumentConfig::new("scared", "SCARED", &["scared"]),
                    InstrumentConfig::new("promis_anxiety", "PROMIS Anxiety", &["promis"])
                        .requiring(&["anxiety"])
                        .score_path(ScorePath::derived("t_score")),
                ],
            },
            DomainConfig {
                domain: Wellbeing,
                label: "Wellbeing".into(),
                instruments: vec![
                    InstrumentConfig::new("who5", "WHO-5", &["who5"])
                        .direction(LowerWorse)
                        .score_path(ScorePath::derived("index_score")),
                    InstrumentConfig::new("pedsql", "PedsQL", &["pedsql"]).direction(HigherBetter),
                    InstrumentConfig::new(
                        "promis_life_satisfaction",
                        "PROMIS Life Satisfaction",
                        &["promis"],
                    )
                    .requiring(&["life|satisf"])
                    .direction(HigherBetter)
                    .score_path(ScorePath::derived("t_score")),
                ],
            },
            DomainConfig {
                domain: SelfEsteem,
                label: "Self-esteem".into(),
                instruments: vec![
                    InstrumentConfig::new("rses", "RSES", &["rses", "rosenberg"])
                        .direction(HigherBetter),
                ],
            },
            DomainConfig {
                domain: Behaviour,
                label: "Behaviour".into(),
                instruments: vec![
                    InstrumentConfig::new("sdq", "SDQ", &["sdq"]),
                    InstrumentConfig::new("psc17", "PSC-17", &["psc"]),
                ],
            },
        ];

        let thresholds = [
            ("phq", 5.0),
            ("gad", 4.0),
            ("who5", 10.0),
            ("promis", 5.0),
            ("pedsql", 4.5),
            ("cesdc", 6.0),
            ("scared", 8.0),
            ("rses", 3.0),
            ("sdq", 3.0),
            ("psc", 3.0),
        ]
        .into_iter()
        .map(|(pattern, tolerance)| ThresholdEntry {
            pattern: pattern.into(),
            tolerance,
        })
        .collect();

        Self {
            domains,
            thresholds,
            default_tolerance: DEFAULT_TOLERANCE,
            severity: SeverityLexicon::standard(),
        }
    }

    /// Parse a registry from JSON.
    pub fn from_json(json: &str) -> Result<Self, InstrumentError> {
        let registry: Self = serde_json::from_str(json)?;
        registry.check()?;
        Ok(registry)
    }

    fn check(&self) -> Result<(), InstrumentError> {
        if self.domains.iter().all(|d| d.instruments.is_empty()) {
            return Err(InstrumentError::Registry(
                "registry defines no instruments".to_string(),
            ));
        }
        if let Some(bad) = self
            .thresholds
            .iter()
            .find(|t| !t.tolerance.is_finite() || t.tolerance < 0.0)
        {
            return Err(InstrumentError::Registry(format!(
                "tolerance for '{}' must be a non-negative number",
                bad.pattern
            )));
        }
        Ok(())
    }

    /// Resolve a free-text instrument name. Domains and instruments are
    /// tried in registration order; the first match wins.
    pub fn resolve(&self, name: &str) -> Option<Resolved<'_>> {
        let compact = compact_name(name);
        if compact.is_empty() {
            return None;
        }
        self.domains.iter().find_map(|domain| {
            domain
                .instruments
                .iter()
                .find(|i| i.matches(&compact))
                .map(|instrument| Resolved { domain, instrument })
        })
    }

    /// Minimum change that counts as a real trend for an instrument.
    pub fn tolerance_for(&self, instrument_id: &str) -> f64 {
        let compact = compact_name(instrument_id);
        self.thresholds
            .iter()
            .find(|t| compact.contains(&compact_name(&t.pattern)))
            .map(|t| t.tolerance)
            .unwrap_or(self.default_tolerance)
    }
}

/// Shared built-in registry.
pub fn standard_registry() -> &'static InstrumentRegistry {
    static STANDARD: LazyLock<InstrumentRegistry> = LazyLock::new(InstrumentRegistry::standard);
    &STANDARD
}
