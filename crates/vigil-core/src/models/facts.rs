use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::domain::{ClinicalDomain, Direction};
use crate::error::CoreError;

/// Version of the [`Facts`] contract between extraction and evaluation.
pub const FACTS_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Trend {
    Improving,
    Worsening,
    Stable,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum TrendConfidence {
    High,
    Moderate,
    Low,
    Insufficient,
}

impl TrendConfidence {
    /// Low and insufficient confidence should be acknowledged by a narrative.
    pub fn is_low(&self) -> bool {
        matches!(self, TrendConfidence::Low | TrendConfidence::Insufficient)
    }
}

/// Point-in-time view of one record inside a domain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Snapshot {
    pub timepoint: Option<f64>,
    pub date: Option<String>,
    pub score: Option<f64>,
    pub severity_label: Option<String>,
}

/// A ranked severity observation, kept with its timepoint/date for audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SeverityEntry {
    pub label: Option<String>,
    pub rank: u8,
    pub severe: bool,
    pub timepoint: Option<f64>,
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RiskFacts {
    pub historical_severe: bool,
    pub current_severe: bool,
    pub worst_severity: Option<SeverityEntry>,
    pub latest_risk: Option<SeverityEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScoreChange {
    pub diff: f64,
    /// `|diff|` as a percentage of the baseline; 0 when the baseline is not positive.
    pub percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum TimelineMethod {
    ActualDates,
    EstimatedFromTimepoints,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Timeline {
    pub period: String,
    pub span_days: i64,
    pub method: TimelineMethod,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct HistoryPoint {
    pub timepoint: Option<f64>,
    pub date: Option<String>,
    pub score: Option<f64>,
    pub severity_label: Option<String>,
    pub clinical_flags: Vec<String>,
    pub severe: bool,
}

/// Trend, severity, and risk facts for one populated clinical domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DomainFacts {
    pub instrument: String,
    pub instrument_label: String,
    pub direction: Direction,
    pub baseline: Snapshot,
    pub latest: Snapshot,
    pub trend: Trend,
    pub trend_confidence: TrendConfidence,
    pub recent_trend: Trend,
    pub is_consistent: bool,
    pub timepoints_used: usize,
    pub threshold_used: f64,
    pub risk: RiskFacts,
    pub change: Option<ScoreChange>,
    pub timeline: Timeline,
    pub severity_change: String,
    pub history: Vec<HistoryPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DomainSeverity {
    pub domain: ClinicalDomain,
    pub entry: SeverityEntry,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DomainRiskDigest {
    pub domain: ClinicalDomain,
    pub instrument: String,
    pub historical_severe: bool,
    pub current_severe: bool,
    pub worst_rank: u8,
    pub latest_label: Option<String>,
}

/// Risk aggregated over every populated domain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GlobalRiskSummary {
    pub historical_severe: bool,
    pub current_severe: bool,
    pub worst_severity: Option<DomainSeverity>,
    pub domains: Vec<DomainRiskDigest>,
}

impl GlobalRiskSummary {
    pub fn any_severe(&self) -> bool {
        self.current_severe || self.historical_severe
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TrendOverview {
    pub improving: usize,
    pub worsening: usize,
    pub stable: usize,
    pub unknown: usize,
}

impl TrendOverview {
    pub fn record(&mut self, trend: Trend) {
        match trend {
            Trend::Improving => self.improving += 1,
            Trend::Worsening => self.worsening += 1,
            Trend::Stable => self.stable += 1,
            Trend::Unknown => self.unknown += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FactsMetadata {
    pub schema_version: u32,
    pub generated_at: jiff::Timestamp,
    pub total_records: usize,
    pub recognized_records: usize,
    pub unrecognized_records: usize,
    pub instruments_seen: Vec<String>,
    pub trend_overview: TrendOverview,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum FactsStatus {
    Complete,
    /// No record carried a recognizable instrument.
    NoData,
}

/// Everything the extraction engine knows about one case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Facts {
    pub status: FactsStatus,
    pub domains: BTreeMap<ClinicalDomain, DomainFacts>,
    pub risk: GlobalRiskSummary,
    pub metadata: FactsMetadata,
}

impl Facts {
    /// The fail-closed result: no domains, no risk.
    pub fn no_data(generated_at: jiff::Timestamp, total_records: usize) -> Self {
        Self {
            status: FactsStatus::NoData,
            domains: BTreeMap::new(),
            risk: GlobalRiskSummary::default(),
            metadata: FactsMetadata {
                schema_version: FACTS_SCHEMA_VERSION,
                generated_at,
                total_records,
                recognized_records: 0,
                unrecognized_records: total_records,
                instruments_seen: Vec::new(),
                trend_overview: TrendOverview::default(),
            },
        }
    }

    /// Deserialize facts produced by another process, rejecting other
    /// contract versions.
    pub fn from_value(value: serde_json::Value) -> Result<Self, CoreError> {
        let version = value
            .get("metadata")
            .and_then(|m| m.get("schema_version"))
            .and_then(|v| v.as_u64())
            .ok_or_else(|| CoreError::MissingField("metadata.schema_version".to_string()))?;
        let version = u32::try_from(version).unwrap_or(u32::MAX);
        if version != FACTS_SCHEMA_VERSION {
            return Err(CoreError::UnsupportedSchema {
                found: version,
                expected: FACTS_SCHEMA_VERSION,
            });
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Domains whose trend confidence is low or insufficient.
    pub fn low_confidence_domains(&self) -> Vec<ClinicalDomain> {
        self.domains
            .iter()
            .filter(|(_, facts)| facts.trend_confidence.is_low())
            .map(|(domain, _)| *domain)
            .collect()
    }
}
