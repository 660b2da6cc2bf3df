use serde::Serialize;

use vigil_core::models::domain::ClinicalDomain;
use vigil_core::models::facts::{Facts, GlobalRiskSummary};
use vigil_instruments::registry::InstrumentRegistry;

use crate::ingest::LegacySummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextSource {
    Facts,
    LegacySummary,
}

/// What the evaluator needs to know about a case, whichever shape its
/// facts arrived in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationContext {
    pub source: ContextSource,
    /// Populated domains in registration order.
    pub populated: Vec<ClinicalDomain>,
    pub risk: GlobalRiskSummary,
    /// Domains with low or insufficient trend confidence; `None` when the
    /// source does not report confidence.
    pub low_confidence: Option<Vec<ClinicalDomain>>,
}

impl EvaluationContext {
    pub fn from_facts(facts: &Facts) -> Self {
        Self {
            source: ContextSource::Facts,
            populated: facts.domains.keys().copied().collect(),
            risk: facts.risk.clone(),
            low_confidence: Some(facts.low_confidence_domains()),
        }
    }

    /// Build a context from a per-questionnaire trend report. Questionnaires
    /// the registry cannot place are ignored; severity comes from the
    /// registry's severe-marker lexicon.
    pub fn from_legacy(summary: &LegacySummary, registry: &InstrumentRegistry) -> Self {
        let lexicon = &registry.severity;
        let mut found: Vec<ClinicalDomain> = Vec::new();
        let mut risk = GlobalRiskSummary::default();

        for trend in &summary.detailed_trends {
            let resolved = registry
                .resolve(&trend.questionnaire_key)
                .or_else(|| registry.resolve(&trend.questionnaire));
            if let Some(resolved) = resolved {
                found.push(resolved.domain.domain);
            }

            let latest_severity = trend.severity_analysis.latest_severity.as_deref();
            risk.historical_severe |= trend
                .history
                .iter()
                .any(|h| lexicon.record_is_severe(h.severity.as_deref(), &h.clinical_flags))
                || latest_severity.is_some_and(|s| lexicon.is_severe(s));
            risk.current_severe |= match trend.history.last() {
                Some(latest) => {
                    lexicon.record_is_severe(latest.severity.as_deref(), &latest.clinical_flags)
                }
                None => latest_severity.is_some_and(|s| lexicon.is_severe(s)),
            };
        }

        let populated = registry
            .domains
            .iter()
            .map(|d| d.domain)
            .filter(|d| found.contains(d))
            .fold(Vec::new(), |mut acc, d| {
                if !acc.contains(&d) {
                    acc.push(d);
                }
                acc
            });

        Self {
            source: ContextSource::LegacySummary,
            populated,
            risk,
            low_confidence: None,
        }
    }

    pub fn current_severe(&self) -> bool {
        self.risk.current_severe
    }

    pub fn historical_severe(&self) -> bool {
        self.risk.historical_severe
    }
}
