//! Severity and risk facts, per domain and across domains.

use vigil_core::models::domain::ClinicalDomain;
use vigil_core::models::facts::{
    DomainFacts, DomainRiskDigest, DomainSeverity, GlobalRiskSummary, RiskFacts, SeverityEntry,
};
use vigil_core::models::record::MeasurementRecord;
use vigil_instruments::severity::SeverityLexicon;

pub fn severity_entry(record: &MeasurementRecord, lexicon: &SeverityLexicon) -> SeverityEntry {
    let label = record.severity_label.clone();
    SeverityEntry {
        rank: label.as_deref().map_or(0, |l| lexicon.rank(l)),
        severe: lexicon.record_is_severe(label.as_deref(), &record.clinical_flags),
        label,
        timepoint: record.timepoint,
        date: record.date.clone(),
    }
}

/// Risk facts for one domain's ordered records. The worst entry is replaced
/// only by a strictly higher rank, so the earliest of equal ranks is kept.
pub fn domain_risk(records: &[&MeasurementRecord], lexicon: &SeverityLexicon) -> RiskFacts {
    let mut risk = RiskFacts::default();
    for record in records {
        let entry = severity_entry(record, lexicon);
        risk.historical_severe |= entry.severe;
        let replace = risk
            .worst_severity
            .as_ref()
            .is_none_or(|worst| entry.rank > worst.rank);
        if replace {
            risk.worst_severity = Some(entry.clone());
        }
        risk.latest_risk = Some(entry);
    }
    risk.current_severe = risk.latest_risk.as_ref().is_some_and(|e| e.severe);
    risk
}

/// Aggregate domain risk in registration order.
pub fn global_risk(domains: &[(ClinicalDomain, DomainFacts)]) -> GlobalRiskSummary {
    let mut summary = GlobalRiskSummary::default();
    for (domain, facts) in domains {
        let risk = &facts.risk;
        summary.historical_severe |= risk.historical_severe;
        summary.current_severe |= risk.current_severe;

        if let Some(entry) = &risk.worst_severity {
            let replace = summary
                .worst_severity
                .as_ref()
                .is_none_or(|worst| entry.rank > worst.entry.rank);
            if replace {
                summary.worst_severity = Some(DomainSeverity {
                    domain: *domain,
                    entry: entry.clone(),
                });
            }
        }

        summary.domains.push(DomainRiskDigest {
            domain: *domain,
            instrument: facts.instrument.clone(),
            historical_severe: risk.historical_severe,
            current_severe: risk.current_severe,
            worst_rank: risk.worst_severity.as_ref().map_or(0, |e| e.rank),
            latest_label: risk.latest_risk.as_ref().and_then(|e| e.label.clone()),
        });
    }
    summary
}
