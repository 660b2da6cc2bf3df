use jiff::Timestamp;
use tracing::{debug, info};

use vigil_core::models::domain::ClinicalDomain;
use vigil_core::models::facts::{
    DomainFacts, FACTS_SCHEMA_VERSION, Facts, FactsMetadata, FactsStatus, Snapshot, TrendOverview,
};
use vigil_core::models::record::MeasurementRecord;
use vigil_instruments::registry::{InstrumentConfig, InstrumentRegistry};

use crate::group::group_records;
use crate::{risk, timeline, trend};

fn snapshot(record: &MeasurementRecord, score: Option<f64>) -> Snapshot {
    Snapshot {
        timepoint: record.timepoint,
        date: record.date.clone(),
        score,
        severity_label: record.severity_label.clone(),
    }
}

/// Facts for one instrument's ordered records, or `None` for an empty group.
pub fn domain_facts(
    config: &InstrumentConfig,
    records: &[&MeasurementRecord],
    registry: &InstrumentRegistry,
) -> Option<DomainFacts> {
    let (first, last) = (records.first()?, records.last()?);
    let scores: Vec<f64> = records
        .iter()
        .filter_map(|r| config.extract_score(r))
        .collect();
    let tolerance = registry.tolerance_for(&config.id);
    let analysis = trend::analyze(&scores, tolerance, config.direction);

    let baseline = snapshot(first, config.extract_score(first));
    let latest = snapshot(last, config.extract_score(last));
    let change = match (scores.first(), scores.last()) {
        (Some(a), Some(b)) if scores.len() >= 2 => Some(timeline::score_change(*a, *b)),
        _ => None,
    };

    Some(DomainFacts {
        instrument: config.id.clone(),
        instrument_label: config.label.clone(),
        direction: config.direction,
        trend: analysis.trend,
        trend_confidence: analysis.confidence,
        recent_trend: analysis.recent_trend,
        is_consistent: analysis.consistent,
        timepoints_used: scores.len(),
        threshold_used: tolerance,
        risk: risk::domain_risk(records, &registry.severity),
        change,
        timeline: timeline::timeline(&baseline, &latest),
        severity_change: timeline::severity_change(
            baseline.severity_label.as_deref(),
            latest.severity_label.as_deref(),
        ),
        history: timeline::history(records, config, &registry.severity),
        baseline,
        latest,
    })
}

/// Extract facts for one case.
///
/// Each domain takes the first registered instrument that has records.
/// Returns [`Facts::no_data`] when no record names a known instrument.
pub fn extract_facts(
    records: &[MeasurementRecord],
    registry: &InstrumentRegistry,
    generated_at: Timestamp,
) -> Facts {
    let grouped = group_records(records, registry);
    if grouped.recognized == 0 {
        info!(
            total = records.len(),
            "no recognizable instrument; returning no-data facts"
        );
        return Facts::no_data(generated_at, records.len());
    }

    let mut populated: Vec<(ClinicalDomain, DomainFacts)> = Vec::new();
    for domain in &registry.domains {
        if populated.iter().any(|(d, _)| *d == domain.domain) {
            continue;
        }
        let chosen = domain.instruments.iter().find_map(|config| {
            grouped
                .by_instrument
                .get(&config.id)
                .filter(|group| !group.is_empty())
                .map(|group| (config, group))
        });
        let Some((config, group)) = chosen else {
            continue;
        };
        if let Some(facts) = domain_facts(config, group, registry) {
            debug!(
                domain = %domain.domain,
                instrument = %config.id,
                records = group.len(),
                trend = ?facts.trend,
                confidence = ?facts.trend_confidence,
                "domain facts extracted"
            );
            populated.push((domain.domain, facts));
        }
    }

    let risk = risk::global_risk(&populated);
    let mut trend_overview = TrendOverview::default();
    for (_, facts) in &populated {
        trend_overview.record(facts.trend);
    }

    info!(
        total = records.len(),
        recognized = grouped.recognized,
        domains = populated.len(),
        current_severe = risk.current_severe,
        historical_severe = risk.historical_severe,
        "facts extracted"
    );

    Facts {
        status: FactsStatus::Complete,
        domains: populated.into_iter().collect(),
        risk,
        metadata: FactsMetadata {
            schema_version: FACTS_SCHEMA_VERSION,
            generated_at,
            total_records: records.len(),
            recognized_records: grouped.recognized,
            unrecognized_records: grouped.unrecognized,
            instruments_seen: grouped.instruments_seen,
            trend_overview,
        },
    }
}
