use std::cmp::Ordering;
use std::collections::BTreeMap;

use vigil_core::models::record::MeasurementRecord;
use vigil_instruments::registry::InstrumentRegistry;

/// Records bucketed by registry instrument id, each bucket in temporal order.
#[derive(Debug, Default)]
pub struct Grouped<'a> {
    pub by_instrument: BTreeMap<String, Vec<&'a MeasurementRecord>>,
    pub recognized: usize,
    pub unrecognized: usize,
    /// Registry ids in first-seen input order.
    pub instruments_seen: Vec<String>,
}

/// Ordering key: timepoint (missing counts as 0), then date (missing
/// first), then input position.
pub fn compare(a: (usize, &MeasurementRecord), b: (usize, &MeasurementRecord)) -> Ordering {
    let (pos_a, rec_a) = a;
    let (pos_b, rec_b) = b;
    rec_a
        .timepoint
        .unwrap_or(0.0)
        .total_cmp(&rec_b.timepoint.unwrap_or(0.0))
        .then_with(|| rec_a.date_value().cmp(&rec_b.date_value()))
        .then_with(|| pos_a.cmp(&pos_b))
}

pub fn group_records<'a>(
    records: &'a [MeasurementRecord],
    registry: &InstrumentRegistry,
) -> Grouped<'a> {
    let mut buckets: BTreeMap<String, Vec<(usize, &'a MeasurementRecord)>> = BTreeMap::new();
    let mut grouped = Grouped::default();

    for (position, record) in records.iter().enumerate() {
        let Some(resolved) = registry.resolve(&record.instrument) else {
            grouped.unrecognized += 1;
            continue;
        };
        grouped.recognized += 1;
        let id = &resolved.instrument.id;
        if !grouped.instruments_seen.contains(id) {
            grouped.instruments_seen.push(id.clone());
        }
        buckets.entry(id.clone()).or_default().push((position, record));
    }

    for (id, mut bucket) in buckets {
        bucket.sort_by(|a, b| compare(*a, *b));
        grouped
            .by_instrument
            .insert(id, bucket.into_iter().map(|(_, r)| r).collect());
    }
    grouped
}
