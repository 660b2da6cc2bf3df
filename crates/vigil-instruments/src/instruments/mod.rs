pub mod cesdc;
pub mod gad7;
pub mod pedsql;
pub mod phq9;
pub mod promis;
pub mod psc17;
pub mod rses;
pub mod scared;
pub mod sdq;
pub mod who5;

use serde_json::{Map, Value, json};

use crate::preprocess::ItemGroup;

/// Summed answers for items whose dimension mentions one of the keywords.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SubscaleTotal {
    pub name: &'static str,
    pub total: f64,
    pub count: usize,
}

pub(crate) fn subscale_totals(
    group: &ItemGroup,
    mapping: &[(&'static str, &[&str])],
) -> Vec<SubscaleTotal> {
    mapping
        .iter()
        .map(|(name, keywords)| {
            let matching: Vec<f64> = group
                .responses
                .iter()
                .filter(|r| {
                    let dimension = r.dimension.to_lowercase();
                    keywords.iter().any(|k| dimension.contains(k))
                })
                .map(|r| r.answer)
                .collect();
            SubscaleTotal {
                name,
                total: matching.iter().sum::<f64>().trunc(),
                count: matching.len(),
            }
        })
        .collect()
}

pub(crate) fn subscale_total(subscales: &[SubscaleTotal], name: &str) -> f64 {
    subscales
        .iter()
        .find(|s| s.name == name)
        .map(|s| s.total)
        .unwrap_or(0.0)
}

pub(crate) fn subscales_json(subscales: &[SubscaleTotal]) -> Value {
    let map: Map<String, Value> = subscales
        .iter()
        .map(|s| {
            (
                s.name.to_string(),
                json!({ "total": s.total as i64, "count": s.count }),
            )
        })
        .collect();
    Value::Object(map)
}
