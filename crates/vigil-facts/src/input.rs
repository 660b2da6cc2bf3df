//! Record input envelopes.
//!
//! Records arrive as a bare array, as `{"records": [...]}`, or as the
//! workflow-engine item list `[{"json": {...}}, ...]`.

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use vigil_core::models::record::MeasurementRecord;

use crate::error::FactsError;

#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope {
    Wrapped { records: Vec<Value> },
    List(Vec<Value>),
}

fn unwrap_item(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.len() == 1 && map.get("json").is_some_and(Value::is_object) => {
            map.remove("json").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Parse measurement records out of any supported envelope. Entries that
/// are not objects are skipped with a warning.
pub fn load_records(input: Value) -> Result<Vec<MeasurementRecord>, FactsError> {
    let items = match serde_json::from_value::<Envelope>(input) {
        Ok(Envelope::Wrapped { records }) => records,
        Ok(Envelope::List(items)) => items,
        Err(_) => {
            return Err(FactsError::Envelope(
                "expected an array of records or an object with a 'records' array".to_string(),
            ));
        }
    };

    let mut records = Vec::with_capacity(items.len());
    for (position, item) in items.into_iter().map(unwrap_item).enumerate() {
        if !item.is_object() {
            warn!(position, "skipping non-object record");
            continue;
        }
        records.push(serde_json::from_value(item)?);
    }
    Ok(records)
}
