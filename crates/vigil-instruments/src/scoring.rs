use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use ts_rs::TS;

/// Defines the valid range for an item answer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScoreRange {
    pub min: f64,
    pub max: f64,
    pub step: Option<f64>,
}

impl ScoreRange {
    pub const fn stepped(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            step: Some(1.0),
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        if value < self.min || value > self.max {
            return false;
        }
        if let Some(step) = self.step {
            let offset = value - self.min;
            let remainder = offset % step;
            // Allow floating point tolerance
            remainder < 1e-9 || (step - remainder) < 1e-9
        } else {
            true
        }
    }
}

/// An item answer outside its instrument's range.
#[derive(Debug, Clone, Serialize, Deserialize, TS, Error)]
#[ts(export)]
#[error("{message}")]
pub struct ValidationError {
    pub instrument_id: String,
    pub question: String,
    pub value: f64,
    pub expected_range: ScoreRange,
    pub message: String,
}

/// Output of one instrument scorer for one administration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scored {
    pub severity: String,
    pub clinical_flags: Vec<String>,
    pub derived: BTreeMap<String, Value>,
}

impl Scored {
    pub fn new(severity: impl Into<String>) -> Self {
        Self {
            severity: severity.into(),
            ..Self::default()
        }
    }

    pub fn flag(&mut self, flag: impl Into<String>) -> &mut Self {
        self.clinical_flags.push(flag.into());
        self
    }

    pub fn derive(&mut self, key: &str, value: impl Into<Value>) -> &mut Self {
        self.derived.insert(key.to_string(), value.into());
        self
    }

    pub fn set_severity(&mut self, severity: impl Into<String>) -> &mut Self {
        self.severity = severity.into();
        self.derived
            .insert("severity_level".to_string(), Value::String(self.severity.clone()));
        self
    }
}

/// A total as JSON: an integer when it has no fractional part.
pub fn whole_number(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        Value::from(value as i64)
    } else {
        Value::from(value)
    }
}

/// Round to `places` decimal places.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
