//! Gate thresholds and retry budget, overridable from the environment.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use vigil_core::models::decision::GateThresholds;
use vigil_core::models::evaluation::Rating;

use crate::error::GateError;

pub const DEFAULT_MAX_RETRIES: u32 = 3;

pub const ENV_HEURISTIC_MIN_SCORE: &str = "VIGIL_HEURISTIC_MIN_SCORE";
pub const ENV_HEURISTIC_SAFETY_MIN: &str = "VIGIL_HEURISTIC_SAFETY_MIN";
pub const ENV_FACTUAL_MIN_SCORE: &str = "VIGIL_FACTUAL_MIN_SCORE";
pub const ENV_ACCEPTABLE_RATINGS: &str = "VIGIL_ACCEPTABLE_RATINGS";
pub const ENV_MAX_RETRIES: &str = "VIGIL_MAX_RETRIES";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateConfig {
    #[serde(flatten)]
    pub thresholds: GateThresholds,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            thresholds: GateThresholds::default(),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

fn parse<T: FromStr>(var: &str, value: &str) -> Result<T, GateError>
where
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| GateError::InvalidOverride {
        var: var.to_string(),
        value: value.to_string(),
        reason: e.to_string(),
    })
}

fn parse_ratings(var: &str, value: &str) -> Result<Vec<Rating>, GateError> {
    let ratings = value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| parse::<Rating>(var, s))
        .collect::<Result<Vec<_>, _>>()?;
    if ratings.is_empty() {
        return Err(GateError::InvalidOverride {
            var: var.to_string(),
            value: value.to_string(),
            reason: "no ratings listed".to_string(),
        });
    }
    Ok(ratings)
}

impl GateConfig {
    /// Apply `VIGIL_*` overrides read through `lookup`. Unset variables
    /// leave the current value alone; malformed ones are an error.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, GateError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup(ENV_HEURISTIC_MIN_SCORE) {
            self.thresholds.heuristic_min_score = parse(ENV_HEURISTIC_MIN_SCORE, &v)?;
        }
        if let Some(v) = lookup(ENV_HEURISTIC_SAFETY_MIN) {
            self.thresholds.heuristic_safety_min = parse(ENV_HEURISTIC_SAFETY_MIN, &v)?;
        }
        if let Some(v) = lookup(ENV_FACTUAL_MIN_SCORE) {
            self.thresholds.factual_min_score = parse(ENV_FACTUAL_MIN_SCORE, &v)?;
        }
        if let Some(v) = lookup(ENV_ACCEPTABLE_RATINGS) {
            self.thresholds.acceptable_ratings = parse_ratings(ENV_ACCEPTABLE_RATINGS, &v)?;
        }
        if let Some(v) = lookup(ENV_MAX_RETRIES) {
            self.max_retries = parse(ENV_MAX_RETRIES, &v)?;
        }
        Ok(self)
    }

    /// Apply overrides from the process environment.
    pub fn from_env(self) -> Result<Self, GateError> {
        self.with_overrides(|var| std::env::var(var).ok())
    }
}
