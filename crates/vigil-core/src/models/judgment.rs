use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

use crate::lenient;

/// External assessment of whether narrative claims are supported by facts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FactualJudgment {
    #[serde(default, deserialize_with = "lenient::flag")]
    pub pass: bool,
    #[serde(default, deserialize_with = "lenient::optional_number")]
    pub alignment_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient::optional_number")]
    pub trend_accuracy_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient::optional_number")]
    pub severity_accuracy_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient::optional_number")]
    pub risk_accuracy_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient::optional_number")]
    pub domain_coverage_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient::value_list")]
    pub unsupported_claims: Vec<Value>,
    #[serde(default, deserialize_with = "lenient::value_list")]
    pub missed_critical_info: Vec<Value>,
}

impl FactualJudgment {
    pub fn sub_scores(&self) -> [Option<f64>; 5] {
        [
            self.alignment_score,
            self.trend_accuracy_score,
            self.severity_accuracy_score,
            self.risk_accuracy_score,
            self.domain_coverage_score,
        ]
    }

    /// Lowest sub-score, ignoring absent and zero entries.
    pub fn min_sub_score(&self) -> Option<f64> {
        self.sub_scores()
            .into_iter()
            .flatten()
            .filter(|s| *s != 0.0)
            .fold(None, |min, s| Some(min.map_or(s, |m: f64| m.min(s))))
    }
}
