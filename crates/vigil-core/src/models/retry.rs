use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::decision::FailReason;

/// Retry state carried between gate runs for one case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "state", rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum RetryState {
    Attempting { attempt: u32 },
    /// Terminal. No further automatic retries.
    Escalated { attempts: u32, reason: String },
}

impl Default for RetryState {
    fn default() -> Self {
        RetryState::Attempting { attempt: 0 }
    }
}

/// What the orchestrator should do next.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "outcome", rename_all = "snake_case")]
#[ts(export)]
pub enum RetryOutcome {
    Publish {
        attempts: u32,
    },
    Regenerate {
        attempt: u32,
        prior_fail_reasons: Vec<FailReason>,
    },
    Escalated {
        attempts: u32,
        reason: String,
        prior_fail_reasons: Vec<FailReason>,
    },
}

impl RetryOutcome {
    /// State to persist after this outcome.
    pub fn next_state(&self) -> RetryState {
        match self {
            RetryOutcome::Publish { attempts } => RetryState::Attempting { attempt: *attempts },
            RetryOutcome::Regenerate { attempt, .. } => RetryState::Attempting { attempt: *attempt },
            RetryOutcome::Escalated {
                attempts, reason, ..
            } => RetryState::Escalated {
                attempts: *attempts,
                reason: reason.clone(),
            },
        }
    }
}
