//! Bounded retry policy.
//!
//! `Attempting(n)` counts regenerations already issued. A failed decision
//! at `n >= max_retries` escalates; escalation is terminal.

use tracing::{info, warn};

use vigil_core::models::decision::Decision;
use vigil_core::models::retry::{RetryOutcome, RetryState};

use crate::config::{DEFAULT_MAX_RETRIES, GateConfig};

pub const MAX_RETRIES_EXCEEDED: &str = "max retries exceeded";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryController {
    pub max_retries: u32,
}

impl Default for RetryController {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RETRIES)
    }
}

impl RetryController {
    pub fn new(max_retries: u32) -> Self {
        Self { max_retries }
    }

    pub fn from_config(config: &GateConfig) -> Self {
        Self::new(config.max_retries)
    }

    /// What to do after `decision`, given the case's persisted state.
    pub fn next(&self, state: &RetryState, decision: &Decision) -> RetryOutcome {
        let attempt = match state {
            RetryState::Escalated { attempts, reason } => {
                return RetryOutcome::Escalated {
                    attempts: *attempts,
                    reason: reason.clone(),
                    prior_fail_reasons: decision.fail_reasons.clone(),
                };
            }
            RetryState::Attempting { attempt } => *attempt,
        };

        if decision.pass {
            info!(attempt, "decision passed; publishing");
            return RetryOutcome::Publish { attempts: attempt };
        }
        if attempt >= self.max_retries {
            warn!(
                attempt,
                max_retries = self.max_retries,
                "retry budget exhausted; escalating"
            );
            return RetryOutcome::Escalated {
                attempts: attempt,
                reason: MAX_RETRIES_EXCEEDED.to_string(),
                prior_fail_reasons: decision.fail_reasons.clone(),
            };
        }

        let next = attempt + 1;
        info!(
            attempt = next,
            max_retries = self.max_retries,
            fail_reasons = decision.fail_reasons.len(),
            "regenerating narrative"
        );
        RetryOutcome::Regenerate {
            attempt: next,
            prior_fail_reasons: decision.fail_reasons.clone(),
        }
    }
}
