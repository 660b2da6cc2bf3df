//! vigil-gate
//!
//! Decision Gate and Retry Controller. Merges a narrative evaluation, the
//! case's global risk, and an external factual judgment into one auditable
//! publish/retry/escalate decision, then bounds how often a failing case is
//! sent back for regeneration.

pub mod config;
pub mod error;
pub mod gate;
pub mod judgment;
pub mod retry;

pub use config::GateConfig;
pub use gate::decide;
pub use retry::RetryController;
