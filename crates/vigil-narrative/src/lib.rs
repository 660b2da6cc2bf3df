//! vigil-narrative
//!
//! Narrative Evaluation Engine. Scores a generated narrative against the
//! facts it was written from: lexical features, weighted dimension scores,
//! and the hard safety rule for unacknowledged current risk.
//!
//! Every feature is an independent pure function over [`text::NarrativeText`]
//! so it can be tested on its own; [`score`] combines them.

pub mod context;
pub mod error;
pub mod evaluate;
pub mod features;
pub mod ingest;
pub mod score;
pub mod text;

pub use context::EvaluationContext;
pub use evaluate::{evaluate, evaluate_inputs};
