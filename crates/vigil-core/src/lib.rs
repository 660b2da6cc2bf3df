//! vigil-core
//!
//! Shared vocabulary of the vigil pipeline: measurement records, extracted
//! facts, narrative evaluations, factual judgments, and gate decisions.
//! No pipeline logic lives here.

pub mod error;
pub mod lenient;
pub mod models;
