//! Lexical feature extractors. Each works on a [`NarrativeText`] alone and
//! knows nothing about scoring.
//!
//! [`NarrativeText`]: crate::text::NarrativeText

pub mod action;
pub mod domains;
pub mod sections;
pub mod safety;
pub mod tone;
pub mod trend;
