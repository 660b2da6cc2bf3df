//! vigil-facts
//!
//! Fact Extraction Engine. Turns an unordered bag of measurement records for
//! one case into per-domain trend, severity, and risk facts plus a global
//! risk summary. Also hosts the pre-extraction data-quality checkpoint.

pub mod error;
pub mod extract;
pub mod group;
pub mod input;
pub mod risk;
pub mod timeline;
pub mod trend;
pub mod validate;

pub use extract::extract_facts;
pub use input::load_records;
