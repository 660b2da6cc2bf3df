//! vigil-instruments
//!
//! Clinical questionnaire definitions. Pure data and pure functions.
//! Holds the instrument registry (domains, score paths, trend directions,
//! change thresholds, severity lexicon) and the item-level scorers that turn
//! raw answers into measurement records.

pub mod error;
pub mod instruments;
pub mod preprocess;
pub mod registry;
pub mod scoring;
pub mod severity;

use preprocess::ItemGroup;
use scoring::{ScoreRange, Scored, ValidationError};

/// Trait implemented by each questionnaire scorer.
pub trait Instrument: Send + Sync {
    /// Unique identifier (e.g., "phq9", "who5").
    fn id(&self) -> &str;

    /// Human-readable name (e.g., "PHQ-9").
    fn name(&self) -> &str;

    /// Whether a compacted questionnaire name (see [`compact_name`]) refers
    /// to this instrument.
    fn matches(&self, compact: &str) -> bool;

    /// Valid range for a single item answer.
    fn item_range(&self) -> ScoreRange;

    /// Score one administration.
    fn score(&self, group: &ItemGroup) -> Scored;

    /// Report item answers outside [`Instrument::item_range`].
    fn validate_items(&self, group: &ItemGroup) -> Vec<ValidationError> {
        let range = self.item_range();
        group
            .responses
            .iter()
            .filter(|r| !range.contains(r.answer))
            .map(|r| ValidationError {
                instrument_id: self.id().to_string(),
                question: r.question.clone(),
                value: r.answer,
                expected_range: range,
                message: format!(
                    "{}: answer {} to '{}' is outside range [{}, {}]",
                    self.name(),
                    r.answer,
                    r.question,
                    range.min,
                    range.max,
                ),
            })
            .collect()
    }
}

/// Return all item-level scorers, in matching priority order.
pub fn all_instruments() -> Vec<Box<dyn Instrument>> {
    vec![
        Box::new(instruments::phq9::Phq9),
        Box::new(instruments::who5::Who5),
        Box::new(instruments::gad7::Gad7),
        Box::new(instruments::promis::Promis),
        Box::new(instruments::pedsql::PedsQl),
        Box::new(instruments::cesdc::CesDc),
        Box::new(instruments::scared::Scared),
        Box::new(instruments::rses::Rses),
        Box::new(instruments::sdq::Sdq),
        Box::new(instruments::psc17::Psc17),
    ]
}

/// Find the scorer for a free-text questionnaire name.
pub fn find_instrument(questionnaire: &str) -> Option<Box<dyn Instrument>> {
    let compact = compact_name(questionnaire);
    all_instruments().into_iter().find(|i| i.matches(&compact))
}

/// Lowercase and strip everything but ASCII letters and digits, so
/// "PHQ-9 (Patient Health Questionnaire)" and "phq9" compare equal.
pub fn compact_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
