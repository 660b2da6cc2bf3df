use serde_json::Value;
use tracing::info;

use vigil_core::models::evaluation::{DimensionScores, NarrativeEvaluation, SafetyGroup};
use vigil_instruments::registry::InstrumentRegistry;

use crate::context::EvaluationContext;
use crate::error::EvaluationError;
use crate::features::{action, domains, safety, sections, tone, trend};
use crate::ingest;
use crate::score;
use crate::text::NarrativeText;

/// Score one narrative against one case. Pure: the same inputs always give
/// the same evaluation.
pub fn evaluate(context: &EvaluationContext, narrative: &str) -> NarrativeEvaluation {
    let text = NarrativeText::new(narrative);

    let word_count = text.word_count();
    let domains_mentioned = domains::domain_mentions(&text);
    let domain_coverage = domains::coverage(&domains_mentioned, &context.populated);
    let any_domain_mentioned = domains_mentioned.values().any(|m| *m);
    let trend_term_count = trend::trend_term_count(&text);
    let trend_language = trend_term_count > 0;
    let confidence_language = trend::acknowledges_confidence(&text);
    let safety_matches = safety::scan(&text);
    let safety_cue_present = !safety_matches.is_empty();
    let professional_contact_present = safety::has_group(&safety_matches, SafetyGroup::Professional);
    let sections_found = sections::sections_found(&text);
    let action_count = action::action_count(&text);
    let empathy_present = tone::has_empathy(&text);
    let structure_markers = tone::structure_markers(&text);

    let low_confidence_acknowledged = context
        .low_confidence
        .as_ref()
        .is_none_or(|domains| domains.is_empty() || confidence_language);
    let safety = score::safety_score(
        context.current_severe(),
        context.historical_severe(),
        professional_contact_present,
        safety_cue_present,
    );

    let scores = DimensionScores {
        accuracy: score::NEUTRAL_ACCURACY,
        empathy: score::empathy_score(empathy_present),
        insight: score::insight_score(
            domain_coverage,
            trend_language,
            low_confidence_acknowledged,
            any_domain_mentioned,
        ),
        action: score::action_score(action_count),
        relevance: score::relevance_score(sections_found.len()),
        safety: safety.score,
        clarity: score::clarity_score(structure_markers),
        length: score::length_score(word_count),
    };
    let final_score = score::final_score(&scores, safety.hard_rule);

    info!(
        words = word_count,
        coverage = domain_coverage,
        safety_cues = safety_matches.len(),
        safety = scores.safety,
        hard_safety_rule = safety.hard_rule,
        score = final_score.score,
        rating = %final_score.rating,
        "narrative evaluated"
    );

    NarrativeEvaluation {
        word_count,
        domains_mentioned,
        domain_coverage,
        trend_language,
        trend_term_count,
        confidence_language,
        safety_cue_present,
        professional_contact_present,
        safety_matches,
        sections_found,
        action_count,
        empathy_present,
        structure_markers,
        hard_safety_rule: safety.hard_rule,
        scores,
        final_score,
    }
}

/// Locate facts and narrative in raw JSON inputs and evaluate them.
pub fn evaluate_inputs(
    facts: Option<&Value>,
    narrative: Option<&Value>,
    registry: &InstrumentRegistry,
) -> Result<NarrativeEvaluation, EvaluationError> {
    let prepared = ingest::prepare(facts, narrative, registry)?;
    Ok(evaluate(&prepared.context, &prepared.narrative.text))
}
