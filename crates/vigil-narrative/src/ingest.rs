//! Ingestion boundary.
//!
//! Facts arrive either as the versioned [`Facts`] contract or as the older
//! per-questionnaire trend report. [`classify_facts`] decides which, once,
//! and says why when it is neither. Narrative text is located inside the
//! known response envelopes of text-generation services.

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use vigil_core::lenient;
use vigil_core::models::facts::Facts;
use vigil_instruments::registry::InstrumentRegistry;

use crate::context::EvaluationContext;
use crate::error::{Diagnostic, EvaluationError};

/// Keys followed, in order, when looking for narrative text.
const TEXT_KEYS: [&str; 13] = [
    "narrative",
    "text",
    "content",
    "message",
    "choices",
    "output",
    "response",
    "result",
    "data",
    "body",
    "json",
    "candidates",
    "parts",
];
const MAX_TEXT_DEPTH: usize = 6;
const MAX_UNWRAP: usize = 3;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LegacySummary {
    #[serde(default)]
    pub detailed_trends: Vec<LegacyTrend>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LegacyTrend {
    #[serde(default, deserialize_with = "lenient::text")]
    pub questionnaire: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub questionnaire_key: String,
    #[serde(default)]
    pub score_analysis: LegacyScoreAnalysis,
    #[serde(default)]
    pub severity_analysis: LegacySeverityAnalysis,
    #[serde(default)]
    pub history: Vec<LegacyHistoryEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LegacyScoreAnalysis {
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub trend_direction: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LegacySeverityAnalysis {
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub latest_severity: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LegacyHistoryEntry {
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub severity: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub clinical_flags: Vec<String>,
}

/// The facts input after shape detection.
#[derive(Debug, Clone, PartialEq)]
pub enum FactsInput {
    Facts(Box<Facts>),
    Legacy(LegacySummary),
    Unrecognized { reason: String },
}

impl FactsInput {
    pub fn shape(&self) -> &'static str {
        match self {
            FactsInput::Facts(_) => "facts",
            FactsInput::Legacy(_) => "legacy_summary",
            FactsInput::Unrecognized { .. } => "unrecognized",
        }
    }

    pub fn context(&self, registry: &InstrumentRegistry) -> Option<EvaluationContext> {
        match self {
            FactsInput::Facts(facts) => Some(EvaluationContext::from_facts(facts)),
            FactsInput::Legacy(summary) => Some(EvaluationContext::from_legacy(summary, registry)),
            FactsInput::Unrecognized { .. } => None,
        }
    }
}

fn keys(value: &Value) -> Vec<String> {
    value
        .as_object()
        .map(|map| map.keys().cloned().collect())
        .unwrap_or_default()
}

/// Strip workflow wrappers: a one-element item list, `{"json": {...}}`, and
/// `{"facts": {...}}`.
fn unwrap_envelope(mut value: &Value) -> &Value {
    for _ in 0..MAX_UNWRAP {
        let inner = match value {
            Value::Array(items) if items.len() == 1 => items.first(),
            Value::Object(map) if !map.contains_key("domains") => map
                .get("json")
                .or_else(|| map.get("facts"))
                .filter(|v| v.is_object()),
            _ => None,
        };
        match inner {
            Some(inner) => value = inner,
            None => break,
        }
    }
    value
}

/// Decide which facts shape `value` carries.
pub fn classify_facts(value: &Value) -> FactsInput {
    let value = unwrap_envelope(value);
    let Some(map) = value.as_object() else {
        return FactsInput::Unrecognized {
            reason: "facts input is not a JSON object".to_string(),
        };
    };

    if map.contains_key("domains") && map.contains_key("risk") {
        return match Facts::from_value(value.clone()) {
            Ok(facts) => FactsInput::Facts(Box::new(facts)),
            Err(e) => FactsInput::Unrecognized {
                reason: format!("facts do not conform to the facts contract: {e}"),
            },
        };
    }

    if map.get("detailed_trends").is_some_and(Value::is_array) {
        return match serde_json::from_value::<LegacySummary>(value.clone()) {
            Ok(summary) => FactsInput::Legacy(summary),
            Err(e) => FactsInput::Unrecognized {
                reason: format!("legacy trend summary is malformed: {e}"),
            },
        };
    }

    FactsInput::Unrecognized {
        reason: format!(
            "expected facts (domains, risk, metadata) or a legacy summary (detailed_trends); found keys [{}]",
            keys(value).join(", ")
        ),
    }
}

/// Narrative text and where it was found.
#[derive(Debug, Clone, PartialEq)]
pub struct LocatedText {
    pub text: String,
    /// Path inside the envelope, e.g. `choices[0].message.content`; `$` for
    /// a bare string.
    pub path: String,
}

fn join_path(path: &str, segment: &str) -> String {
    if path == "$" {
        segment.to_string()
    } else {
        format!("{path}.{segment}")
    }
}

fn locate(value: &Value, path: String, depth: usize) -> Option<LocatedText> {
    if depth > MAX_TEXT_DEPTH {
        return None;
    }
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(LocatedText {
            text: s.clone(),
            path,
        }),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .find_map(|(i, item)| locate(item, format!("{path}[{i}]"), depth + 1)),
        Value::Object(map) => TEXT_KEYS.iter().find_map(|key| {
            map.get(*key)
                .and_then(|child| locate(child, join_path(&path, key), depth + 1))
        }),
        _ => None,
    }
}

/// Find the narrative inside a bare string, a `{narrative|text|content}`
/// field, chat `message`/`choices` structures, or content-block lists.
pub fn locate_narrative(value: &Value) -> Option<LocatedText> {
    locate(value, "$".to_string(), 0)
}

/// Inputs ready for evaluation.
#[derive(Debug, Clone)]
pub struct Prepared {
    pub context: EvaluationContext,
    pub narrative: LocatedText,
}

/// Resolve both inputs, or explain what was missing.
pub fn prepare(
    facts: Option<&Value>,
    narrative: Option<&Value>,
    registry: &InstrumentRegistry,
) -> Result<Prepared, EvaluationError> {
    let facts_input = facts.map(classify_facts);
    let context = facts_input.as_ref().and_then(|f| f.context(registry));
    let located = narrative.and_then(locate_narrative);

    let (context, located) = match (context, located) {
        (Some(context), Some(narrative)) => {
            debug!(
                source = ?context.source,
                narrative_path = %narrative.path,
                populated = context.populated.len(),
                "evaluation inputs resolved"
            );
            return Ok(Prepared { context, narrative });
        }
        missing => missing,
    };

    let reason = match (&context, &located) {
        (None, None) => "facts and narrative text are both missing",
        (None, Some(_)) => "facts are missing or unrecognized",
        _ => "narrative text is missing",
    };
    let diagnostic = Diagnostic {
        reason: reason.to_string(),
        facts_shape: facts_input
            .as_ref()
            .map_or("absent", FactsInput::shape)
            .to_string(),
        facts_detail: match &facts_input {
            Some(FactsInput::Unrecognized { reason }) => Some(reason.clone()),
            _ => None,
        },
        facts_keys: facts.map(|v| keys(unwrap_envelope(v))).unwrap_or_default(),
        narrative_found: located.is_some(),
        narrative_path: located.map(|l| l.path),
        narrative_keys: narrative.map(keys).unwrap_or_default(),
    };
    warn!(
        reason = %diagnostic.reason,
        facts_shape = %diagnostic.facts_shape,
        narrative_found = diagnostic.narrative_found,
        "evaluation input missing"
    );
    Err(EvaluationError::MissingInput {
        diagnostic: Box::new(diagnostic),
    })
}
