//! Recovering a factual judgment from whatever the judging model returned.
//!
//! The judgment may be a JSON object, a JSON string, prose around an
//! embedded object, or a markdown-fenced block. Anything that cannot be
//! recovered is treated as absent.

use serde_json::Value;
use tracing::{debug, warn};

use vigil_core::models::judgment::FactualJudgment;

const JUDGMENT_KEYS: [&str; 6] = [
    "pass",
    "alignment_score",
    "trend_accuracy_score",
    "severity_accuracy_score",
    "risk_accuracy_score",
    "domain_coverage_score",
];
/// Envelope keys followed when the judgment is wrapped.
const ENVELOPE_KEYS: [&str; 8] = [
    "judgment", "output", "text", "content", "response", "message", "json", "result",
];
const MAX_DEPTH: usize = 4;

fn looks_like_judgment(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|map| JUDGMENT_KEYS.iter().any(|k| map.contains_key(*k)))
}

/// Remove a surrounding markdown code fence, with or without a language tag.
pub fn strip_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = rest.split_once('\n').map_or(rest, |(_, body)| body);
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}

/// Balanced `{...}` spans in `text`, outermost first, ignoring braces
/// inside JSON strings.
fn object_spans(text: &str) -> Vec<&str> {
    let mut spans = Vec::new();
    let mut depth = 0usize;
    let mut start = None;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' if depth > 0 => in_string = true,
            '{' => {
                if depth == 0 {
                    start = Some(i);
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    if let Some(s) = start.take() {
                        spans.push(&text[s..=i]);
                    }
                }
            }
            _ => {}
        }
    }
    spans
}

/// Objects embedded in prose, each recovered like a top-level value so a
/// wrapped judgment is still found.
fn embedded_judgment(text: &str, depth: usize) -> Option<FactualJudgment> {
    object_spans(text)
        .into_iter()
        .filter_map(|span| serde_json::from_str::<Value>(span).ok())
        .find_map(|value| recover(&value, depth + 1))
}

fn recover(value: &Value, depth: usize) -> Option<FactualJudgment> {
    if depth > MAX_DEPTH {
        return None;
    }
    match value {
        Value::Object(_) if looks_like_judgment(value) => serde_json::from_value(value.clone()).ok(),
        Value::Object(map) => ENVELOPE_KEYS
            .iter()
            .filter_map(|k| map.get(*k))
            .find_map(|child| recover(child, depth + 1)),
        Value::Array(items) => items.iter().find_map(|item| recover(item, depth + 1)),
        Value::String(text) if depth < MAX_DEPTH => {
            let body = strip_fences(text);
            match serde_json::from_str::<Value>(body) {
                Ok(inner @ (Value::Object(_) | Value::Array(_))) => recover(&inner, depth + 1),
                _ => embedded_judgment(body, depth),
            }
        }
        _ => None,
    }
}

/// Recover a judgment from a JSON value: the judgment itself, a string
/// holding one, or an envelope around either.
pub fn parse_judgment(value: &Value) -> Option<FactualJudgment> {
    let judgment = recover(value, 0);
    match &judgment {
        Some(j) => debug!(pass = j.pass, min_sub_score = ?j.min_sub_score(), "factual judgment recovered"),
        None => warn!("factual judgment could not be recovered; treating as absent"),
    }
    judgment
}

/// Recover a judgment from raw model output text.
pub fn parse_judgment_text(text: &str) -> Option<FactualJudgment> {
    parse_judgment(&Value::String(text.to_string()))
}
