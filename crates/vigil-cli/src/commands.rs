//! One function per subcommand. Each takes already-read JSON so the
//! binary only handles files and printing.

use std::path::Path;

use jiff::Timestamp;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use vigil_core::models::decision::Decision;
use vigil_core::models::evaluation::NarrativeEvaluation;
use vigil_core::models::facts::Facts;
use vigil_core::models::retry::{RetryOutcome, RetryState};
use vigil_facts::validate::{ValidationReport, validate_records};
use vigil_facts::{extract_facts, load_records};
use vigil_gate::judgment::parse_judgment;
use vigil_gate::{GateConfig, RetryController, decide};
use vigil_instruments::preprocess::{PreprocessOutput, preprocess};
use vigil_instruments::registry::InstrumentRegistry;
use vigil_narrative::error::EvaluationError;
use vigil_narrative::ingest::prepare;
use vigil_narrative::{evaluate, evaluate_inputs};

pub fn read_json(path: &Path) -> eyre::Result<Value> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read {}: {e}", path.display()))?;
    serde_json::from_str(&contents)
        .map_err(|e| eyre::eyre!("failed to parse {} as JSON: {e}", path.display()))
}

/// Narratives and judgments may be saved as JSON or as raw model text.
pub fn read_json_or_text(path: &Path) -> eyre::Result<Value> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read {}: {e}", path.display()))?;
    Ok(match serde_json::from_str(&contents) {
        Ok(value) => value,
        Err(_) => Value::String(contents),
    })
}

pub fn load_registry(path: &Path) -> eyre::Result<InstrumentRegistry> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read registry at {}: {e}", path.display()))?;
    let registry = InstrumentRegistry::from_json(&contents)?;
    info!(path = %path.display(), "loaded instrument registry");
    Ok(registry)
}

fn missing_input(e: EvaluationError) -> eyre::Report {
    match serde_json::to_string_pretty(e.diagnostic()) {
        Ok(diagnostic) => eyre::eyre!("{e}\n{diagnostic}"),
        Err(_) => eyre::eyre!("{e}"),
    }
}

/// Item rows arrive as a bare array or under `rows`.
pub fn run_preprocess(input: Value) -> eyre::Result<PreprocessOutput> {
    let rows = match input {
        Value::Array(rows) => rows,
        Value::Object(mut map) => match map.remove("rows") {
            Some(Value::Array(rows)) => rows,
            _ => return Err(eyre::eyre!("expected an array of item rows or an object with a 'rows' array")),
        },
        _ => return Err(eyre::eyre!("expected an array of item rows")),
    };
    Ok(preprocess(rows))
}

pub fn run_validate(input: Value) -> eyre::Result<ValidationReport> {
    let records = load_records(input)?;
    Ok(validate_records(&records))
}

pub fn run_facts(input: Value, registry: &InstrumentRegistry, now: Timestamp) -> eyre::Result<Facts> {
    let records = load_records(input)?;
    Ok(extract_facts(&records, registry, now))
}

pub fn run_evaluate(
    facts: &Value,
    narrative: &Value,
    registry: &InstrumentRegistry,
) -> eyre::Result<NarrativeEvaluation> {
    evaluate_inputs(Some(facts), Some(narrative), registry).map_err(missing_input)
}

#[derive(Debug, Serialize)]
pub struct GateRun {
    pub evaluation: NarrativeEvaluation,
    pub decision: Decision,
    pub retry: RetryOutcome,
    pub next_state: RetryState,
}

/// Evaluate, decide, and apply the retry policy for one attempt.
pub fn run_gate(
    facts: &Value,
    narrative: &Value,
    judgment: Option<&Value>,
    attempt: u32,
    config: &GateConfig,
    registry: &InstrumentRegistry,
    now: Timestamp,
) -> eyre::Result<GateRun> {
    let prepared = prepare(Some(facts), Some(narrative), registry).map_err(missing_input)?;
    let evaluation = evaluate(&prepared.context, &prepared.narrative.text);
    let judgment = judgment.and_then(parse_judgment);
    let decision = decide(
        &evaluation,
        &prepared.context.risk,
        judgment.as_ref(),
        &config.thresholds,
        attempt,
        now,
    );
    let retry = RetryController::from_config(config).next(&RetryState::Attempting { attempt }, &decision);
    let next_state = retry.next_state();
    Ok(GateRun {
        evaluation,
        decision,
        retry,
        next_state,
    })
}
