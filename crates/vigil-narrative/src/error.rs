use serde::Serialize;
use thiserror::Error;

/// What the ingestion boundary found when an input was missing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub reason: String,
    /// `facts`, `legacy_summary`, `unrecognized`, or `absent`.
    pub facts_shape: String,
    pub facts_detail: Option<String>,
    pub facts_keys: Vec<String>,
    pub narrative_found: bool,
    pub narrative_path: Option<String>,
    pub narrative_keys: Vec<String>,
}

#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("missing input: {}", .diagnostic.reason)]
    MissingInput { diagnostic: Box<Diagnostic> },
}

impl EvaluationError {
    pub fn diagnostic(&self) -> &Diagnostic {
        match self {
            EvaluationError::MissingInput { diagnostic } => diagnostic,
        }
    }
}
