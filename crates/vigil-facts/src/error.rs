use thiserror::Error;

#[derive(Debug, Error)]
pub enum FactsError {
    #[error("invalid record input: {0}")]
    Input(#[from] serde_json::Error),

    #[error("unrecognized record envelope: {0}")]
    Envelope(String),
}
