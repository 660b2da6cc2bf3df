use thiserror::Error;

#[derive(Debug, Error)]
pub enum InstrumentError {
    #[error("invalid score path '{0}': expected 'raw_score' or 'derived.<field>'")]
    InvalidScorePath(String),

    #[error("registry error: {0}")]
    Registry(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
