use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("unsupported facts schema version {found} (expected {expected})")]
    UnsupportedSchema { found: u32, expected: u32 },

    #[error("missing required field: {0}")]
    MissingField(String),
}
