use thiserror::Error;

#[derive(Debug, Error)]
pub enum GateError {
    #[error("invalid value for {var}: '{value}' ({reason})")]
    InvalidOverride {
        var: String,
        value: String,
        reason: String,
    },
}
