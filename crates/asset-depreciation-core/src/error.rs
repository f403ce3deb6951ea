use thiserror::Error;

#[derive(Debug, Error)]
pub enum DepreciationError {
    /// Input that makes the computation meaningless (zero useful life,
    /// negative cost, out-of-range rate, ...).
    #[error("Validation error: {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl DepreciationError {
    pub(crate) fn validation(field: &str, reason: impl Into<String>) -> Self {
        DepreciationError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for DepreciationError {
    fn from(e: serde_json::Error) -> Self {
        DepreciationError::SerializationError(e.to_string())
    }
}
