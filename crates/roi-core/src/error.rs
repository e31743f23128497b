use thiserror::Error;

#[derive(Debug, Error)]
pub enum RoiError {
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl RoiError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        RoiError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for RoiError {
    fn from(e: serde_json::Error) -> Self {
        RoiError::SerializationError(e.to_string())
    }
}
