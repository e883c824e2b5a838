use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, Serialize)]
#[serde(tag = "type", content = "message")]
pub enum AppError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("External service error: {0}")]
    ExternalServiceError(String),
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::ExternalServiceError("Request timeout".to_string())
        } else if err.is_connect() {
            AppError::ExternalServiceError("Failed to connect to the import service".to_string())
        } else if let Some(status) = err.status() {
            match status.as_u16() {
                404 => AppError::NotFound("Remote resource not found".to_string()),
                _ => AppError::ApiError(format!("HTTP {}: {}", status, err)),
            }
        } else {
            AppError::ApiError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::SerializationError(err.to_string())
    }
}

impl From<std::num::ParseIntError> for AppError {
    fn from(err: std::num::ParseIntError) -> Self {
        AppError::InvalidInput(format!("Invalid number: {}", err))
    }
}

impl AppError {
    /// Message without the variant prefix, for display next to diagnostics
    pub fn detail(&self) -> &str {
        match self {
            AppError::ApiError(m)
            | AppError::NotFound(m)
            | AppError::InvalidInput(m)
            | AppError::InternalError(m)
            | AppError::SerializationError(m)
            | AppError::ValidationError(m)
            | AppError::ExternalServiceError(m) => m,
        }
    }
}

// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;
