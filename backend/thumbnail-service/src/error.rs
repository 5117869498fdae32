/// Error types for Thumbnail Service
///
/// Every failure in the thumbnail pipeline ends up here and is converted into
/// a `{"error": "<message>"}` body with the matching status code.
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;

/// Result type for thumbnail-service operations
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types
#[derive(Debug, Error)]
pub enum AppError {
    /// Query parameters missing, malformed or pointing at an unsupported file type
    #[error("{0}")]
    Validation(String),

    /// Remote image unreachable or answered with a non-success status
    #[error("{0}")]
    Fetch(String),

    /// Downloaded file could not be decoded as an image
    #[error("{0}")]
    Decode(String),

    /// Resampling failed or did not finish in time
    #[error("{0}")]
    Resize(String),

    /// Composed thumbnail could not be written back to disk
    #[error("{0}")]
    Encode(String),

    /// Streaming the thumbnail to the client failed
    #[error("{0}")]
    Transfer(String),

    /// Local filesystem failure outside the codec steps
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Fetch(_) => StatusCode::NOT_FOUND,
            AppError::Decode(_)
            | AppError::Resize(_)
            | AppError::Encode(_)
            | AppError::Transfer(_)
            | AppError::Io(_)
            | AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}
