use thiserror::Error;

use domain::error::DomainError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Invalid request: {message}")]
    ValidationError { message: String },

    #[error("Upload of {size} bytes exceeds the {limit} byte limit")]
    PayloadTooLarge { size: usize, limit: usize },

    #[error("Image codec failure: {message}")]
    CodecError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Live feed error: {message}")]
    WebSocketError { message: String },

    /// The editor session lock was poisoned by a panicking request.
    #[error("Editor session unavailable")]
    InternalServerError,
}

pub type AppResult<T> = Result<T, AppError>;
