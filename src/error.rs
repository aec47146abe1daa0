//! Error types for filedrop.

use thiserror::Error;

/// Common error type for filedrop.
#[derive(Error, Debug)]
pub enum FiledropError {
    /// Database error.
    ///
    /// This is a generic database error that wraps errors from any database backend.
    /// Database errors from sqlx are automatically converted.
    #[error("database error: {0}")]
    Database(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Template error.
    #[error("template error: {0}")]
    Template(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

// Conversion from sqlx errors
impl From<sqlx::Error> for FiledropError {
    fn from(e: sqlx::Error) -> Self {
        FiledropError::Database(e.to_string())
    }
}

/// Result type alias for filedrop operations.
pub type Result<T> = std::result::Result<T, FiledropError>;
