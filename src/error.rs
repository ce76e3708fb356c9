//! Error types for the feedback service
//!
//! This module provides error handling using thiserror for
//! structured error definitions.

use thiserror::Error;

/// Main error type for feedback operations
#[derive(Error, Debug)]
pub enum FeedbackError {
    /// Database operation failed
    #[error("Database error: {0}")]
    Database(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

/// Result type alias for feedback operations
pub type Result<T> = std::result::Result<T, FeedbackError>;

impl From<rusqlite::Error> for FeedbackError {
    fn from(err: rusqlite::Error) -> Self {
        FeedbackError::Database(err.to_string())
    }
}
