//! Collector error types

use thiserror::Error;

/// Result type for collector operations
pub type CollectorResult<T> = Result<T, CollectorError>;

/// Collector error types
#[derive(Error, Debug)]
pub enum CollectorError {
    #[error("Remote API request failed: {message}")]
    Api { message: String },

    #[error("Reference data error: {message}")]
    Reference { message: String },

    #[error("Ledger error: {message}")]
    Ledger { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}
