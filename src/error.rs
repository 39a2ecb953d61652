//! Error types for the review sentiment service

use thiserror::Error;

/// Result type alias for this crate
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the service
#[derive(Error, Debug)]
pub enum Error {
    /// App or analysis id could not be resolved
    #[error("Not found: {0}")]
    NotFound(String),

    /// Catalog fetch failed for a reason other than not-found
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// A required request field is missing or malformed
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Network error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Check if the error maps to a user-visible 404
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}
