//! Error types for the song recommender.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type alias using our custom error.
pub type Result<T> = std::result::Result<T, RecommenderError>;

/// Errors that can occur while talking to the model or the catalog.
#[derive(Error, Debug)]
pub enum RecommenderError {
    /// Error reading or writing files.
    #[error("I/O error for path '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Required catalog credentials are not set.
    #[error("Catalog credentials are missing: {0} is not set")]
    MissingCredentials(&'static str),

    /// HTTP request error.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Credentials were rejected by a remote service.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// LLM API error.
    #[error("LLM API error: {0}")]
    LlmApi(String),

    /// LLM response parsing error.
    #[error("Failed to parse LLM response: {0}")]
    LlmParse(String),

    /// The catalog answered with a non-success status.
    #[error("Catalog API error ({status}): {message}")]
    CatalogApi { status: u16, message: String },

    /// Catalog response parsing error.
    #[error("Failed to parse catalog response: {0}")]
    CatalogParse(String),

    /// The catalog search returned no artist for the name.
    #[error("no artist found matching '{0}'")]
    ArtistNotFound(String),

    /// A lookup did not finish in time.
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),
}

impl RecommenderError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<reqwest::Error> for RecommenderError {
    fn from(err: reqwest::Error) -> Self {
        RecommenderError::Http(err.to_string())
    }
}

impl From<serde_json::Error> for RecommenderError {
    fn from(err: serde_json::Error) -> Self {
        RecommenderError::LlmParse(err.to_string())
    }
}
