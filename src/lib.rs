use std::time::Duration;
use thiserror::Error;

pub mod analyzer;
pub mod config;
pub mod export;
pub mod gemini;
pub mod monitor;
pub mod summary;
pub mod types;

// Re-export commonly used types
pub use config::{ConfigError, MonitorConfig};
pub use gemini::{ContentGenerator, GeminiClient};
pub use types::QueryResult;

/// The `MonitorError` enum represents the errors that can occur while monitoring mentions.
#[derive(Error, Debug)]
pub enum MonitorError {
    /// Required configuration is missing or unreadable.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    /// The HTTP client for the generative API could not be built.
    #[error("Failed to build API client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// Represents an error that occurs during an HTTP request.
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The request did not complete within the per-call timeout.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
    /// The API answered with a non-success status.
    #[error("API returned {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
    /// The response had no usable candidate, content or segment.
    #[error("Malformed API response: {0}")]
    MalformedResponse(String),
    /// The first content segment was not text.
    #[error("Unsupported content segment kind: {0}")]
    UnsupportedSegmentKind(String),
    /// Represents an error that occurs while writing CSV rows.
    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MonitorError {
    /// Returns `true` for failures of the network call itself, as opposed to
    /// a response that arrived but could not be used.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            MonitorError::Transport(_) | MonitorError::Timeout(_) | MonitorError::Api { .. }
        )
    }

    /// Returns `true` when the API answered but the answer had the wrong shape.
    pub fn is_malformed_response(&self) -> bool {
        matches!(
            self,
            MonitorError::MalformedResponse(_) | MonitorError::UnsupportedSegmentKind(_)
        )
    }
}

/// A type alias for `Result` with the `MonitorError` error type.
pub type Result<T> = std::result::Result<T, MonitorError>;

// Constants

/// The fixed timeout applied to every generative API call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
/// The pause between two consecutive queries.
pub const REQUEST_DELAY: Duration = Duration::from_secs(1);
/// The display value used when no configured product is mentioned.
pub const NO_PRODUCTS: &str = "none";
/// The default endpoint of the Gemini REST API.
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
