//! Typed errors for the pricer library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.
//!
//! Adapter failures are always absorbed at the pipeline boundary and
//! demoted to "zero candidates from this source"; they never escape
//! `run_batch`. A query with no acceptable match is not an error at all,
//! it is `MatchedBy::None`.

use thiserror::Error;

/// Errors a site adapter can report for one search.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// HTTP request failed (connection, TLS, redirect loop, ...)
    #[error("HTTP error: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Non-success HTTP status after retries were exhausted
    #[error("HTTP status {code} from {site}")]
    Status { site: String, code: u16 },

    /// Request exceeded the configured timeout
    #[error("timeout querying {site}")]
    Timeout { site: String },

    /// Response body did not have the expected shape
    #[error("decode error from {site}: {reason}")]
    Decode { site: String, reason: String },

    /// Search URL could not be built
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON parsing error (API-backed adapters)
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors from the CSV input/output layer.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Filesystem error reading or writing a table
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed CSV row
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type alias for adapter operations.
pub type AdapterResult<T> = std::result::Result<T, AdapterError>;

/// Result type alias for I/O operations.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
