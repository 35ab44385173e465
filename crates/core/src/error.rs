//! Error types for medscout operations.
//!
//! This module defines the main error type [`ScoutError`] along with the
//! [`FailureKind`] taxonomy the pipeline uses to tally recovered failures.
//!
//! # Example
//!
//! ```rust
//! use medscout_core::{FailureKind, ScoutError};
//!
//! let err = ScoutError::InvalidUrl("not a url".to_string());
//! assert_eq!(err.kind(), FailureKind::Source);
//! ```

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Main error type for fetching, parsing and extraction.
///
/// Most of these never escape a pipeline run: per-link and per-source
/// failures are recovered, logged and counted by their [`FailureKind`].
#[derive(Error, Debug)]
pub enum ScoutError {
    /// HTTP request errors from reqwest.
    ///
    /// Wraps network errors, DNS failures and connection issues.
    #[cfg(feature = "fetch")]
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Request timeout.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// The server answered with a non-success status code.
    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    /// Invalid URL provided.
    ///
    /// Returned when a source or link URL cannot be parsed or is malformed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// HTML parsing errors, including invalid CSS selectors.
    #[error("Failed to parse HTML: {0}")]
    HtmlParseError(String),

    /// A catalog term produced a pattern the regex engine rejected.
    #[error("Invalid extraction pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// Catalog or pipeline configuration errors.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// File I/O errors.
    #[error("Failed to write to file: {0}")]
    WriteError(#[from] std::io::Error),

    /// Output serialization errors.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for ScoutError.
pub type Result<T> = std::result::Result<T, ScoutError>;

/// Coarse classification of a failure, used for run-level accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Network-level failure while fetching a page.
    Fetch,
    /// Fetch exceeded its timeout.
    Timeout,
    /// Non-success HTTP status.
    HttpStatus,
    /// Markup or pattern failure.
    Parse,
    /// A source definition could not be turned into a request.
    Source,
    /// Unexpected fault outside the per-link scope.
    Pipeline,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fetch => "fetch",
            Self::Timeout => "timeout",
            Self::HttpStatus => "http_status",
            Self::Parse => "parse",
            Self::Source => "source",
            Self::Pipeline => "pipeline",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ScoutError {
    /// Maps this error onto the failure taxonomy.
    pub fn kind(&self) -> FailureKind {
        match self {
            #[cfg(feature = "fetch")]
            Self::HttpError(_) => FailureKind::Fetch,
            Self::Timeout { .. } => FailureKind::Timeout,
            Self::HttpStatus { .. } => FailureKind::HttpStatus,
            Self::InvalidUrl(_) => FailureKind::Source,
            Self::HtmlParseError(_) => FailureKind::Parse,
            Self::InvalidPattern(_) | Self::ConfigError(_) | Self::WriteError(_) | Self::Serialization(_) => {
                FailureKind::Pipeline
            }
        }
    }
}
