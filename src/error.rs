//! Error types for the Phalanx library.
//!
//! All errors are represented by the [`PhalanxError`] enum. The first four
//! variants form the error taxonomy every backend shares:
//!
//! - [`PhalanxError::InvalidQuery`] - malformed conditions, operators, ranges or
//!   unknown fields. Caller error, never retried.
//! - [`PhalanxError::UnsupportedFeature`] - the backend cannot honor a requested
//!   operator, sort or facet. The caller may retry with a reduced query.
//! - [`PhalanxError::BackendUnavailable`] - transient storage failure or timeout.
//!   Safe to retry.
//! - [`PhalanxError::PartialIndexingFailure`] - some items of a batch could not
//!   be indexed. The rest of the batch was committed.
//!
//! # Examples
//!
//! ```
//! use phalanx::error::{PhalanxError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(PhalanxError::invalid_query("BETWEEN needs two bounds"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Phalanx operations.
#[derive(Error, Debug)]
pub enum PhalanxError {
    /// Structurally malformed query input.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// A requested operator, sort or facet cannot be executed by the backend.
    #[error("Unsupported feature: {0}")]
    UnsupportedFeature(String),

    /// Transient storage or network failure, including timeouts.
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Some items of a batch failed to index.
    #[error("Indexed {indexed} item(s), {} failed: {}", .failed.len(), .failed.join(", "))]
    PartialIndexingFailure {
        /// Number of items that were indexed.
        indexed: usize,
        /// Ids of the items that failed.
        failed: Vec<String>,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with PhalanxError.
pub type Result<T> = std::result::Result<T, PhalanxError>;

impl PhalanxError {
    /// Create a new invalid query error.
    pub fn invalid_query<S: Into<String>>(msg: S) -> Self {
        PhalanxError::InvalidQuery(msg.into())
    }

    /// Create a new unsupported feature error.
    pub fn unsupported<S: Into<String>>(msg: S) -> Self {
        PhalanxError::UnsupportedFeature(msg.into())
    }

    /// Create a new backend unavailable error.
    pub fn unavailable<S: Into<String>>(msg: S) -> Self {
        PhalanxError::BackendUnavailable(msg.into())
    }

    /// Create a new timeout error.
    pub fn timeout<S: Into<String>>(msg: S) -> Self {
        PhalanxError::BackendUnavailable(format!("Timeout: {}", msg.into()))
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        PhalanxError::Config(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        PhalanxError::Other(msg.into())
    }

    /// Whether the failed operation may succeed when retried unchanged.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PhalanxError::BackendUnavailable(_))
    }
}
