//! Error types for the event finder
//!
//! Only malformed input and I/O end up here. Running out of data (too few
//! geo-tagged photos, an empty sample) is reported through `Option` or
//! [`crate::person::ClusteringOutcome`] instead.

use thiserror::Error;

/// Result type alias using the crate's [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// File I/O failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Tab separated input could not be read or written
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration file is not valid JSON for [`crate::config::EngineConfig`]
    #[error("Configuration error: {0}")]
    Json(#[from] serde_json::Error),

    /// Photo timestamp is not in `yyyyMMddHHmmss` form
    #[error("Invalid timestamp: {value:?}")]
    InvalidTimestamp { value: String },

    /// A required field is missing from an input line
    #[error("Line {line}: missing {field}")]
    MissingField { line: u64, field: &'static str },
}
