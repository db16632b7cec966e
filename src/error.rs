//! Error types for kidtext.

use std::time::Duration;
use thiserror::Error;

/// Result type for kidtext operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the simplification pipeline and its surrounding surfaces.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The document was empty or whitespace-only; no stage ran.
    #[error("Please enter some text to simplify!")]
    EmptyInput,

    /// Anything the pipeline could not recover from. Never carries partial output.
    #[error("Simplification failed: {0}")]
    Internal(String),

    /// Settings file could not be parsed or holds out-of-range values.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Custom dictionary could not be loaded or is inconsistent.
    #[error("Dictionary error: {0}")]
    Dictionary(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Error::Internal(msg.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create a dictionary error.
    pub fn dictionary(msg: impl Into<String>) -> Self {
        Error::Dictionary(msg.into())
    }
}

/// Failure reported by an external collaborator.
///
/// The pipeline never propagates these; each one is logged and the affected
/// stage falls back to passing its input through.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CollaboratorError {
    /// Backend missing, not configured, or crashed.
    #[error("{name} unavailable: {reason}")]
    Unavailable { name: &'static str, reason: String },

    /// Backend did not answer within the allotted time.
    #[error("{name} timed out after {after:?}")]
    Timeout { name: &'static str, after: Duration },

    /// Backend answered with something the pipeline cannot use.
    #[error("{name} returned malformed output: {detail}")]
    Malformed { name: &'static str, detail: String },
}

impl CollaboratorError {
    pub fn unavailable(name: &'static str, reason: impl Into<String>) -> Self {
        CollaboratorError::Unavailable {
            name,
            reason: reason.into(),
        }
    }

    pub fn malformed(name: &'static str, detail: impl Into<String>) -> Self {
        CollaboratorError::Malformed {
            name,
            detail: detail.into(),
        }
    }
}
