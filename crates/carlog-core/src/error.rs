//! Error types for carlog core operations.
//!
//! Errors are descriptive at the core level; the CLI layer maps these
//! to user-friendly messages and exit codes. Expected outcomes such as a
//! missing record are modelled as `Option` or [`crate::Resolution`] values,
//! not as errors.

use thiserror::Error;

/// Result type alias for carlog operations.
pub type Result<T> = std::result::Result<T, CarlogError>;

/// Core error type for carlog operations.
#[derive(Debug, Error)]
pub enum CarlogError {
    /// Storage backend error (I/O, unreadable store file)
    #[error("Storage error: {0}")]
    Storage(String),

    /// A write would push the store past its capacity
    #[error("Storage quota exceeded: writing {key} needs {needed} bytes, capacity is {capacity}")]
    QuotaExceeded {
        key: String,
        needed: usize,
        capacity: usize,
    },

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Imported or scanned data does not have the expected structure
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// Imported data belongs to a different vehicle than the target identifier
    #[error("Identifier mismatch: expected {expected}, payload contains {found}")]
    IdentifierMismatch { expected: String, found: String },

    /// Invalid user input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<std::io::Error> for CarlogError {
    fn from(err: std::io::Error) -> Self {
        CarlogError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for CarlogError {
    fn from(err: serde_json::Error) -> Self {
        CarlogError::InvalidPayload(err.to_string())
    }
}
