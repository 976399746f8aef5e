//! Error types for docstore
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! "Not found" conditions (updating or deleting an id that is not live) are
//! NOT errors. They are reported through `Option` return values.

use std::io;
use thiserror::Error;

/// Result type alias for docstore operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for docstore
#[derive(Debug, Error)]
pub enum Error {
    /// Caller supplied a value the operation cannot accept
    /// (non-record insert input, incomplete storage backend, empty names)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Raw backend reported a failure
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Persisted state could not be interpreted
    #[error("Data corruption: {0}")]
    Corruption(String),

    /// I/O error (file-backed storage)
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// Configuration could not be parsed or failed validation
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl Error {
    /// Shorthand for [`Error::InvalidArgument`]
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    /// Shorthand for [`Error::Corruption`]
    pub fn corruption(msg: impl Into<String>) -> Self {
        Error::Corruption(msg.into())
    }

    /// Returns true for [`Error::InvalidArgument`]
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Error::InvalidArgument(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::SerializationError(e.to_string())
    }
}
