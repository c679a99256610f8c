//! Core Error Types
//!
//! Defines the foundational error types used across the Relay workspace.
//! These error types are dependency-free (only thiserror + std) to keep the
//! core crate lightweight.
//!
//! The taxonomy is deliberately small: routing and validation failures are
//! reported back to the caller as structured results (never as errors), and
//! parse failures on the stream are logged and dropped, so the enum only
//! carries the categories that actually propagate: configuration faults at
//! startup, I/O, serialization, network/transport, and internal faults.
//! Nothing here is ever allowed to escape the router or the decoder as an
//! unhandled error.

use thiserror::Error;

/// Core error type for the Relay workspace.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration errors (bad env values, duplicate tool registration)
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Network/transport errors from tool or model calls
    #[error("Network error: {0}")]
    Network(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for core errors
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

/// Convert CoreError to a string
impl From<CoreError> for String {
    fn from(err: CoreError) -> String {
        err.to_string()
    }
}
