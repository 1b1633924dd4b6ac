//! Error types used throughout the client library

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse classification of an [`ArmoryError`]
///
/// Callers branch on the kind rather than on message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Invalid region/locale or other construction-time settings
    Configuration,
    /// Token exchange rejected or malformed
    Authentication,
    /// Caller-supplied argument failed local validation
    InvalidParameter,
    /// Non-success status from a resource endpoint
    RemoteRequest,
    /// Batch dispatch named an operation that is not registered
    UnknownOperation,
    /// Connection, timeout, body decoding or cache I/O problems
    Transport,
    /// Bugs and panics inside the library
    Internal,
}

/// Main error type for the Armory client
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "detail")]
pub enum ArmoryError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Invalid parameter for {operation}: {message}")]
    InvalidParameter { operation: String, message: String },

    #[error("Remote request failed with status {status}: {body}")]
    Remote { status: u16, body: String },

    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ArmoryError {
    /// Shorthand for [`ArmoryError::InvalidParameter`].
    pub fn invalid_parameter(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter { operation: operation.into(), message: message.into() }
    }

    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) => ErrorKind::Configuration,
            Self::Auth(_) => ErrorKind::Authentication,
            Self::InvalidParameter { .. } => ErrorKind::InvalidParameter,
            Self::Remote { .. } => ErrorKind::RemoteRequest,
            Self::UnknownOperation(_) => ErrorKind::UnknownOperation,
            Self::Network(_) | Self::Decode(_) | Self::Storage(_) => ErrorKind::Transport,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Whether a caller-side retry policy could reasonably try again.
    ///
    /// Advisory only: nothing in this library retries on its own.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Remote { status, .. } => *status == 429 || (500..600).contains(status),
            _ => false,
        }
    }
}

/// Result type alias for Armory operations
pub type Result<T> = std::result::Result<T, ArmoryError>;
