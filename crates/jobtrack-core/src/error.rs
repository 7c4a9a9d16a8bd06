//! Error types for the job tracker.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for every jobtrack layer.
///
/// Adapters return these; the application layer decides which of them are
/// logged and swallowed and which reach the caller.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum TrackerError {
    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// The remote store rejected a request or could not be reached.
    /// `status` is `None` for transport failures.
    #[error("Remote store error ({}): {message}", status.map_or_else(|| "transport".to_string(), |s| s.to_string()))]
    Remote { status: Option<u16>, message: String },

    /// Authentication / session resolution error
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A startup or reload step exceeded its time budget.
    #[error("Timed out: {0}")]
    Timeout(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl TrackerError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Remote error for a non-success HTTP status.
    pub fn remote(status: u16, message: impl Into<String>) -> Self {
        Self::Remote {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Creates a Remote error for a request that never got a response.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Remote {
            status: None,
            message: message.into(),
        }
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a serialization error
    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }

    /// Check if this is a remote store error
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote { .. })
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for TrackerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for TrackerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for TrackerError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<tokio::time::error::Elapsed> for TrackerError {
    fn from(err: tokio::time::error::Elapsed) -> Self {
        Self::Timeout(err.to_string())
    }
}

/// A type alias for `Result<T, TrackerError>`.
pub type Result<T> = std::result::Result<T, TrackerError>;
