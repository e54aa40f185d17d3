//! Error types for aidkit.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the whole aidkit workspace.
///
/// Collaborator outages are normally recovered into a localized reply before
/// they reach a caller.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum AidError {
    /// Deployment misconfiguration, e.g. the default knowledge base is missing.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A translation or completion call failed
    #[error("External service failure ({service}): {message}")]
    ExternalService {
        service: &'static str,
        message: String,
    },

    /// The inbound request could not be understood
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },
}

impl AidError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Creates an ExternalService error for the named collaborator
    pub fn external(service: &'static str, message: impl Into<String>) -> Self {
        Self::ExternalService {
            service,
            message: message.into(),
        }
    }

    /// Creates a MalformedRequest error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedRequest(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a configuration error
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Check if this is an external service failure
    pub fn is_external(&self) -> bool {
        matches!(self, Self::ExternalService { .. })
    }

    /// Check if this is a serialization error
    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization { .. })
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for AidError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for AidError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, AidError>`.
pub type Result<T> = std::result::Result<T, AidError>;
