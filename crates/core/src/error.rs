//! Error types for the prompt provider.
//!
//! This module defines a unified error enum covering caller input, registry
//! availability, registry lookups, transport, configuration and templating.

use thiserror::Error;

/// Unified error type for the prompt provider.
///
/// Read paths absorb most of these into the local fallback; write paths
/// propagate them unchanged.
#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed caller input (blank key, blank content, zero version, empty labels)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Registry credentials or base address are missing (raised by a registry client)
    #[error("Registry not configured: {0}")]
    NotConfigured(String),

    /// Registry is required for the operation but is not usable (raised by the resolver)
    #[error("Registry unavailable: {0}")]
    RegistryUnavailable(String),

    /// Registry explicitly reports the prompt or version absent
    #[error("Not found: {0}")]
    NotFound(String),

    /// Network, HTTP status or decode failures
    #[error("Transport error: {0}")]
    Transport(String),

    /// The caller cancelled the operation
    #[error("Operation cancelled")]
    Cancelled,

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Template compilation errors
    #[error("Template error: {0}")]
    Template(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl AppError {
    /// Whether this error reports a missing prompt or version.
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound(_))
    }

    /// Whether this error reports a cancelled operation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, AppError::Cancelled)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicates() {
        assert!(AppError::NotFound("x".to_string()).is_not_found());
        assert!(!AppError::Transport("x".to_string()).is_not_found());
        assert!(AppError::Cancelled.is_cancelled());
    }

    #[test]
    fn test_json_error_maps_to_serialization() {
        let err: AppError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, AppError::Serialization(_)));
    }
}
