//! Error types for ISO generation.
//!
//! Configuration defects are reported as [`IsogenError::InvalidConfig`] before any container
//! exists. Failures coming back from the container runtime are carried as [`RuntimeError`]
//! exactly as the runtime reported them.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for isogen operations
pub type Result<T> = std::result::Result<T, IsogenError>;

/// Main error type for all isogen operations
#[derive(Error, Debug)]
pub enum IsogenError {
    /// Invalid bootstrap configuration
    #[error("Invalid configuration: {reason}")]
    InvalidConfig {
        /// Which field failed and why
        reason: String,
    },

    /// Container runtime failure, passed through unchanged
    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    /// Cloud-init document source could not be read
    #[error("Cloud-init document error: {reason}")]
    Document {
        /// Reason for the error
        reason: String,
    },

    /// Expected build artifact is missing after a successful build
    #[error("Build artifact not found: {path}")]
    MissingArtifact {
        /// Path where the artifact was expected
        path: PathBuf,
    },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure reported by a container runtime operation.
///
/// Comparable so callers can match on the exact error a runtime produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Container runtime command failed: {command} - {reason}")]
pub struct RuntimeError {
    /// Command that failed
    pub command: String,
    /// Reason for the error
    pub reason: String,
}

impl RuntimeError {
    /// Create a runtime error for the given command
    pub fn new(command: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            reason: reason.into(),
        }
    }
}

impl IsogenError {
    /// Shorthand for an [`IsogenError::InvalidConfig`]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        IsogenError::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            IsogenError::InvalidConfig { .. } => vec![
                "Fix the [container] and [builder] sections of the config file and retry"
                    .to_string(),
                "Volume binds use the form hostPath:containerPath".to_string(),
            ],
            IsogenError::Document { .. } => vec![
                "Check that the documents directory contains rendered user-data and network-config"
                    .to_string(),
            ],
            IsogenError::MissingArtifact { path } => vec![
                format!("Inspect the builder output directory: {}", path.display()),
                "Re-run with --debug to keep the builder container for inspection".to_string(),
            ],
            IsogenError::Runtime(_) => vec![
                "Re-run with --debug to keep the builder container for inspection".to_string(),
                "Check that the container runtime daemon is running".to_string(),
            ],
            IsogenError::Io(_) => {
                vec!["Check the error message above for specific details".to_string()]
            }
        }
    }

    /// Check if this error is recoverable by fixing configuration and retrying
    pub fn is_config_error(&self) -> bool {
        matches!(self, IsogenError::InvalidConfig { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_error_is_transparent() {
        let inner = RuntimeError::new("docker start", "exit code 2");
        let err = IsogenError::from(inner.clone());
        assert_eq!(err.to_string(), inner.to_string());
    }

    #[test]
    fn test_config_error_classification() {
        assert!(IsogenError::invalid_config("volume").is_config_error());
        assert!(!IsogenError::from(RuntimeError::new("docker pull", "denied")).is_config_error());
    }
}
