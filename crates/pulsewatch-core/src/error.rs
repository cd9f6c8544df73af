//! Error types for PulseWatch operations.
//!
//! This module defines [`PulseError`], the error enum shared by every
//! PulseWatch crate. Lifecycle operations on unknown ids report
//! [`PulseError::AlertNotFound`] / [`PulseError::RuleNotFound`] instead of
//! silently doing nothing, and malformed rule or config input is rejected
//! with [`PulseError::InvalidInput`] before it reaches the alert manager.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`PulseError`].
pub type Result<T> = std::result::Result<T, PulseError>;

/// Error type for all PulseWatch operations.
#[derive(Debug, Error)]
pub enum PulseError {
    // =========================================================================
    // Lookup Errors
    // =========================================================================
    /// No live or historical alert carries this id
    #[error("Alert not found: {alert_id}")]
    AlertNotFound { alert_id: String },

    /// No configured rule carries this id
    #[error("Rule not found: {rule_id}")]
    RuleNotFound { rule_id: String },

    // =========================================================================
    // Input Errors
    // =========================================================================
    /// A caller-supplied value failed validation
    #[error("Invalid {field}: {message}")]
    InvalidInput { field: String, message: String },

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Configuration file not found
    #[error("Configuration not found at {path}")]
    ConfigNotFound {
        path: PathBuf,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Configuration file is invalid YAML
    #[error("Invalid configuration at {path}: {message}")]
    ConfigInvalid { path: PathBuf, message: String },

    /// Configuration validation failed
    #[error("Configuration validation failed: {message}")]
    ConfigValidation { message: String },

    // =========================================================================
    // I/O Errors
    // =========================================================================
    /// Generic I/O error with context
    #[error("I/O error {operation}: {path}")]
    Io {
        operation: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Directory creation failed
    #[error("Failed to create directory: {path}")]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // =========================================================================
    // Internal Errors
    // =========================================================================
    /// Internal error (bug in PulseWatch)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl PulseError {
    /// Create an AlertNotFound error
    pub fn alert_not_found(alert_id: impl ToString) -> Self {
        Self::AlertNotFound {
            alert_id: alert_id.to_string(),
        }
    }

    /// Create a RuleNotFound error
    pub fn rule_not_found(rule_id: impl ToString) -> Self {
        Self::RuleNotFound {
            rule_id: rule_id.to_string(),
        }
    }

    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a ConfigNotFound error
    pub fn config_not_found(path: impl Into<PathBuf>) -> Self {
        Self::ConfigNotFound {
            path: path.into(),
            source: None,
        }
    }

    /// Create a ConfigNotFound error with source
    pub fn config_not_found_with_source(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ConfigNotFound {
            path: path.into(),
            source: Some(source),
        }
    }

    /// Create an I/O error
    pub fn io(operation: impl Into<String>, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            path: path.into(),
            source,
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    // =========================================================================
    // Error classification helpers
    // =========================================================================

    /// Returns true if the referenced alert or rule does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::AlertNotFound { .. } | Self::RuleNotFound { .. })
    }

    /// Returns true if this is a configuration error
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigNotFound { .. } | Self::ConfigInvalid { .. } | Self::ConfigValidation { .. }
        )
    }

    /// Returns actionable guidance for the user
    pub fn guidance(&self) -> Option<&'static str> {
        match self {
            Self::ConfigNotFound { .. } => {
                Some("Create ~/.pulsewatch/config.yaml or pass --config with an existing file")
            }
            Self::ConfigInvalid { .. } => Some("Check YAML syntax in the configuration file"),
            Self::ConfigValidation { .. } => {
                Some("Fix the reported field; run 'pulsewatch config' to see the effective values")
            }
            Self::AlertNotFound { .. } => Some("The alert may already be resolved; check the history"),
            Self::RuleNotFound { .. } => Some("Run 'pulsewatch rules' to list configured rule ids"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_error() {
        let err = PulseError::config_not_found("/home/user/.pulsewatch/config.yaml");
        assert!(err.to_string().contains("Configuration not found"));
        assert!(err.is_config_error());
        assert!(!err.is_not_found());
        assert!(err.guidance().is_some());
    }

    #[test]
    fn test_not_found_classification() {
        let alert = PulseError::alert_not_found("alert-7");
        let rule = PulseError::rule_not_found("rule-3");
        assert!(alert.is_not_found());
        assert!(rule.is_not_found());
        assert_eq!(alert.to_string(), "Alert not found: alert-7");
        assert_eq!(rule.to_string(), "Rule not found: rule-3");
    }

    #[test]
    fn test_invalid_input_message() {
        let err = PulseError::invalid_input("hours", "must be greater than zero");
        assert_eq!(err.to_string(), "Invalid hours: must be greater than zero");
        assert!(!err.is_config_error());
        assert!(err.guidance().is_none());
    }
}
