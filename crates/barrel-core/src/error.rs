//! Error handling for the Barrel allocation engine
//!
//! Only precondition failures and environment problems are errors. Malformed
//! entries are reported by `validate_inputs` as messages, and numeric
//! degeneracies produce a well-defined output with warnings.

use thiserror::Error;

/// Error type for Barrel engine operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BarrelError {
    /// `compute_allocation` was called without any partner entries
    #[error("no allocation entries supplied")]
    EmptyInput,

    /// Invalid engine settings
    #[error("Configuration error: {message}")]
    Configuration { message: String, setting: Option<String> },

    /// A value could not be turned into canonical JSON
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Reading a configuration or period file failed
    #[error("I/O error on {path}: {message}")]
    Io { message: String, path: String },
}

impl BarrelError {
    /// Get the error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            BarrelError::EmptyInput => "precondition",
            BarrelError::Configuration { .. } => "configuration",
            BarrelError::Serialization { .. } => "serialization",
            BarrelError::Io { .. } => "io",
        }
    }

    /// Whether the same engine can succeed once the input or environment is corrected
    pub fn is_recoverable(&self) -> bool {
        match self {
            // Supply at least one entry
            BarrelError::EmptyInput => true,
            // No engine exists until the settings are fixed
            BarrelError::Configuration { .. } => false,
            // Fix the document
            BarrelError::Serialization { .. } => true,
            // Fix the path or permissions
            BarrelError::Io { .. } => true,
        }
    }

    /// Create a configuration error for a specific setting
    pub fn configuration(setting: &str, message: impl Into<String>) -> Self {
        Self::Configuration { message: message.into(), setting: Some(setting.to_string()) }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization { message: message.into() }
    }
}

impl From<serde_json::Error> for BarrelError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}

/// Result type alias for engine operations
pub type BarrelResult<T> = Result<T, BarrelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_a_precondition_failure() {
        let err = BarrelError::EmptyInput;
        assert_eq!(err.category(), "precondition");
        assert_eq!(err.to_string(), "no allocation entries supplied");
    }

    #[test]
    fn configuration_errors_carry_the_setting() {
        let err = BarrelError::configuration("vcf_min", "must not exceed vcf_max");
        match &err {
            BarrelError::Configuration { setting, .. } => {
                assert_eq!(setting.as_deref(), Some("vcf_min"));
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(!err.is_recoverable());
    }

    #[test]
    fn only_configuration_errors_are_unrecoverable() {
        assert!(BarrelError::EmptyInput.is_recoverable());
        assert!(BarrelError::serialization("trailing comma").is_recoverable());
        let io = BarrelError::Io { message: "not found".into(), path: "barrel.toml".into() };
        assert!(io.is_recoverable());
        assert!(!BarrelError::configuration("gross_cap_ratio", "must be in (0, 1]").is_recoverable());
    }
}
