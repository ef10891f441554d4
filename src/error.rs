//! Error types for the MMseqs2 wrapper
//!
//! Registry and binding problems are raised eagerly with the offending
//! parameter named. Subprocess failures are not errors at this layer; they are
//! reported through [`crate::core::CommandResult`].

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the wrapper
#[derive(Error, Debug)]
pub enum WrapperError {
    /// Malformed parameter registry (duplicate name, bad default, bad flag)
    #[error("Configuration error in parameter '{parameter}': {message}")]
    Configuration { parameter: String, message: String },

    /// Lookup or binding of a name the registry does not declare
    #[error("Unknown parameter '{parameter}' for command '{command}'")]
    UnknownParameter { parameter: String, command: String },

    /// Required parameter without a value or default
    #[error("Parameter '{parameter}' is required but no value was given")]
    MissingParameter { parameter: String },

    /// Value could not be coerced to the declared type
    #[error("Parameter '{parameter}' expected {expected}, got {received}")]
    TypeValidation {
        parameter: String,
        expected: String,
        received: String,
    },

    /// Value outside the declared choices
    #[error("Parameter '{parameter}' must be one of [{allowed}], got {received}")]
    InvalidChoice {
        parameter: String,
        allowed: String,
        received: String,
    },

    /// Input file referenced by a parameter does not exist
    #[error("Input file for parameter '{parameter}' not found: {}", .path.display())]
    FileNotFound { parameter: String, path: PathBuf },

    /// Custom validator rejected the value
    #[error("Validation failed for parameter '{parameter}': {message}")]
    CustomValidation { parameter: String, message: String },

    /// Command used outside of a runnable state
    #[error("Invalid state for command '{command}': {message}")]
    State { command: String, message: String },

    /// Non-successful process run, produced only by explicit result checking
    #[error("Process error: {command} failed with return code {returncode}")]
    Process {
        command: String,
        returncode: i32,
        stdout: String,
        stderr: String,
    },

    /// Runtime configuration errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl WrapperError {
    /// Create a new registry configuration error
    pub fn configuration(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Configuration {
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    /// Create a new unknown parameter error
    pub fn unknown_parameter(parameter: impl Into<String>, command: impl Into<String>) -> Self {
        Self::UnknownParameter {
            parameter: parameter.into(),
            command: command.into(),
        }
    }

    /// Create a new missing parameter error
    pub fn missing_parameter(parameter: impl Into<String>) -> Self {
        Self::MissingParameter {
            parameter: parameter.into(),
        }
    }

    /// Create a new type validation error
    pub fn type_validation(
        parameter: impl Into<String>,
        expected: impl Into<String>,
        received: impl Into<String>,
    ) -> Self {
        Self::TypeValidation {
            parameter: parameter.into(),
            expected: expected.into(),
            received: received.into(),
        }
    }

    /// Create a new invalid choice error
    pub fn invalid_choice(
        parameter: impl Into<String>,
        allowed: impl Into<String>,
        received: impl Into<String>,
    ) -> Self {
        Self::InvalidChoice {
            parameter: parameter.into(),
            allowed: allowed.into(),
            received: received.into(),
        }
    }

    /// Create a new file not found error
    pub fn file_not_found<P: Into<PathBuf>>(parameter: impl Into<String>, path: P) -> Self {
        Self::FileNotFound {
            parameter: parameter.into(),
            path: path.into(),
        }
    }

    /// Create a new custom validation error
    pub fn custom_validation(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CustomValidation {
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    /// Create a new state error
    pub fn state(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::State {
            command: command.into(),
            message: message.into(),
        }
    }

    /// Create a new process error
    pub fn process(
        command: impl Into<String>,
        returncode: i32,
        stdout: impl Into<String>,
        stderr: impl Into<String>,
    ) -> Self {
        Self::Process {
            command: command.into(),
            returncode,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    /// Create a new runtime configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Name of the parameter this error is about, if any
    pub fn parameter(&self) -> Option<&str> {
        match self {
            Self::Configuration { parameter, .. }
            | Self::UnknownParameter { parameter, .. }
            | Self::MissingParameter { parameter }
            | Self::TypeValidation { parameter, .. }
            | Self::InvalidChoice { parameter, .. }
            | Self::FileNotFound { parameter, .. }
            | Self::CustomValidation { parameter, .. } => Some(parameter),
            Self::State { .. } | Self::Process { .. } | Self::Config { .. } => None,
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, WrapperError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_parameter() {
        let err = WrapperError::invalid_choice("dbtype", "0, 1, 2", "5");
        assert_eq!(
            err.to_string(),
            "Parameter 'dbtype' must be one of [0, 1, 2], got 5"
        );
        assert_eq!(err.parameter(), Some("dbtype"));

        let err = WrapperError::file_not_found("input_files", "b.fasta");
        assert!(err.to_string().contains("b.fasta"));
        assert!(err.to_string().contains("input_files"));
    }

    #[test]
    fn test_state_error_has_no_parameter() {
        let err = WrapperError::state("createdb", "already executed");
        assert!(err.parameter().is_none());
        assert!(err.to_string().contains("createdb"));
    }
}
