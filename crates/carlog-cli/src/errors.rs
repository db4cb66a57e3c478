//! CLI error types for structured error handling.
//!
//! This module provides typed errors that map to specific exit codes,
//! enabling consistent error handling across the CLI.

use std::fmt;

use carlog_core::CarlogError;

use crate::constants::exit_codes;

/// CLI-specific errors with associated exit codes.
#[derive(Debug)]
pub enum CliError {
    /// Resource not found (config, store, vehicle, maintenance)
    NotFound { message: String, hint: String },

    /// Invalid user input or payload
    InvalidInput(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::NotFound { message, hint } => write!(f, "{}\n{}", message, hint),
            CliError::InvalidInput(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for CliError {}

impl CliError {
    /// Create a NotFound error with message and hint.
    pub fn not_found(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::NotFound {
            message: message.into(),
            hint: hint.into(),
        }
    }

    /// Create an InvalidInput error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        CliError::InvalidInput(message.into())
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::NotFound { .. } => exit_codes::NOT_FOUND,
            CliError::InvalidInput(_) => exit_codes::INVALID_INPUT,
        }
    }
}

/// Exit code for any error that reached `main`.
///
/// Core errors are classified by kind so scripts can tell a bad payload from
/// a broken store.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    if let Some(cli_err) = err.downcast_ref::<CliError>() {
        return cli_err.exit_code();
    }
    match err.downcast_ref::<CarlogError>() {
        Some(CarlogError::NotFound(_)) => exit_codes::NOT_FOUND,
        Some(
            CarlogError::InvalidInput(_)
            | CarlogError::InvalidPayload(_)
            | CarlogError::IdentifierMismatch { .. }
            | CarlogError::Validation(_),
        ) => exit_codes::INVALID_INPUT,
        _ => exit_codes::FAILURE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display_includes_hint() {
        let err = CliError::not_found("Vehicle not found", "Hint: run `carlog vehicle list`");
        assert_eq!(
            err.to_string(),
            "Vehicle not found\nHint: run `carlog vehicle list`"
        );
        assert_eq!(err.exit_code(), exit_codes::NOT_FOUND);
    }

    #[test]
    fn test_exit_code_for_core_errors() {
        let payload: anyhow::Error = CarlogError::InvalidPayload("bad".to_string()).into();
        assert_eq!(exit_code_for(&payload), exit_codes::INVALID_INPUT);

        let storage: anyhow::Error = CarlogError::Storage("disk".to_string()).into();
        assert_eq!(exit_code_for(&storage), exit_codes::FAILURE);

        let cli: anyhow::Error = CliError::invalid_input("nope").into();
        assert_eq!(exit_code_for(&cli), exit_codes::INVALID_INPUT);
    }
}
