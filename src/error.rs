//! Top-level error types for the action binary.
//!
//! Wraps pipeline failures together with input validation and reporting
//! errors so `main` has a single type to print.

use thiserror::Error;

/// Result type alias for action operations
pub type Result<T> = std::result::Result<T, ActionError>;

/// Main error type for the action
#[derive(Error, Debug)]
pub enum ActionError {
    /// CLI input errors
    #[error("{0}")]
    Cli(#[from] CliError),

    /// IO errors while reporting outputs
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Build pipeline errors, shown verbatim
    #[error("{0}")]
    Build(#[from] crate::build::Error),
}

/// CLI input errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Input present but unusable
    #[error("Invalid input {input}: {reason}")]
    InvalidInput {
        /// Input name as declared by the action
        input: &'static str,
        /// Reason for the error
        reason: String,
    },

    /// Inputs that cannot be combined
    #[error("Conflicting inputs: {inputs:?}")]
    ConflictingInputs {
        /// Inputs that conflict
        inputs: Vec<&'static str>,
    },
}
