//! CLI exit codes for scripting and automation.
//!
//! Responsibilities:
//! - Define structured exit codes that scripts can use to distinguish error types.
//! - Map EnvError variants and CLI-level failures to exit codes.
//!
//! Does NOT handle:
//! - Error message formatting (handled by anyhow Display).
//!
//! Invariants:
//! - Exit codes 1-9 are reserved for specific error categories.

use simpleenvs::EnvError;
use thiserror::Error;

/// Failures detected by the CLI itself rather than the loader.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Missing required keys: {}", .0.join(", "))]
    MissingKeys(Vec<String>),

    #[error("Invalid output format: {0}. Valid options: table, json")]
    InvalidOutputFormat(String),
}

/// Structured exit codes for simpleenvs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Success - command completed successfully.
    Success = 0,

    /// General error - unhandled or generic failure.
    GeneralError = 1,

    /// Not found - no .env file, or a requested key is absent.
    NotFound = 4,

    /// Validation error - malformed file, bad option, failed type conversion.
    ///
    /// Scripts should fix the input and not retry.
    ValidationError = 5,

    /// Security violation - path traversal, injection markers, oversized
    /// input or a file that changed after loading.
    SecurityViolation = 6,
}

impl ExitCode {
    /// Convert the exit code to an i32 for use with std::process::exit().
    pub const fn as_i32(self) -> i32 {
        self as u8 as i32
    }
}

impl From<&EnvError> for ExitCode {
    fn from(err: &EnvError) -> Self {
        match err.root_cause() {
            EnvError::PathTraversal { .. }
            | EnvError::FileSize { .. }
            | EnvError::DangerousContent(_)
            | EnvError::Integrity { .. }
            | EnvError::MemorySecurity { .. } => ExitCode::SecurityViolation,

            EnvError::InvalidInput(_)
            | EnvError::TypeConversion { .. }
            | EnvError::InvalidValue { .. } => ExitCode::ValidationError,

            EnvError::FileNotFound(_) | EnvError::KeyNotFound { .. } => ExitCode::NotFound,

            EnvError::EnvNotLoaded { .. } | EnvError::Io(_) | EnvError::FileParsing { .. } => {
                ExitCode::GeneralError
            }
        }
    }
}

impl From<&CliError> for ExitCode {
    fn from(err: &CliError) -> Self {
        match err {
            CliError::MissingKeys(_) => ExitCode::NotFound,
            CliError::InvalidOutputFormat(_) => ExitCode::ValidationError,
        }
    }
}

/// Extension trait for anyhow::Error to extract exit codes.
pub trait ExitCodeExt {
    /// Returns ExitCode::GeneralError if no known error is in the chain.
    fn exit_code(&self) -> ExitCode;
}

impl ExitCodeExt for anyhow::Error {
    fn exit_code(&self) -> ExitCode {
        for cause in self.chain() {
            if let Some(env_err) = cause.downcast_ref::<EnvError>() {
                return ExitCode::from(env_err);
            }
            if let Some(cli_err) = cause.downcast_ref::<CliError>() {
                return ExitCode::from(cli_err);
            }
        }
        ExitCode::GeneralError
    }
}
