//! Error types for loading and accessing environment data.
//!
//! Responsibilities:
//! - Define one error enum covering validation, parsing, access and lifecycle failures.
//! - Classify errors as security-relevant and map them to stable error codes.
//!
//! Does NOT handle:
//! - Journaling of failures (see `journal.rs`; the store records before propagating).
//! - Exit-code mapping for the command-line front end (see the cli crate).
//!
//! Invariants:
//! - Error messages never include raw values read from a `.env` file.
//! - `FileParsing` keeps the originating error reachable through `source()`.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by the validator, parser, scanner and both loaders.
#[derive(Error, Debug)]
pub enum EnvError {
    #[error("Path traversal detected: {path}")]
    PathTraversal { path: String },

    #[error("File too large: {size} bytes (max: {max_size})")]
    FileSize {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Input rejected as hostile: injection markers, NUL bytes or symlinks.
    #[error("Dangerous content rejected: {0}")]
    DangerousContent(String),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Wraps a lower-level failure raised while reading or walking a file.
    #[error("Failed to parse file: {}{}", path.display(), line_suffix(*line))]
    FileParsing {
        path: PathBuf,
        line: Option<usize>,
        #[source]
        source: Box<EnvError>,
    },

    #[error("Environment not loaded. Call load() before {operation}")]
    EnvNotLoaded { operation: String },

    #[error("Environment variable '{key}' not found")]
    KeyNotFound { key: String },

    /// SAFETY: carries the key and target type only, never the stored value.
    #[error("Cannot convert '{key}' to {target}")]
    TypeConversion { key: String, target: &'static str },

    #[error("File integrity check failed for {}", path.display())]
    Integrity {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("Memory security violation in {operation}: {reason}")]
    MemorySecurity { operation: String, reason: String },

    #[error("Invalid value for {var}: {message}")]
    InvalidValue { var: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn line_suffix(line: Option<usize>) -> String {
    match line {
        Some(n) => format!(" at line {}", n),
        None => String::new(),
    }
}

impl EnvError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        EnvError::InvalidInput(message.into())
    }

    pub(crate) fn dangerous(message: impl Into<String>) -> Self {
        EnvError::DangerousContent(message.into())
    }

    /// Wrap `self` as a parsing failure for `path`, keeping an existing wrapper intact.
    pub(crate) fn into_parsing(self, path: impl Into<PathBuf>, line: Option<usize>) -> Self {
        match self {
            already @ EnvError::FileParsing { .. } => already,
            other => EnvError::FileParsing {
                path: path.into(),
                line,
                source: Box::new(other),
            },
        }
    }

    /// Returns true for failures that indicate hostile or out-of-policy input.
    pub fn is_security(&self) -> bool {
        match self {
            EnvError::PathTraversal { .. }
            | EnvError::FileSize { .. }
            | EnvError::InvalidInput(_)
            | EnvError::DangerousContent(_)
            | EnvError::Integrity { .. }
            | EnvError::MemorySecurity { .. } => true,
            EnvError::FileParsing { source, .. } => source.is_security(),
            _ => false,
        }
    }

    /// Returns the innermost error, unwrapping `FileParsing` layers.
    pub fn root_cause(&self) -> &EnvError {
        match self {
            EnvError::FileParsing { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Stable code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            EnvError::PathTraversal { .. } => "SE101",
            EnvError::FileSize { .. } => "SE102",
            EnvError::InvalidInput(_) => "SE103",
            EnvError::DangerousContent(_) => "SE104",
            EnvError::Integrity { .. } => "SE105",
            EnvError::MemorySecurity { .. } => "SE107",
            EnvError::FileParsing { .. } => "SE200",
            EnvError::EnvNotLoaded { .. } => "SE201",
            EnvError::KeyNotFound { .. } => "SE202",
            EnvError::TypeConversion { .. } => "SE203",
            EnvError::InvalidValue { .. } => "SE300",
            EnvError::FileNotFound(_) | EnvError::Io(_) => "SE001",
        }
    }
}

pub type Result<T> = std::result::Result<T, EnvError>;
