//! Load options and their environment-variable overrides.
//!
//! Responsibilities:
//! - Provide a builder-pattern `LoadOptions` for a single load call.
//! - Read `SIMPLEENVS_*` variables with empty/whitespace filtering.
//!
//! Does NOT handle:
//! - Performing the load (see `store.rs` and `simple.rs`).
//!
//! Invariants:
//! - Empty or whitespace-only environment variables are treated as unset.
//! - Builder methods applied after `from_env()` take precedence over it.
//! - Invalid variable values return `EnvError::InvalidValue` naming the variable.

use std::path::{Path, PathBuf};

use crate::constants::{
    DEFAULT_MAX_DEPTH, ENV_MAX_DEPTH_VAR, ENV_PATH_VAR, ENV_STRICT_VAR, MAX_SCAN_DEPTH,
};
use crate::error::{EnvError, Result};

/// Read an environment variable, returning None if unset, empty, or whitespace-only.
/// Returns the trimmed value if present.
pub fn env_var_or_none(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == s.len() {
            Some(s)
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn parse_flag(var: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(EnvError::InvalidValue {
            var: var.to_string(),
            message: "must be true or false".to_string(),
        }),
    }
}

/// Options for one load call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    path: Option<PathBuf>,
    max_depth: usize,
    strict_validation: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadOptions {
    /// Scan from the working directory with the default depth and strict validation.
    pub fn new() -> Self {
        Self {
            path: None,
            max_depth: DEFAULT_MAX_DEPTH,
            strict_validation: true,
        }
    }

    /// Load this file instead of scanning.
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_strict_validation(mut self, strict: bool) -> Self {
        self.strict_validation = strict;
        self
    }

    /// Apply `SIMPLEENVS_PATH`, `SIMPLEENVS_MAX_DEPTH` and `SIMPLEENVS_STRICT`.
    pub fn from_env(mut self) -> Result<Self> {
        if let Some(path) = env_var_or_none(ENV_PATH_VAR) {
            self.path = Some(PathBuf::from(path));
        }
        if let Some(depth) = env_var_or_none(ENV_MAX_DEPTH_VAR) {
            self.max_depth = depth.parse().map_err(|_| EnvError::InvalidValue {
                var: ENV_MAX_DEPTH_VAR.to_string(),
                message: "must be a non-negative integer".to_string(),
            })?;
        }
        if let Some(strict) = env_var_or_none(ENV_STRICT_VAR) {
            self.strict_validation = parse_flag(ENV_STRICT_VAR, &strict)?;
        }
        Ok(self)
    }

    /// Reject depths beyond the hard ceiling.
    pub fn validate(&self) -> Result<()> {
        if self.max_depth > MAX_SCAN_DEPTH {
            return Err(EnvError::InvalidValue {
                var: "max_depth".to_string(),
                message: format!(
                    "must be between 0 and {} (got {})",
                    MAX_SCAN_DEPTH, self.max_depth
                ),
            });
        }
        Ok(())
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Depth actually used for scanning, clamped to `MAX_SCAN_DEPTH`.
    pub fn effective_depth(&self) -> usize {
        self.max_depth.min(MAX_SCAN_DEPTH)
    }

    pub fn strict_validation(&self) -> bool {
        self.strict_validation
    }
}
