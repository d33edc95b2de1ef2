//! Output formatters for CLI commands.
//!
//! Responsibilities:
//! - Provide table and JSON renderings for every command result.
//! - Mask values unless the caller explicitly asks to reveal them.
//!
//! Does NOT handle:
//! - Direct printing to stdout (returns formatted strings).
//!
//! Invariants:
//! - JSON output is always a single valid document.
//! - Table output for an empty result is a human message, not an empty string.

use anyhow::Result;
use serde::Serialize;
use simpleenvs::{EnvValue, FileDescriptor, SecurityInfo};

use crate::error::CliError;

mod json;
mod table;

pub use json::JsonFormatter;
pub use table::TableFormatter;

/// Placeholder printed instead of a hidden value.
pub const MASK: &str = "********";

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl OutputFormat {
    /// Parse from string.
    pub fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(CliError::InvalidOutputFormat(s.to_string()).into()),
        }
    }
}

/// Result of `check`.
#[derive(Debug, Clone, Serialize)]
pub struct CheckOutput {
    pub path: String,
    pub keys: usize,
    pub size: u64,
    pub content_hash: String,
    pub strict: bool,
}

impl CheckOutput {
    pub fn new(descriptor: &FileDescriptor, keys: usize, strict: bool) -> Self {
        Self {
            path: descriptor.path().display().to_string(),
            keys,
            size: descriptor.size(),
            content_hash: descriptor.content_hash().to_string(),
            strict,
        }
    }
}

/// One row of `show`.
#[derive(Debug, Clone, Serialize)]
pub struct EntryRow {
    pub key: String,
    #[serde(rename = "type")]
    pub type_name: &'static str,
    pub value: String,
}

impl EntryRow {
    pub fn new(key: &str, value: &EnvValue, reveal: bool) -> Self {
        Self {
            key: key.to_string(),
            type_name: value.type_name(),
            value: if reveal {
                value.to_string()
            } else {
                MASK.to_string()
            },
        }
    }
}

/// Result of `info`.
#[derive(Debug, Clone, Serialize)]
pub struct InfoOutput {
    pub security: SecurityInfo,
    pub files: Vec<FileDescriptor>,
}

/// One row of `verify`.
#[derive(Debug, Clone, Serialize)]
pub struct VerifyRow {
    pub path: String,
    pub verified: bool,
}

/// Result of `require`.
#[derive(Debug, Clone, Serialize)]
pub struct RequireOutput {
    pub required: Vec<String>,
    pub missing: Vec<String>,
}

/// Formatter trait for different output types.
pub trait Formatter {
    fn format_check(&self, check: &CheckOutput) -> Result<String>;

    fn format_value(&self, key: &str, value: &EnvValue) -> Result<String>;

    fn format_keys(&self, keys: &[String]) -> Result<String>;

    fn format_entries(&self, entries: &[EntryRow]) -> Result<String>;

    fn format_info(&self, info: &InfoOutput) -> Result<String>;

    fn format_verify(&self, rows: &[VerifyRow]) -> Result<String>;

    fn format_scan(&self, path: &str) -> Result<String>;

    fn format_require(&self, result: &RequireOutput) -> Result<String>;
}

/// Get a formatter for the specified output format.
pub fn get_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Table => Box::new(TableFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}
