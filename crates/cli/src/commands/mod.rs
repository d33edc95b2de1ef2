//! CLI command implementations.

pub mod check;
pub mod export;
pub mod get;
pub mod info;
pub mod keys;
pub mod require;
pub mod scan;
pub mod show;
pub mod verify;

use anyhow::{Context, Result};
use simpleenvs::{LoadOptions, SecureEnvLoader};

use crate::formatters::{Formatter, OutputFormat, get_formatter};

/// Settings shared by every command.
pub struct CommandContext {
    pub options: LoadOptions,
    pub formatter: Box<dyn Formatter>,
    pub quiet: bool,
}

impl CommandContext {
    pub fn new(options: LoadOptions, output: &str, quiet: bool) -> Result<Self> {
        let format = OutputFormat::from_str(output)?;
        Ok(Self {
            options,
            formatter: get_formatter(format),
            quiet,
        })
    }

    /// Load a fresh secure store per these options.
    pub async fn load_store(&self) -> Result<SecureEnvLoader> {
        let mut store = SecureEnvLoader::new();
        store
            .load_secure_async(self.options.clone())
            .await
            .context("Failed to load environment")?;
        Ok(store)
    }

    /// Print a status line on stderr unless `--quiet` was given.
    pub fn status(&self, message: &str) {
        if !self.quiet {
            eprintln!("{}", message);
        }
    }
}
