//! CLI argument definitions and parsing.
//!
//! Responsibilities:
//! - Define the CLI structure using clap derive macros.
//! - Turn global flags into `LoadOptions` on top of `SIMPLEENVS_*` variables.
//!
//! Non-responsibilities:
//! - Does not execute commands (see `dispatch` module).

use clap::{Parser, Subcommand, ValueEnum};
use simpleenvs::LoadOptions;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "simpleenvs")]
#[command(about = "Inspect, verify and export .env files with the SimpleEnvs secure loader", long_about = None)]
#[command(version)]
#[command(
    after_help = "Examples:\n  simpleenvs check\n  simpleenvs --path config/app.env get DB_PORT\n  simpleenvs show --reveal\n  simpleenvs -o json info\n  simpleenvs export --format shell\n  simpleenvs require DB_HOST DB_PORT API_KEY\n"
)]
pub struct Cli {
    /// Relative path of the .env file to load (skips directory scanning).
    ///
    /// Can also be set via SIMPLEENVS_PATH environment variable.
    #[arg(short, long, global = true, value_name = "FILE")]
    pub path: Option<PathBuf>,

    /// How many directory levels below the working directory to scan (0-3).
    ///
    /// Can also be set via SIMPLEENVS_MAX_DEPTH environment variable.
    #[arg(long, global = true)]
    pub max_depth: Option<usize>,

    /// Use relaxed key rules and skip invalid lines instead of failing.
    #[arg(long, global = true)]
    pub relaxed: bool,

    /// Output format (table, json)
    #[arg(short, long, global = true, default_value = "table")]
    pub output: String,

    /// Suppress status messages on stderr.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Environment variables first, then CLI flags on top.
    pub fn load_options(&self) -> simpleenvs::Result<LoadOptions> {
        let mut options = LoadOptions::new().from_env()?;
        if let Some(ref path) = self.path {
            options = options.with_path(path.clone());
        }
        if let Some(depth) = self.max_depth {
            options = options.with_max_depth(depth);
        }
        if self.relaxed {
            options = options.with_strict_validation(false);
        }
        options.validate()?;
        Ok(options)
    }
}

/// Rendering for `export`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// KEY=VALUE lines
    Env,
    /// export KEY='VALUE' lines
    Shell,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load the file and report its key count and content hash
    Check,

    /// Print a single value
    Get {
        /// Key to look up
        key: String,
    },

    /// List loaded keys
    Keys,

    /// List keys with their types and (masked) values
    Show {
        /// Print values in clear text
        #[arg(long)]
        reveal: bool,
    },

    /// Show session and bookkeeping information for the load
    Info,

    /// Load the file, then re-hash it and confirm it is unchanged
    Verify,

    /// Print the path of the .env file that would be loaded
    Scan,

    /// Print loaded values in env or shell syntax
    Export {
        /// Output syntax
        #[arg(long, value_enum, default_value = "env")]
        format: ExportFormat,

        /// Leave shell values unquoted
        #[arg(long)]
        no_quote: bool,
    },

    /// Exit non-zero unless every listed key is present
    Require {
        /// Keys that must be present
        #[arg(required = true)]
        keys: Vec<String>,
    },
}
