//! SimpleEnvs CLI - inspect, verify and export `.env` files.
//!
//! Responsibilities:
//! - Parse command-line arguments and `SIMPLEENVS_*` environment variables.
//! - Load the target file through the secure loader and print results.
//!
//! Does NOT handle:
//! - Parsing or validation rules (see the `simpleenvs` library crate).
//!
//! Invariants:
//! - Logs go to stderr so stdout stays machine-readable.
//! - The process exit code always comes from `ExitCode`.

mod args;
mod commands;
mod dispatch;
mod error;
mod formatters;

use args::Cli;
use clap::Parser;
use dispatch::run_command;
use error::{ExitCode, ExitCodeExt};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let exit_code = match run_command(cli).await {
        Ok(()) => ExitCode::Success,
        Err(e) => {
            eprintln!("{:#}", e);
            e.exit_code()
        }
    };

    std::process::exit(exit_code.as_i32());
}
