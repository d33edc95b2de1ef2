//! Command dispatch logic.
//!
//! Responsibilities:
//! - Route parsed CLI arguments to appropriate command handlers.
//! - Build the shared command context (load options, formatter, quiet flag).
//!
//! Does NOT handle:
//! - CLI structure definitions (see `args` module).
//! - Exit-code mapping (see `error` module).

use anyhow::Result;

use crate::args::{Cli, Commands};
use crate::commands::{self, CommandContext};

/// Dispatch CLI commands to their respective handlers.
pub(crate) async fn run_command(cli: Cli) -> Result<()> {
    let options = cli.load_options()?;
    let ctx = CommandContext::new(options, &cli.output, cli.quiet)?;

    match cli.command {
        Commands::Check => commands::check::run(&ctx).await?,
        Commands::Get { key } => commands::get::run(&ctx, &key).await?,
        Commands::Keys => commands::keys::run(&ctx).await?,
        Commands::Show { reveal } => commands::show::run(&ctx, reveal).await?,
        Commands::Info => commands::info::run(&ctx).await?,
        Commands::Verify => commands::verify::run(&ctx).await?,
        Commands::Scan => commands::scan::run(&ctx).await?,
        Commands::Export { format, no_quote } => {
            commands::export::run(&ctx, format, no_quote).await?
        }
        Commands::Require { keys } => commands::require::run(&ctx, &keys).await?,
    }

    Ok(())
}
