//! Export command implementation.

use anyhow::Result;
use simpleenvs::{to_env_format, to_shell_format};

use super::CommandContext;
use crate::args::ExportFormat;

pub async fn run(ctx: &CommandContext, format: ExportFormat, no_quote: bool) -> Result<()> {
    let store = ctx.load_store().await?;
    let map = store.get_all_secure();
    let output = match format {
        ExportFormat::Env => to_env_format(&map),
        ExportFormat::Shell => to_shell_format(&map, !no_quote),
    };
    print!("{}", output);
    Ok(())
}
