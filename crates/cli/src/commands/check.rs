//! Check command implementation.

use anyhow::{Context, Result};

use super::CommandContext;
use crate::formatters::CheckOutput;

pub async fn run(ctx: &CommandContext) -> Result<()> {
    let store = ctx.load_store().await?;
    let files = store.tracked_files();
    let descriptor = files
        .last()
        .context("Loaded store is not tracking any file")?;

    let check = CheckOutput::new(
        descriptor,
        store.security_info().env_count,
        ctx.options.strict_validation(),
    );
    print!("{}", ctx.formatter.format_check(&check)?);
    ctx.status("Environment file is valid.");
    Ok(())
}
