//! Info command implementation.

use anyhow::Result;

use super::CommandContext;
use crate::formatters::InfoOutput;

pub async fn run(ctx: &CommandContext) -> Result<()> {
    let store = ctx.load_store().await?;
    let info = InfoOutput {
        security: store.security_info(),
        files: store.tracked_files(),
    };
    print!("{}", ctx.formatter.format_info(&info)?);
    Ok(())
}
