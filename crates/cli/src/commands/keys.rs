//! Keys command implementation.

use anyhow::Result;

use super::CommandContext;

pub async fn run(ctx: &CommandContext) -> Result<()> {
    let store = ctx.load_store().await?;
    let keys = store.get_all_keys_secure();
    print!("{}", ctx.formatter.format_keys(&keys)?);
    Ok(())
}
