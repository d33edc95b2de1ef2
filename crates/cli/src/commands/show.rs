//! Show command implementation.

use anyhow::Result;

use super::CommandContext;
use crate::formatters::EntryRow;

pub async fn run(ctx: &CommandContext, reveal: bool) -> Result<()> {
    let store = ctx.load_store().await?;
    let rows: Vec<EntryRow> = store
        .get_all_secure()
        .iter()
        .map(|(key, value)| EntryRow::new(key, value, reveal))
        .collect();
    print!("{}", ctx.formatter.format_entries(&rows)?);
    if !reveal {
        ctx.status("Values are masked; pass --reveal to show them.");
    }
    Ok(())
}
