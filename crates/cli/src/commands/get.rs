//! Get command implementation.

use anyhow::Result;
use simpleenvs::EnvError;

use super::CommandContext;

pub async fn run(ctx: &CommandContext, key: &str) -> Result<()> {
    let store = ctx.load_store().await?;
    let value = store
        .get_secure(key)
        .ok_or_else(|| EnvError::KeyNotFound {
            key: key.to_string(),
        })?;
    print!("{}", ctx.formatter.format_value(key, &value)?);
    Ok(())
}
