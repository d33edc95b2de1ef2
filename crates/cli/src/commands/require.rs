//! Require command implementation.

use anyhow::Result;
use simpleenvs::missing_keys;

use super::CommandContext;
use crate::error::CliError;
use crate::formatters::RequireOutput;

pub async fn run(ctx: &CommandContext, keys: &[String]) -> Result<()> {
    let store = ctx.load_store().await?;
    let missing = missing_keys(&store.get_all_secure(), keys);

    let result = RequireOutput {
        required: keys.to_vec(),
        missing: missing.clone(),
    };
    let output = ctx.formatter.format_require(&result)?;
    if missing.is_empty() {
        if !ctx.quiet {
            print!("{}", output);
        }
        return Ok(());
    }

    print!("{}", output);
    Err(CliError::MissingKeys(missing).into())
}
