//! Verify command implementation.
//!
//! Loads the file, then re-hashes every tracked file against the digest taken
//! at load time. A changed file fails with an integrity error.

use anyhow::Result;
use tracing::info;

use super::CommandContext;
use crate::formatters::VerifyRow;

pub async fn run(ctx: &CommandContext) -> Result<()> {
    let store = ctx.load_store().await?;

    let mut rows = Vec::new();
    for descriptor in store.tracked_files() {
        let verified = store.verify_integrity(descriptor.path())?;
        info!(path = %descriptor.path().display(), verified, "Integrity verified");
        rows.push(VerifyRow {
            path: descriptor.path().display().to_string(),
            verified,
        });
    }

    print!("{}", ctx.formatter.format_verify(&rows)?);
    if rows.iter().any(|row| !row.verified) {
        anyhow::bail!("One or more files could not be verified");
    }
    Ok(())
}
