//! Scan command implementation.

use anyhow::Result;
use simpleenvs::{DirectoryScanner, EnvError, validate_path};
use std::path::{Path, PathBuf};

use super::CommandContext;

pub async fn run(ctx: &CommandContext) -> Result<()> {
    let path = match ctx.options.path() {
        Some(path) => {
            let text = path.to_string_lossy();
            validate_path(&text)?;
            if !path.is_file() {
                return Err(EnvError::FileNotFound(path.to_path_buf()).into());
            }
            path.to_path_buf()
        }
        None => {
            let depth = ctx.options.effective_depth();
            tokio::task::spawn_blocking(move || {
                DirectoryScanner::new(depth).scan(Path::new("./"))
            })
            .await??
            .ok_or_else(|| EnvError::FileNotFound(PathBuf::from("./")))?
        }
    };

    print!("{}", ctx.formatter.format_scan(&path.display().to_string())?);
    Ok(())
}
