//! Shared test utilities for simpleenvs CLI integration tests.
//!
//! Responsibilities:
//! - Provide a hermetic CLI command factory rooted in a temp directory.
//! - Write fixture `.env` files into that directory.
//!
//! Invariants / Assumptions:
//! - `SIMPLEENVS_*` variables from the host never reach the child process.
//! - The child's working directory is the fixture directory, so relative
//!   paths resolve inside it.

use assert_cmd::Command;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Returns a hermetic `simpleenvs` command running inside `dir`.
pub fn simpleenvs_cmd(dir: &Path) -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("simpleenvs");
    cmd.current_dir(dir);

    // Clear potential host leakage
    cmd.env_remove("SIMPLEENVS_PATH")
        .env_remove("SIMPLEENVS_MAX_DEPTH")
        .env_remove("SIMPLEENVS_STRICT")
        .env_remove("RUST_LOG");

    cmd
}

/// Creates a temp directory holding `files` (relative path, content).
pub fn fixture(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    for (relative, content) in files {
        let path = dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create fixture directory");
        }
        fs::write(&path, content).expect("Failed to write fixture file");
    }
    dir
}
