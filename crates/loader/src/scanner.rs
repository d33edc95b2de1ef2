//! Depth-bounded search for a `.env` file.
//!
//! Responsibilities:
//! - Look for `ENV_FILE_NAME` among a directory's direct children first.
//! - Recurse into visible, non-symlink subdirectories in name order until the
//!   depth budget is spent.
//!
//! Does NOT handle:
//! - Validating the located file (see `validator::validate_file_metadata`).
//!
//! Invariants:
//! - The first match in pre-order wins; there is no shortest-path search.
//! - Symlinks are never followed, neither as the candidate file nor as a directory.
//! - A directory listing more than `MAX_ENTRIES_PER_DIRECTORY` entries aborts the
//!   whole scan; unreadable directories only end their own branch.

use std::fs::DirEntry;
use std::path::{Path, PathBuf};

use crate::constants::{ENV_FILE_NAME, MAX_ENTRIES_PER_DIRECTORY};
use crate::error::{EnvError, Result};
use crate::journal::{AccessJournal, Operation};

/// Scanner configuration; cheap to construct per load.
#[derive(Debug, Clone)]
pub struct DirectoryScanner {
    max_depth: usize,
    journal: Option<AccessJournal>,
}

impl DirectoryScanner {
    pub fn new(max_depth: usize) -> Self {
        Self {
            max_depth,
            journal: None,
        }
    }

    /// Record swallowed directory errors in `journal`.
    pub fn with_journal(mut self, journal: AccessJournal) -> Self {
        self.journal = Some(journal);
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Search `root` and return the first `.env` found, if any.
    pub fn scan(&self, root: &Path) -> Result<Option<PathBuf>> {
        if !root.is_dir() {
            tracing::debug!(root = %root.display(), "Scan root is not a directory");
            return Ok(None);
        }
        let found = self.scan_dir(root, self.max_depth)?;
        match &found {
            Some(path) => tracing::debug!(path = %path.display(), "Located env file"),
            None => tracing::debug!(root = %root.display(), depth = self.max_depth, "No env file found"),
        }
        Ok(found)
    }

    fn scan_dir(&self, dir: &Path, depth: usize) -> Result<Option<PathBuf>> {
        let entries = match read_entries(dir)? {
            Some(entries) => entries,
            None => {
                self.record_failure(dir);
                return Ok(None);
            }
        };

        for entry in &entries {
            if entry.file_name() == ENV_FILE_NAME
                && entry.file_type().is_ok_and(|t| t.is_file())
            {
                return Ok(Some(dir.join(ENV_FILE_NAME)));
            }
        }

        if depth == 0 {
            return Ok(None);
        }

        let mut subdirs: Vec<PathBuf> = entries
            .iter()
            .filter(|entry| entry.file_type().is_ok_and(|t| t.is_dir()))
            .filter(|entry| !entry.file_name().to_string_lossy().starts_with('.'))
            .map(|entry| entry.path())
            .collect();
        subdirs.sort();

        for subdir in subdirs {
            if let Some(found) = self.scan_dir(&subdir, depth - 1)? {
                return Ok(Some(found));
            }
        }

        Ok(None)
    }

    fn record_failure(&self, dir: &Path) {
        if let Some(journal) = &self.journal {
            journal.record(
                Operation::DirectoryScan,
                Some(&dir.to_string_lossy()),
                false,
            );
        }
    }
}

/// List a directory, enforcing the entry cap.
///
/// Returns `Ok(None)` when the directory cannot be read.
fn read_entries(dir: &Path) -> Result<Option<Vec<DirEntry>>> {
    let iter = match std::fs::read_dir(dir) {
        Ok(iter) => iter,
        Err(e) => {
            tracing::debug!(dir = %dir.display(), error = %e, "Skipping unreadable directory");
            return Ok(None);
        }
    };

    let mut entries = Vec::new();
    for entry in iter {
        match entry {
            Ok(entry) => entries.push(entry),
            Err(e) => {
                tracing::debug!(dir = %dir.display(), error = %e, "Skipping unreadable entry");
            }
        }
        if entries.len() > MAX_ENTRIES_PER_DIRECTORY {
            tracing::warn!(dir = %dir.display(), "Directory exceeds entry limit");
            return Err(EnvError::invalid(format!(
                "Too many directory entries in {} (max: {})",
                dir.display(),
                MAX_ENTRIES_PER_DIRECTORY
            )));
        }
    }
    Ok(Some(entries))
}

/// Scan `root` for a `.env` file without journaling.
pub fn scan(root: &Path, max_depth: usize) -> Result<Option<PathBuf>> {
    DirectoryScanner::new(max_depth).scan(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "A=1\n").unwrap();
    }

    #[test]
    fn test_finds_env_in_root() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join(".env"));
        touch(&dir.path().join("sub/.env"));

        let found = scan(dir.path(), 2).unwrap();
        assert_eq!(found, Some(dir.path().join(".env")));
    }

    #[test]
    fn test_depth_budget() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("a")).unwrap();
        touch(&dir.path().join("a/b/.env"));

        assert_eq!(
            scan(dir.path(), 2).unwrap(),
            Some(dir.path().join("a").join("b").join(".env"))
        );
        assert_eq!(scan(dir.path(), 1).unwrap(), None);
        assert_eq!(scan(dir.path(), 0).unwrap(), None);
    }

    #[test]
    fn test_preorder_first_match_not_shortest() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("a/deep/.env"));
        touch(&dir.path().join("b/.env"));

        let found = scan(dir.path(), 2).unwrap();
        assert_eq!(found, Some(dir.path().join("a").join("deep").join(".env")));
    }

    #[test]
    fn test_skips_hidden_directories() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join(".git/.env"));
        assert_eq!(scan(dir.path(), 3).unwrap(), None);
    }

    #[test]
    fn test_env_directory_is_not_a_match() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join(".env")).unwrap();
        assert_eq!(scan(dir.path(), 1).unwrap(), None);
    }

    #[test]
    fn test_missing_root_is_no_match() {
        let dir = TempDir::new().unwrap();
        assert_eq!(scan(&dir.path().join("nope"), 2).unwrap(), None);
    }

    #[test]
    fn test_entry_limit_aborts() {
        let dir = TempDir::new().unwrap();
        for i in 0..=MAX_ENTRIES_PER_DIRECTORY {
            fs::write(dir.path().join(format!("f{i}")), "").unwrap();
        }
        assert!(matches!(
            scan(dir.path(), 0),
            Err(EnvError::InvalidInput(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_are_not_followed() {
        let dir = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        touch(&outside.path().join(".env"));
        touch(&outside.path().join("nested/.env"));

        std::os::unix::fs::symlink(outside.path().join(".env"), dir.path().join(".env")).unwrap();
        std::os::unix::fs::symlink(outside.path().join("nested"), dir.path().join("linked"))
            .unwrap();

        assert_eq!(scan(dir.path(), 2).unwrap(), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_branch_is_swallowed_and_journaled() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let locked = dir.path().join("a_locked");
        fs::create_dir_all(&locked).unwrap();
        touch(&dir.path().join("b_open/.env"));
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Running as root ignores permission bits, so only assert the journal
        // entry when the lock actually took effect.
        let lock_effective = fs::read_dir(&locked).is_err();

        let journal = AccessJournal::new();
        let found = DirectoryScanner::new(2)
            .with_journal(journal.clone())
            .scan(dir.path())
            .unwrap();

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(found, Some(dir.path().join("b_open").join(".env")));
        if lock_effective {
            let entries = journal.entries();
            assert!(
                entries
                    .iter()
                    .any(|e| e.operation == Operation::DirectoryScan && !e.success)
            );
        }
    }
}
