//! Memory-isolated environment store.
//!
//! Responsibilities:
//! - Locate, validate and parse a `.env` file through the secure pipeline and
//!   hold the result privately; nothing is written to the process environment.
//! - Serve typed lookups, journaling every access.
//! - Track content hashes of loaded files for later tamper checks.
//! - Wipe held values on request and on drop.
//!
//! Does NOT handle:
//! - Process-environment sync (see `simple.rs`).
//! - Serialization of the map for export (see `export.rs`).
//!
//! Invariants:
//! - A load either replaces the whole map or leaves the previous state intact.
//! - Loads take `&mut self`; lookups take `&self` and are safe to share across threads.
//! - Every lookup appends exactly one journal entry, hit or miss.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use zeroize::Zeroize;

use crate::constants::WIPE_PASSES;
use crate::error::{EnvError, Result};
use crate::integrity::{FileDescriptor, HashCache, hash_file};
use crate::journal::{AccessJournal, AccessLogEntry, Operation};
use crate::options::LoadOptions;
use crate::parser::{ParsedFile, SecureParser};
use crate::scanner::DirectoryScanner;
use crate::validator::validate_path;
use crate::value::{EnvMap, EnvValue};

/// Scan root used when no explicit path is given.
const SCAN_ROOT: &str = "./";

/// Fill characters for the overwrite passes that precede zeroization.
const WIPE_FILL: [char; 5] = ['W', 'I', 'P', 'E', 'D'];

/// Snapshot of a store's session and bookkeeping counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecurityInfo {
    pub session_id: String,
    pub creation_time: DateTime<Utc>,
    pub access_count: u64,
    pub env_count: usize,
    pub file_hashes: usize,
    pub log_entries: usize,
}

/// Secure loader. Values live only inside this handle.
pub struct SecureEnvLoader {
    map: EnvMap,
    hashes: HashCache,
    journal: AccessJournal,
}

impl fmt::Debug for SecureEnvLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureEnvLoader")
            .field("session_id", &self.journal.session().id())
            .field("env_count", &self.map.len())
            .field("file_hashes", &self.hashes.len())
            .finish_non_exhaustive()
    }
}

impl Default for SecureEnvLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Find and parse the file `options` point at, journaling each step.
fn locate_and_parse(journal: &AccessJournal, options: &LoadOptions) -> Result<ParsedFile> {
    let parser = SecureParser::new(options.strict_validation()).with_journal(journal.clone());

    if let Some(path) = options.path() {
        return parser.parse_file(path);
    }

    let root_check = validate_path(SCAN_ROOT);
    journal.record(Operation::PathValidation, Some(SCAN_ROOT), root_check.is_ok());
    root_check?;

    let found = DirectoryScanner::new(options.effective_depth())
        .with_journal(journal.clone())
        .scan(Path::new(SCAN_ROOT))?;
    match found {
        Some(path) => parser.parse_file(&path),
        None => Err(EnvError::FileNotFound(PathBuf::from(SCAN_ROOT))),
    }
}

impl SecureEnvLoader {
    /// Create an empty store with a fresh session.
    pub fn new() -> Self {
        Self {
            map: EnvMap::new(),
            hashes: HashCache::default(),
            journal: AccessJournal::new(),
        }
    }

    /// Load per `options`, replacing the current map on success.
    pub fn load_secure(&mut self, options: &LoadOptions) -> Result<()> {
        let result = locate_and_parse(&self.journal, options);
        self.commit(result)
    }

    /// Same as [`load_secure`](Self::load_secure), with scanning and parsing
    /// run on tokio's blocking pool.
    pub async fn load_secure_async(&mut self, options: LoadOptions) -> Result<()> {
        let journal = self.journal.clone();
        let result = tokio::task::spawn_blocking(move || locate_and_parse(&journal, &options))
            .await
            .map_err(|e| EnvError::Io(std::io::Error::other(e)))
            .and_then(|inner| inner);
        self.commit(result)
    }

    fn commit(&mut self, result: Result<ParsedFile>) -> Result<()> {
        match result {
            Ok(parsed) => {
                let (map, descriptor) = parsed.into_parts();
                tracing::info!(
                    path = %descriptor.path().display(),
                    keys = map.len(),
                    session = %self.journal.session().id(),
                    "Environment loaded"
                );
                let mut previous = std::mem::replace(&mut self.map, map);
                zeroize_map(&mut previous);
                self.hashes.insert(descriptor);
                self.journal.record(Operation::LoadComplete, None, true);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, code = e.code(), "Environment load failed");
                self.journal.record(Operation::LoadFailed, None, false);
                Err(e)
            }
        }
    }

    /// Look up `key`.
    pub fn get_secure(&self, key: &str) -> Option<EnvValue> {
        let value = self.map.get(key).cloned();
        self.journal.record(Operation::Get, Some(key), value.is_some());
        value
    }

    pub fn get_with_default_secure(&self, key: &str, default: EnvValue) -> EnvValue {
        let value = self.map.get(key).cloned().unwrap_or(default);
        self.journal.record(Operation::GetDefault, Some(key), true);
        value
    }

    /// Integer view of `key`, or `default` when missing or not an integer.
    pub fn get_int_secure(&self, key: &str, default: i64) -> i64 {
        self.get_secure(key)
            .and_then(|v| v.coerce_int())
            .unwrap_or(default)
    }

    /// Boolean view of `key`, or `default` when missing or not a boolean.
    pub fn get_bool_secure(&self, key: &str, default: bool) -> bool {
        self.get_secure(key)
            .and_then(|v| v.coerce_bool())
            .unwrap_or(default)
    }

    /// Textual rendering of `key`, or `default` when missing.
    pub fn get_str_secure(&self, key: &str, default: &str) -> String {
        self.get_secure(key)
            .map(|v| v.to_string())
            .unwrap_or_else(|| default.to_string())
    }

    pub fn get_int_strict(&self, key: &str) -> Result<i64> {
        let value = self.get_secure(key).ok_or_else(|| EnvError::KeyNotFound {
            key: key.to_string(),
        })?;
        value.coerce_int().ok_or_else(|| EnvError::TypeConversion {
            key: key.to_string(),
            target: "integer",
        })
    }

    pub fn get_bool_strict(&self, key: &str) -> Result<bool> {
        let value = self.get_secure(key).ok_or_else(|| EnvError::KeyNotFound {
            key: key.to_string(),
        })?;
        value.coerce_bool().ok_or_else(|| EnvError::TypeConversion {
            key: key.to_string(),
            target: "boolean",
        })
    }

    /// Loaded keys in sorted order.
    pub fn get_all_keys_secure(&self) -> Vec<String> {
        self.journal.record(Operation::GetKeys, None, true);
        self.map.keys().cloned().collect()
    }

    /// Copy of the loaded map.
    pub fn get_all_secure(&self) -> EnvMap {
        self.journal.record(Operation::GetAll, None, true);
        self.map.clone()
    }

    pub fn is_loaded(&self) -> bool {
        !self.map.is_empty()
    }

    pub fn security_info(&self) -> SecurityInfo {
        let session = self.journal.session();
        SecurityInfo {
            session_id: session.id().to_string(),
            creation_time: session.created_at(),
            access_count: session.access_count(),
            env_count: self.map.len(),
            file_hashes: self.hashes.len(),
            log_entries: self.journal.len(),
        }
    }

    /// Copy of the journal, oldest entry first.
    pub fn access_log(&self) -> Vec<AccessLogEntry> {
        self.journal.entries()
    }

    /// Descriptors of files loaded in this session, oldest first.
    pub fn tracked_files(&self) -> Vec<FileDescriptor> {
        self.hashes.descriptors().cloned().collect()
    }

    /// Re-hash `path` and compare against the hash recorded when it was loaded.
    ///
    /// Returns `Ok(false)` for untracked or unreadable files and
    /// `Err(EnvError::Integrity)` when the content changed.
    pub fn verify_integrity(&self, path: &Path) -> Result<bool> {
        let label = path.to_string_lossy();
        let Some(descriptor) = self.hashes.get(path) else {
            tracing::debug!(path = %path.display(), "Integrity check on untracked file");
            self.journal
                .record(Operation::IntegrityCheck, Some(&label), false);
            return Ok(false);
        };

        let actual = match hash_file(path) {
            Ok(hash) => hash,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Integrity check could not read file");
                self.journal
                    .record(Operation::IntegrityCheck, Some(&label), false);
                return Ok(false);
            }
        };

        if actual != descriptor.content_hash() {
            tracing::warn!(path = %path.display(), "File changed since load");
            self.journal
                .record(Operation::IntegrityCheck, Some(&label), false);
            return Err(EnvError::Integrity {
                path: path.to_path_buf(),
                expected: descriptor.content_hash().to_string(),
                actual,
            });
        }

        self.journal
            .record(Operation::IntegrityCheck, Some(&label), true);
        Ok(true)
    }

    /// Overwrite and drop every held value, forget tracked files, and start a
    /// new session whose journal opens with a `secure_wipe` entry.
    ///
    /// Best effort: only buffers owned by this store are overwritten. Values
    /// already cloned out through the accessors are not reachable from here.
    pub fn secure_wipe(&mut self) -> Result<()> {
        let old_session = self.journal.session().id().to_string();

        for pass in 0..WIPE_PASSES {
            let last = pass + 1 == WIPE_PASSES;
            for value in self.map.values_mut() {
                if last {
                    value.zeroize();
                } else {
                    value.overwrite(WIPE_FILL[pass % WIPE_FILL.len()]);
                }
            }
        }
        zeroize_map(&mut self.map);
        self.hashes.clear();

        // Values are gone before the journal is touched, so a poisoned
        // journal only loses the audit trail.
        let journal_cleared = self.journal.clear();
        self.journal = AccessJournal::new();
        self.journal
            .record(Operation::SecureWipe, None, journal_cleared.is_ok());

        match journal_cleared {
            Ok(()) => {
                tracing::info!(
                    old_session = %old_session,
                    new_session = %self.journal.session().id(),
                    "Secure store wiped"
                );
                Ok(())
            }
            Err(e) => {
                tracing::warn!(
                    old_session = %old_session,
                    new_session = %self.journal.session().id(),
                    error = %e,
                    "Secure store wiped, previous journal not cleared"
                );
                Err(e)
            }
        }
    }
}

/// Zeroize keys and values, leaving `map` empty.
fn zeroize_map(map: &mut EnvMap) {
    for (mut key, mut value) in std::mem::take(map) {
        key.zeroize();
        value.zeroize();
    }
}

impl Drop for SecureEnvLoader {
    fn drop(&mut self) {
        zeroize_map(&mut self.map);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::CwdGuard;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    fn loaded(content: &str) -> (TempDir, CwdGuard, SecureEnvLoader) {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".env"), content).unwrap();
        let guard = CwdGuard::new(dir.path());
        let mut store = SecureEnvLoader::new();
        store.load_secure(&LoadOptions::new()).unwrap();
        (dir, guard, store)
    }

    #[test]
    fn test_store_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SecureEnvLoader>();
    }

    #[test]
    fn test_empty_store() {
        let store = SecureEnvLoader::new();
        assert!(!store.is_loaded());
        assert_eq!(store.get_secure("A"), None);
        assert_eq!(store.security_info().env_count, 0);
        assert_eq!(store.access_log().len(), 1);
    }

    #[test]
    #[serial]
    fn test_scan_load_and_typed_lookups() {
        let (_dir, _guard, store) = loaded("HOST=db.local\nPORT=5432\nDEBUG=on\nNAME=7x\n");

        assert!(store.is_loaded());
        assert_eq!(store.get_secure("HOST"), Some(EnvValue::from("db.local")));
        assert_eq!(store.get_int_secure("PORT", 0), 5432);
        assert_eq!(store.get_int_secure("HOST", 11), 11);
        assert!(store.get_bool_secure("DEBUG", false));
        assert!(store.get_bool_secure("MISSING", true));
        assert_eq!(store.get_str_secure("PORT", ""), "5432");
        assert_eq!(store.get_str_secure("MISSING", "fallback"), "fallback");
        assert_eq!(
            store.get_with_default_secure("MISSING", EnvValue::Integer(3)),
            EnvValue::Integer(3)
        );
        assert_eq!(store.get_all_keys_secure(), vec!["DEBUG", "HOST", "NAME", "PORT"]);
        assert_eq!(store.get_all_secure().len(), 4);
    }

    #[test]
    #[serial]
    fn test_strict_accessors() {
        let (_dir, _guard, store) = loaded("PORT=80\nNAME=web\n");
        assert_eq!(store.get_int_strict("PORT").unwrap(), 80);
        assert!(matches!(
            store.get_int_strict("NAME"),
            Err(EnvError::TypeConversion { .. })
        ));
        assert!(matches!(
            store.get_bool_strict("NOPE"),
            Err(EnvError::KeyNotFound { .. })
        ));
    }

    #[test]
    #[serial]
    fn test_lookups_are_journaled_hit_or_miss() {
        let (_dir, _guard, store) = loaded("A=x\n");
        let before = store.security_info().access_count;

        store.get_secure("A");
        store.get_secure("B");

        let info = store.security_info();
        assert_eq!(info.access_count, before + 2);
        let log = store.access_log();
        let tail = &log[log.len() - 2..];
        assert_eq!(tail[0].operation, Operation::Get);
        assert!(tail[0].success);
        assert_eq!(tail[1].key.as_deref(), Some("B"));
        assert!(!tail[1].success);
    }

    #[test]
    #[serial]
    fn test_scan_miss_is_file_not_found_and_keeps_state() {
        let (dir, _guard, mut store) = loaded("A=x\n");
        fs::remove_file(dir.path().join(".env")).unwrap();

        let err = store.load_secure(&LoadOptions::new()).unwrap_err();
        assert!(matches!(err, EnvError::FileNotFound(_)));
        assert_eq!(store.get_secure("A"), Some(EnvValue::from("x")));
        assert_eq!(
            store.access_log().last().unwrap().operation,
            Operation::LoadFailed
        );
    }

    #[test]
    #[serial]
    fn test_failed_reload_leaves_previous_map() {
        let (dir, _guard, mut store) = loaded("A=x\n");
        fs::write(dir.path().join("bad.env"), "A=$(whoami)\n").unwrap();

        let err = store
            .load_secure(&LoadOptions::new().with_path("bad.env"))
            .unwrap_err();
        assert!(err.is_security());
        assert_eq!(store.get_secure("A"), Some(EnvValue::from("x")));
    }

    #[test]
    #[serial]
    fn test_verify_integrity() {
        let (dir, _guard, store) = loaded("A=x\n");
        assert!(store.verify_integrity(Path::new(".env")).unwrap());
        assert!(store.verify_integrity(Path::new("./.env")).unwrap());
        assert!(!store.verify_integrity(Path::new("other.env")).unwrap());

        fs::write(dir.path().join(".env"), "A=y\n").unwrap();
        assert!(matches!(
            store.verify_integrity(Path::new(".env")),
            Err(EnvError::Integrity { .. })
        ));

        fs::remove_file(dir.path().join(".env")).unwrap();
        assert!(!store.verify_integrity(Path::new(".env")).unwrap());
    }

    #[test]
    #[serial]
    fn test_secure_wipe_rotates_session() {
        let (_dir, _guard, mut store) = loaded("SECRET=hunter2\nPORT=1\n");
        let old = store.security_info().session_id;

        store.secure_wipe().unwrap();

        assert!(!store.is_loaded());
        assert_eq!(store.get_secure("SECRET"), None);
        let info = store.security_info();
        assert_ne!(info.session_id, old);
        assert_eq!(info.file_hashes, 0);
        let log = store.access_log();
        assert_eq!(log[0].operation, Operation::SecureWipe);
        assert!(log.iter().all(|e| e.session_id == info.session_id));
    }

    #[test]
    #[serial]
    fn test_secure_wipe_clears_values_when_journal_is_poisoned() {
        let (_dir, _guard, mut store) = loaded("SECRET=hunter2\nPORT=1\n");
        store.journal.poison_lock();

        let err = store.secure_wipe().unwrap_err();

        assert!(matches!(err, EnvError::MemorySecurity { .. }));
        assert!(store.map.is_empty());
        assert!(!store.is_loaded());
        assert_eq!(store.get_secure("SECRET"), None);
        assert_eq!(store.security_info().file_hashes, 0);
        let log = store.access_log();
        assert_eq!(log[0].operation, Operation::SecureWipe);
        assert!(!log[0].success);
    }

    #[test]
    #[serial]
    fn test_load_secure_async() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".env"), "ASYNC=1\n").unwrap();
        let _guard = CwdGuard::new(dir.path());

        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        let mut store = SecureEnvLoader::new();
        runtime
            .block_on(store.load_secure_async(LoadOptions::new()))
            .unwrap();
        assert_eq!(store.get_secure("ASYNC"), Some(EnvValue::Boolean(true)));
    }

    #[test]
    fn test_security_info_serializes() {
        let info = SecureEnvLoader::new().security_info();
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["env_count"], 0);
        assert!(json["session_id"].is_string());
    }
}
