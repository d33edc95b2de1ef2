//! Bounded, append-only access journal.
//!
//! Responsibilities:
//! - Record one entry per store operation, stamped with the session id and a
//!   monotonically increasing sequence number.
//! - Evict the oldest entries past `MAX_ACCESS_LOG_ENTRIES`.
//!
//! Does NOT handle:
//! - Persisting entries anywhere; the journal lives and dies with its store.
//!
//! Invariants:
//! - Appends are serialized by a mutex so concurrent readers of one store can
//!   all journal safely.
//! - A poisoned lock is recovered on append; only `clear` reports it.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use crate::constants::MAX_ACCESS_LOG_ENTRIES;
use crate::error::{EnvError, Result};
use crate::session::SecureSession;

/// Journaled operation kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    PathValidation,
    DirectoryScan,
    FileParse,
    LoadComplete,
    LoadFailed,
    Get,
    GetDefault,
    GetKeys,
    GetAll,
    IntegrityCheck,
    SecureWipe,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::PathValidation => "path_validation",
            Operation::DirectoryScan => "directory_scan",
            Operation::FileParse => "file_parse",
            Operation::LoadComplete => "load_complete",
            Operation::LoadFailed => "load_failed",
            Operation::Get => "get",
            Operation::GetDefault => "get_default",
            Operation::GetKeys => "get_keys",
            Operation::GetAll => "get_all",
            Operation::IntegrityCheck => "integrity_check",
            Operation::SecureWipe => "secure_wipe",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single journal record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessLogEntry {
    pub timestamp: DateTime<Utc>,
    pub session_id: String,
    pub operation: Operation,
    pub key: Option<String>,
    pub success: bool,
    pub sequence: u64,
}

struct JournalInner {
    session: SecureSession,
    entries: Mutex<VecDeque<AccessLogEntry>>,
}

/// Shared handle to a session's journal. Clones append to the same buffer.
#[derive(Clone)]
pub struct AccessJournal {
    inner: Arc<JournalInner>,
}

impl fmt::Debug for AccessJournal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessJournal")
            .field("session_id", &self.inner.session.id())
            .field("len", &self.len())
            .finish()
    }
}

impl Default for AccessJournal {
    fn default() -> Self {
        Self::new()
    }
}

impl AccessJournal {
    /// Start a journal bound to a fresh session.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(JournalInner {
                session: SecureSession::new(),
                entries: Mutex::new(VecDeque::with_capacity(MAX_ACCESS_LOG_ENTRIES)),
            }),
        }
    }

    pub fn session(&self) -> &SecureSession {
        &self.inner.session
    }

    /// Append an entry, bumping the session access counter.
    pub fn record(&self, operation: Operation, key: Option<&str>, success: bool) {
        let mut entries = self
            .inner
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        // Sequence is taken under the lock so buffer order matches it.
        let entry = AccessLogEntry {
            timestamp: Utc::now(),
            session_id: self.inner.session.id().to_string(),
            operation,
            key: key.map(str::to_string),
            success,
            sequence: self.inner.session.next_sequence(),
        };
        tracing::trace!(
            operation = %operation,
            success,
            sequence = entry.sequence,
            "journal append"
        );

        entries.push_back(entry);
        while entries.len() > MAX_ACCESS_LOG_ENTRIES {
            entries.pop_front();
        }
    }

    /// Copy of the current entries, oldest first.
    pub fn entries(&self) -> Vec<AccessLogEntry> {
        self.inner
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry. Fails if a writer panicked while holding the lock.
    pub(crate) fn clear(&self) -> Result<()> {
        let mut entries = self
            .inner
            .entries
            .lock()
            .map_err(|_| EnvError::MemorySecurity {
                operation: "secure_wipe".to_string(),
                reason: "journal lock poisoned".to_string(),
            })?;
        for entry in entries.iter_mut() {
            if let Some(key) = entry.key.as_mut() {
                zeroize::Zeroize::zeroize(key);
            }
        }
        entries.clear();
        Ok(())
    }

    /// Poison the entry lock by panicking while holding it.
    #[cfg(test)]
    pub(crate) fn poison_lock(&self) {
        let journal = self.clone();
        let _ = std::thread::spawn(move || {
            let _held = journal.inner.entries.lock();
            panic!("journal writer panicked");
        })
        .join();
    }
}
