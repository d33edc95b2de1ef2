//! Per-store session identity.
//!
//! A session is created with its store and replaced only by `secure_wipe`.
//! It is never persisted.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::constants::SESSION_ID_LENGTH;
use crate::integrity::hash_bytes;

/// Identity and access counter for one `SecureEnvLoader` lifetime.
#[derive(Debug, Serialize)]
pub struct SecureSession {
    id: String,
    created_at: DateTime<Utc>,
    #[serde(serialize_with = "serialize_counter")]
    access_count: AtomicU64,
}

fn serialize_counter<S>(counter: &AtomicU64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_u64(counter.load(Ordering::Relaxed))
}

impl Default for SecureSession {
    fn default() -> Self {
        Self::new()
    }
}

impl SecureSession {
    /// Derive a fresh identifier from the clock, the process id and a random
    /// instance id, hashed and truncated.
    pub fn new() -> Self {
        let created_at = Utc::now();
        let seed = format!(
            "{}{}{}",
            created_at.timestamp_nanos_opt().unwrap_or_default(),
            std::process::id(),
            uuid::Uuid::new_v4()
        );
        let mut id = hash_bytes(seed.as_bytes());
        id.truncate(SESSION_ID_LENGTH);

        Self {
            id,
            created_at,
            access_count: AtomicU64::new(0),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn access_count(&self) -> u64 {
        self.access_count.load(Ordering::Relaxed)
    }

    /// Bump the counter and return the new value as a sequence number.
    pub(crate) fn next_sequence(&self) -> u64 {
        self.access_count.fetch_add(1, Ordering::Relaxed) + 1
    }
}
