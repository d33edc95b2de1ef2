//! Content hashing and the descriptor cache used for tamper detection.
//!
//! Responsibilities:
//! - Stream a file through SHA-256 and render the digest as lowercase hex.
//! - Define the immutable `FileDescriptor` recorded at validation time.
//! - Keep a bounded, insertion-ordered cache of descriptors keyed by path.
//!
//! Does NOT handle:
//! - Deciding whether a mismatch is an error (see `SecureEnvLoader::verify_integrity`).

use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Component, Path, PathBuf};

use crate::constants::{HASH_BUFFER_SIZE, MAX_FILE_HASH_CACHE};
use crate::error::Result;

/// Identity of a validated file: where it was, how large, and what it hashed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileDescriptor {
    path: PathBuf,
    size: u64,
    content_hash: String,
}

impl FileDescriptor {
    pub(crate) fn new(path: PathBuf, size: u64, content_hash: String) -> Self {
        Self {
            path,
            size,
            content_hash,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn content_hash(&self) -> &str {
        &self.content_hash
    }
}

/// SHA-256 of `path`, read in `HASH_BUFFER_SIZE` chunks.
pub fn hash_file(path: &Path) -> Result<String> {
    let mut reader = BufReader::with_capacity(HASH_BUFFER_SIZE, File::open(path)?);
    let mut hasher = Sha256::new();
    let mut buf = [0u8; HASH_BUFFER_SIZE];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// SHA-256 of an in-memory buffer.
pub fn hash_bytes(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Cache key for `path`: `./.env` and `.env` name the same file.
fn cache_key(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// Bounded descriptor cache. Re-inserting a path replaces its entry and
/// moves it to the back; the oldest entry is evicted past capacity.
#[derive(Debug, Default)]
pub(crate) struct HashCache {
    entries: VecDeque<(PathBuf, FileDescriptor)>,
}

impl HashCache {
    pub(crate) fn insert(&mut self, descriptor: FileDescriptor) {
        let key = cache_key(&descriptor.path);
        self.entries.retain(|(k, _)| *k != key);
        self.entries.push_back((key, descriptor));
        while self.entries.len() > MAX_FILE_HASH_CACHE {
            self.entries.pop_front();
        }
    }

    pub(crate) fn get(&self, path: &Path) -> Option<&FileDescriptor> {
        let key = cache_key(path);
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, d)| d)
    }

    pub(crate) fn descriptors(&self) -> impl Iterator<Item = &FileDescriptor> {
        self.entries.iter().map(|(_, d)| d)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}
