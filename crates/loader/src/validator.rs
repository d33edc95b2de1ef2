//! Security predicates for paths, keys, values and files.
//!
//! Responsibilities:
//! - Reject path traversal, absolute paths, null bytes and oversized paths.
//! - Enforce strict or relaxed key grammar.
//! - Reject values and whole-file content carrying injection markers.
//! - Check file metadata and produce the `FileDescriptor` for a candidate file.
//!
//! Does NOT handle:
//! - Journaling (callers record outcomes).
//! - Reading file content for parsing (see `parser.rs`).
//!
//! Invariants:
//! - `validate_path` never touches the file system.
//! - Pattern matching is case-insensitive against the lowercase `DANGEROUS_PATTERNS`.
//! - Error messages name the offending pattern, never the value that contained it.
//! - Hostile input is reported as `DangerousContent`; grammar and size
//!   mistakes as `InvalidInput`.

use std::path::Path;

use crate::constants::{
    DANGEROUS_PATTERNS, MAX_FILE_SIZE, MAX_KEY_LENGTH, MAX_PATH_LENGTH, MAX_VALUE_LENGTH,
    PATH_TRAVERSAL_PATTERNS,
};
use crate::error::{EnvError, Result};
use crate::integrity::{FileDescriptor, hash_file};

/// Key grammar applied by `validate_key`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyMode {
    /// `^[A-Za-z][A-Za-z0-9_-]*$`, at most `MAX_KEY_LENGTH` characters.
    Strict,
    /// Anything except `=`, line breaks and null bytes.
    Relaxed,
}

impl KeyMode {
    pub fn from_strict(strict: bool) -> Self {
        if strict { KeyMode::Strict } else { KeyMode::Relaxed }
    }
}

fn has_absolute_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    let drive_letter = bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':';
    path.starts_with('/') || path.starts_with('\\') || drive_letter || Path::new(path).is_absolute()
}

/// Validate a caller-supplied path string before any file-system access.
pub fn validate_path(path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(EnvError::invalid("Empty path"));
    }
    if path.contains('\0') {
        return Err(EnvError::dangerous("Null byte in path"));
    }
    if path.len() > MAX_PATH_LENGTH {
        return Err(EnvError::invalid(format!(
            "Path too long: {} bytes (max: {})",
            path.len(),
            MAX_PATH_LENGTH
        )));
    }

    let lowered = path.to_ascii_lowercase();
    let escapes = PATH_TRAVERSAL_PATTERNS.iter().any(|p| lowered.contains(p))
        || lowered.contains("\\..\\");
    if escapes || has_absolute_prefix(path) {
        tracing::warn!(path = %path, "Rejected path traversal attempt");
        return Err(EnvError::PathTraversal {
            path: path.to_string(),
        });
    }

    Ok(())
}

/// Validate a key under the given grammar.
pub fn validate_key(key: &str, mode: KeyMode) -> Result<()> {
    if key.trim().is_empty() {
        return Err(EnvError::invalid("Empty key"));
    }

    match mode {
        KeyMode::Strict => {
            if key.len() > MAX_KEY_LENGTH {
                return Err(EnvError::invalid(format!(
                    "Key too long: {} chars (max: {})",
                    key.len(),
                    MAX_KEY_LENGTH
                )));
            }
            let mut chars = key.chars();
            let first_ok = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
            let rest_ok = chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
            if !(first_ok && rest_ok) {
                return Err(EnvError::invalid("Key contains invalid characters"));
            }
        }
        KeyMode::Relaxed => {
            if key.contains(['=', '\n', '\r', '\0']) {
                return Err(EnvError::dangerous("Key contains dangerous characters"));
            }
        }
    }

    Ok(())
}

fn find_dangerous_pattern(text: &str) -> Option<&'static str> {
    let lowered = text.to_lowercase();
    DANGEROUS_PATTERNS
        .iter()
        .copied()
        .find(|pattern| lowered.contains(pattern))
}

/// Reject a single value that is oversized or carries an injection marker.
pub fn validate_value_security(value: &str) -> Result<()> {
    if value.len() > MAX_VALUE_LENGTH {
        return Err(EnvError::invalid(format!(
            "Value too long: {} bytes (max: {})",
            value.len(),
            MAX_VALUE_LENGTH
        )));
    }
    if let Some(pattern) = find_dangerous_pattern(value) {
        return Err(EnvError::dangerous(format!(
            "Potentially dangerous pattern: {}",
            pattern
        )));
    }
    Ok(())
}

/// One pass over an entire file's text before any line is parsed.
///
/// Comments are scanned too: a marker anywhere in the file rejects it.
pub fn validate_content_batch(content: &str) -> Result<()> {
    if content.contains('\0') {
        return Err(EnvError::dangerous("Null byte detected in file content"));
    }
    if let Some(pattern) = find_dangerous_pattern(content) {
        return Err(EnvError::dangerous(format!(
            "Dangerous pattern detected: {}",
            pattern
        )));
    }
    Ok(())
}

/// Check that `path` names a non-empty regular file within the size limit
/// and return its descriptor, including the content hash.
pub fn validate_file_metadata(path: &Path) -> Result<FileDescriptor> {
    let metadata = match std::fs::metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(EnvError::FileNotFound(path.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    };

    if !metadata.is_file() {
        return Err(EnvError::invalid("Path is not a file"));
    }
    if std::fs::symlink_metadata(path)?.file_type().is_symlink() {
        return Err(EnvError::dangerous("Symbolic links not allowed"));
    }

    let size = metadata.len();
    if size == 0 {
        return Err(EnvError::invalid("Empty file"));
    }
    if size > MAX_FILE_SIZE {
        return Err(EnvError::FileSize {
            path: path.to_path_buf(),
            size,
            max_size: MAX_FILE_SIZE,
        });
    }

    let content_hash = hash_file(path)?;
    Ok(FileDescriptor::new(path.to_path_buf(), size, content_hash))
}
