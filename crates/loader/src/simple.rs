//! Convenience loader that also exports values to the process environment.
//!
//! Responsibilities:
//! - Locate and parse a `.env` file leniently: relaxed keys, malformed lines
//!   skipped, no content security gate.
//! - Copy every parsed entry into the process environment as text.
//! - Offer typed accessors over the locally held map.
//!
//! Does NOT handle:
//! - Journaling, integrity tracking or wiping (see `store.rs`).
//!
//! Invariants:
//! - Accessors fail with `EnvError::EnvNotLoaded` until a load has produced at
//!   least one entry.
//! - `clear` only forgets the local map; exported variables stay set.

use std::path::Path;

use crate::constants::{MAX_FILE_SIZE, MAX_LINE_LENGTH, MAX_SCAN_DEPTH};
use crate::error::{EnvError, Result};
use crate::parser::split_line;
use crate::scanner::DirectoryScanner;
use crate::validator::{KeyMode, validate_key};
use crate::value::{EnvMap, EnvValue, parse_value};

/// Parse `.env` text the lenient way. Never fails; bad lines are dropped.
pub fn parse_relaxed(content: &str) -> EnvMap {
    let mut map = EnvMap::new();
    for line in content.lines() {
        if line.len() > MAX_LINE_LENGTH {
            continue;
        }
        let Some((key, raw)) = split_line(line) else {
            continue;
        };
        if validate_key(key, KeyMode::Relaxed).is_err() {
            continue;
        }
        // The process environment cannot hold NUL bytes.
        if raw.contains('\0') {
            tracing::debug!(key = %key, "Skipping value with NUL byte");
            continue;
        }
        map.insert(key.to_string(), parse_value(raw));
    }
    map
}

fn read_env_file(path: &Path) -> Result<EnvMap> {
    let metadata = std::fs::metadata(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => EnvError::FileNotFound(path.to_path_buf()),
        _ => EnvError::from(e),
    })?;
    if metadata.len() > MAX_FILE_SIZE {
        return Err(EnvError::FileSize {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size: MAX_FILE_SIZE,
        });
    }

    let bytes = std::fs::read(path).map_err(|e| EnvError::from(e).into_parsing(path, None))?;
    let content = String::from_utf8_lossy(&bytes);
    Ok(parse_relaxed(&content))
}

/// Loader for applications that read configuration through `std::env`.
#[derive(Debug, Default)]
pub struct SimpleEnvLoader {
    map: EnvMap,
}

impl SimpleEnvLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `path`, or the first `.env` found under the working directory
    /// within `max_depth` levels, and export it to the process environment.
    pub fn load(&mut self, path: Option<&Path>, max_depth: usize) -> Result<()> {
        if max_depth > MAX_SCAN_DEPTH {
            return Err(EnvError::invalid(format!(
                "max_depth must be between 0 and {} (got {})",
                MAX_SCAN_DEPTH, max_depth
            )));
        }

        let source = match path {
            Some(path) => {
                if !path.exists() {
                    return Err(EnvError::FileNotFound(path.to_path_buf()));
                }
                path.to_path_buf()
            }
            None => DirectoryScanner::new(max_depth)
                .scan(Path::new("."))?
                .ok_or_else(|| EnvError::FileNotFound(".".into()))?,
        };

        let map = read_env_file(&source)?;
        for (key, value) in &map {
            // SAFETY: keys passed relaxed validation, so they are non-empty and
            // free of '=' and NUL; values with NUL were dropped while parsing. Callers are expected to load before spawning
            // threads that read the environment.
            unsafe {
                std::env::set_var(key, value.to_string());
            }
        }
        tracing::debug!(path = %source.display(), keys = map.len(), "Exported env file");
        self.map = map;
        Ok(())
    }

    fn loaded(&self, operation: &str) -> Result<&EnvMap> {
        if self.map.is_empty() {
            return Err(EnvError::EnvNotLoaded {
                operation: operation.to_string(),
            });
        }
        Ok(&self.map)
    }

    pub fn get(&self, key: &str) -> Result<Option<EnvValue>> {
        Ok(self.loaded("get")?.get(key).cloned())
    }

    pub fn get_with_default(&self, key: &str, default: EnvValue) -> Result<EnvValue> {
        Ok(self
            .loaded("get_with_default")?
            .get(key)
            .cloned()
            .unwrap_or(default))
    }

    /// Integer view of `key`. A stored value that is not an integer is an error.
    pub fn get_int(&self, key: &str, default: Option<i64>) -> Result<Option<i64>> {
        match self.loaded("get_int")?.get(key) {
            None => Ok(default),
            Some(value) => value
                .coerce_int()
                .map(Some)
                .ok_or_else(|| EnvError::TypeConversion {
                    key: key.to_string(),
                    target: "integer",
                }),
        }
    }

    /// Boolean view of `key`. A stored value outside the boolean tables is an error.
    pub fn get_bool(&self, key: &str, default: Option<bool>) -> Result<Option<bool>> {
        match self.loaded("get_bool")?.get(key) {
            None => Ok(default),
            Some(value) => value
                .coerce_bool()
                .map(Some)
                .ok_or_else(|| EnvError::TypeConversion {
                    key: key.to_string(),
                    target: "boolean",
                }),
        }
    }

    pub fn get_str(&self, key: &str, default: Option<&str>) -> Result<Option<String>> {
        Ok(self
            .loaded("get_str")?
            .get(key)
            .map(|v| v.to_string())
            .or_else(|| default.map(str::to_string)))
    }

    pub fn get_all(&self) -> Result<EnvMap> {
        Ok(self.loaded("get_all")?.clone())
    }

    pub fn keys(&self) -> Result<Vec<String>> {
        Ok(self.loaded("keys")?.keys().cloned().collect())
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }

    pub fn is_loaded(&self) -> bool {
        !self.map.is_empty()
    }
}
