//! Security-gated `.env` file parser.
//!
//! Responsibilities:
//! - Run the full pipeline for one file: path check, metadata check, read,
//!   whole-file batch validation, then per-line key/value validation and typing.
//! - Wrap any failure after the metadata check as `EnvError::FileParsing` with the
//!   path and, when known, the 1-based line number.
//! - Journal every outcome before returning it.
//!
//! Does NOT handle:
//! - Locating the file (see `scanner.rs`).
//! - Publishing the result (see `store.rs`, which swaps it in atomically).
//!
//! Invariants:
//! - Over-long lines are skipped while too many lines fail the whole file.
//! - Only one matching pair of outer quotes is stripped; there is no escape handling.
//! - Non-strict parsing skips lines that fail validation; strict parsing fails the file.

use std::path::{Path, PathBuf};

use crate::constants::{MAX_LINE_LENGTH, MAX_LINES_PER_FILE};
use crate::error::{EnvError, Result};
use crate::integrity::{FileDescriptor, hash_bytes};
use crate::journal::{AccessJournal, Operation};
use crate::validator::{
    KeyMode, validate_content_batch, validate_file_metadata, validate_key, validate_path,
    validate_value_security,
};
use crate::value::{EnvMap, EnvValue, parse_value};

/// Label used as the path for content parsed from memory.
const IN_MEMORY_SOURCE: &str = "<memory>";

/// Outcome of a successful parse: the typed map and the descriptor of the
/// exact bytes it came from.
#[derive(Debug, Clone)]
pub struct ParsedFile {
    map: EnvMap,
    descriptor: FileDescriptor,
}

impl ParsedFile {
    pub fn map(&self) -> &EnvMap {
        &self.map
    }

    pub fn descriptor(&self) -> &FileDescriptor {
        &self.descriptor
    }

    pub fn into_parts(self) -> (EnvMap, FileDescriptor) {
        (self.map, self.descriptor)
    }
}

/// Remove one matching pair of wrapping quotes, if present.
pub fn strip_quotes(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'"' || first == b'\'') {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Split a line into a trimmed key and an unquoted value.
///
/// Returns `None` for blank lines, comments and lines without `=`.
pub(crate) fn split_line(line: &str) -> Option<(&str, &str)> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    let (key, value) = trimmed.split_once('=')?;
    Some((key.trim(), strip_quotes(value.trim())))
}

/// Parser for the secure path.
#[derive(Debug, Clone)]
pub struct SecureParser {
    strict: bool,
    journal: Option<AccessJournal>,
}

impl Default for SecureParser {
    fn default() -> Self {
        Self::new(true)
    }
}

impl SecureParser {
    pub fn new(strict: bool) -> Self {
        Self {
            strict,
            journal: None,
        }
    }

    /// Journal validation and parse outcomes into `journal`.
    pub fn with_journal(mut self, journal: AccessJournal) -> Self {
        self.journal = Some(journal);
        self
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    fn record(&self, operation: Operation, path: &Path, success: bool) {
        if let Some(journal) = &self.journal {
            journal.record(operation, Some(&path.to_string_lossy()), success);
        }
    }

    /// Parse the file at `path`.
    pub fn parse_file(&self, path: &Path) -> Result<ParsedFile> {
        let path_check = path
            .to_str()
            .ok_or_else(|| EnvError::invalid("Path is not valid UTF-8"))
            .and_then(validate_path);
        self.record(Operation::PathValidation, path, path_check.is_ok());
        if let Err(e) = path_check {
            tracing::warn!(path = %path.display(), error = %e, "Path validation failed");
            self.record(Operation::FileParse, path, false);
            return Err(e);
        }

        let descriptor = match validate_file_metadata(path) {
            Ok(d) => d,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "File validation failed");
                self.record(Operation::FileParse, path, false);
                return Err(e);
            }
        };

        match self.read_and_parse(path, &descriptor) {
            Ok(map) => {
                tracing::debug!(
                    path = %path.display(),
                    keys = map.len(),
                    hash = %descriptor.content_hash(),
                    "Parsed env file"
                );
                self.record(Operation::FileParse, path, true);
                Ok(ParsedFile { map, descriptor })
            }
            Err((line, e)) => {
                tracing::warn!(path = %path.display(), line, error = %e, "Env file rejected");
                self.record(Operation::FileParse, path, false);
                Err(e.into_parsing(path, line))
            }
        }
    }

    /// Run batch validation and line parsing over in-memory content.
    pub fn parse_str(&self, content: &str) -> Result<EnvMap> {
        self.parse_content(content)
            .map_err(|(line, e)| e.into_parsing(PathBuf::from(IN_MEMORY_SOURCE), line))
    }

    fn read_and_parse(
        &self,
        path: &Path,
        descriptor: &FileDescriptor,
    ) -> std::result::Result<EnvMap, (Option<usize>, EnvError)> {
        let bytes = std::fs::read(path).map_err(|e| (None, EnvError::from(e)))?;

        // The file may have changed between validation and this read.
        let actual = hash_bytes(&bytes);
        if actual != descriptor.content_hash() {
            return Err((
                None,
                EnvError::Integrity {
                    path: path.to_path_buf(),
                    expected: descriptor.content_hash().to_string(),
                    actual,
                },
            ));
        }

        let content = String::from_utf8(bytes)
            .map_err(|_| (None, EnvError::invalid("Invalid UTF-8 encoding in file")))?;
        self.parse_content(&content)
    }

    fn parse_content(
        &self,
        content: &str,
    ) -> std::result::Result<EnvMap, (Option<usize>, EnvError)> {
        validate_content_batch(content).map_err(|e| (None, e))?;

        let mut map = EnvMap::new();
        for (index, line) in content.lines().enumerate() {
            let line_number = index + 1;
            if line_number > MAX_LINES_PER_FILE {
                return Err((
                    Some(line_number),
                    EnvError::invalid(format!(
                        "Too many lines in file (max: {})",
                        MAX_LINES_PER_FILE
                    )),
                ));
            }
            if line.len() > MAX_LINE_LENGTH {
                tracing::debug!(line = line_number, "Skipping over-long line");
                continue;
            }

            let Some((key, raw)) = split_line(line) else {
                continue;
            };

            match self.parse_pair(key, raw) {
                Ok(value) => {
                    map.insert(key.to_string(), value);
                }
                Err(e) if self.strict => return Err((Some(line_number), e)),
                Err(e) => {
                    tracing::debug!(line = line_number, error = %e, "Skipping invalid line");
                }
            }
        }
        Ok(map)
    }

    fn parse_pair(&self, key: &str, raw: &str) -> Result<EnvValue> {
        validate_key(key, KeyMode::from_strict(self.strict))?;
        validate_value_security(raw)?;
        Ok(parse_value(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_quotes() {
        assert_eq!(strip_quotes("\"hello\""), "hello");
        assert_eq!(strip_quotes("'hello'"), "hello");
        assert_eq!(strip_quotes("\"mismatch'"), "\"mismatch'");
        assert_eq!(strip_quotes("\""), "\"");
        assert_eq!(strip_quotes("\"\""), "");
        assert_eq!(strip_quotes("\"\"nested\"\""), "\"nested\"");
    }

    #[test]
    fn test_escaped_quote_is_not_interpreted() {
        // `"a\"b"` loses only its outer pair; the backslash is kept verbatim.
        assert_eq!(strip_quotes(r#""a\"b""#), r#"a\"b"#);
        let map = SecureParser::new(true).parse_str("K=\"a\\\"b\"\n").unwrap();
        assert_eq!(map["K"], EnvValue::from(r#"a\"b"#));
    }

    #[test]
    fn test_split_line() {
        assert_eq!(split_line("  KEY = value  "), Some(("KEY", "value")));
        assert_eq!(split_line("URL=a=b=c"), Some(("URL", "a=b=c")));
        assert_eq!(split_line("# KEY=value"), None);
        assert_eq!(split_line("   "), None);
        assert_eq!(split_line("NO_EQUALS"), None);
    }

    #[test]
    fn test_parse_str_types_and_last_write_wins() {
        let content = "\
# comment
APP=demo
PORT=8080
DEBUG=yes
RATIO=0.75
PORT=9090
QUOTED='spaced value'
EMPTY=
";
        let map = SecureParser::new(true).parse_str(content).unwrap();
        assert_eq!(map["APP"], EnvValue::from("demo"));
        assert_eq!(map["PORT"], EnvValue::Integer(9090));
        assert_eq!(map["DEBUG"], EnvValue::Boolean(true));
        assert_eq!(map["RATIO"], EnvValue::from("0.75"));
        assert_eq!(map["QUOTED"], EnvValue::from("spaced value"));
        assert_eq!(map["EMPTY"], EnvValue::Boolean(false));
        assert_eq!(map.len(), 6);
    }

    #[test]
    fn test_strict_rejects_bad_key_with_line_number() {
        let err = SecureParser::new(true)
            .parse_str("GOOD=1\n1BAD=2\n")
            .unwrap_err();
        match err {
            EnvError::FileParsing { line, source, .. } => {
                assert_eq!(line, Some(2));
                assert!(matches!(*source, EnvError::InvalidInput(_)));
            }
            other => panic!("expected FileParsing, got {other:?}"),
        }
    }

    #[test]
    fn test_relaxed_skips_bad_lines() {
        let map = SecureParser::new(false)
            .parse_str("GOOD=1\nBAD KEY=2\nHUGE=99999999999999999999\n")
            .unwrap();
        assert_eq!(map["GOOD"], EnvValue::Boolean(true));
        assert_eq!(map["BAD KEY"], EnvValue::Integer(2));
        assert_eq!(map["HUGE"], EnvValue::from("99999999999999999999"));
    }

    #[test]
    fn test_relaxed_skips_oversized_value() {
        let content = format!("A=ok\nB={}\n", "v".repeat(2000));
        let map = SecureParser::new(false).parse_str(&content).unwrap();
        assert_eq!(map.len(), 1);
        assert!(SecureParser::new(true).parse_str(&content).is_err());
    }

    #[test]
    fn test_batch_validation_catches_dangerous_comment() {
        let err = SecureParser::new(false)
            .parse_str("# $(rm -rf /)\nA=1\n")
            .unwrap_err();
        assert!(err.is_security());
        assert!(matches!(
            err,
            EnvError::FileParsing { line: None, .. }
        ));
    }

    #[test]
    fn test_long_line_skipped_but_too_many_lines_fatal() {
        let long = format!("LONG={}\nSHORT=1\n", "x".repeat(MAX_LINE_LENGTH));
        let map = SecureParser::new(true).parse_str(&long).unwrap();
        assert!(!map.contains_key("LONG"));
        assert_eq!(map["SHORT"], EnvValue::Boolean(true));

        let exact = "A=1\n".repeat(MAX_LINES_PER_FILE);
        assert!(SecureParser::new(true).parse_str(&exact).is_ok());

        let over = "A=1\n".repeat(MAX_LINES_PER_FILE + 1);
        match SecureParser::new(true).parse_str(&over).unwrap_err() {
            EnvError::FileParsing { line, .. } => assert_eq!(line, Some(MAX_LINES_PER_FILE + 1)),
            other => panic!("expected FileParsing, got {other:?}"),
        }
    }

    #[test]
    fn test_crlf_line_endings() {
        let map = SecureParser::new(true)
            .parse_str("A=hello\r\nB=2\r\n")
            .unwrap();
        assert_eq!(map["A"], EnvValue::from("hello"));
        assert_eq!(map["B"], EnvValue::Integer(2));
    }
}
