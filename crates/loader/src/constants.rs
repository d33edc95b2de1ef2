//! Centralized limits and value tables for the loader.
//!
//! Every bound enforced by the validator, scanner, parser and store lives here
//! so the security envelope can be read in one place.

// =============================================================================
// Input Size Limits
// =============================================================================

/// Maximum length of a key in strict validation mode.
pub const MAX_KEY_LENGTH: usize = 128;

/// Maximum length of a single value after quote stripping.
pub const MAX_VALUE_LENGTH: usize = 1024;

/// Lines longer than this (in bytes) are skipped, not rejected.
pub const MAX_LINE_LENGTH: usize = 4096;

/// Files with more lines than this are rejected outright.
pub const MAX_LINES_PER_FILE: usize = 10_000;

/// Maximum accepted file size (10 MiB).
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Maximum accepted path length.
pub const MAX_PATH_LENGTH: usize = 1024;

// =============================================================================
// Directory Scanning
// =============================================================================

/// File name the scanner looks for at each level.
pub const ENV_FILE_NAME: &str = ".env";

/// Directories listing more entries than this abort the scan.
pub const MAX_ENTRIES_PER_DIRECTORY: usize = 10_000;

/// Hard ceiling on scan depth regardless of the requested value.
pub const MAX_SCAN_DEPTH: usize = 3;

/// Default scan depth for `LoadOptions`.
pub const DEFAULT_MAX_DEPTH: usize = 2;

// =============================================================================
// Store & Journal
// =============================================================================

/// Journal ring-buffer capacity.
pub const MAX_ACCESS_LOG_ENTRIES: usize = 100;

/// Maximum number of file descriptors kept for integrity re-checks.
pub const MAX_FILE_HASH_CACHE: usize = 50;

/// Chunk size used when streaming a file through the hasher.
pub const HASH_BUFFER_SIZE: usize = 4096;

/// Number of overwrite passes performed by `secure_wipe`.
pub const WIPE_PASSES: usize = 3;

/// Length of the hex session identifier.
pub const SESSION_ID_LENGTH: usize = 16;

// =============================================================================
// Value Tables
// =============================================================================

/// Case-insensitive spellings that parse as `true`.
pub const TRUE_VALUES: &[&str] = &[
    "true", "yes", "1", "on", "enable", "enabled", "active", "ok", "y", "t",
];

/// Case-insensitive spellings that parse as `false`. The empty string is included.
pub const FALSE_VALUES: &[&str] = &[
    "false", "no", "0", "off", "disable", "disabled", "inactive", "n", "f", "null", "none", "",
];

/// Substrings rejected in values and in whole-file batch validation.
///
/// Stored lowercase; callers compare against a lowercased haystack.
pub const DANGEROUS_PATTERNS: &[&str] = &[
    "$(",
    "`",
    "${",
    "<!--",
    "<script",
    "</script>",
    "<iframe",
    "javascript:",
    "data:",
    "vbscript:",
    "onload=",
    "onerror=",
    "eval(",
    "exec(",
    "__import__",
    "subprocess",
    "os.system",
    "shell=true",
];

/// Literal and percent-encoded directory escape sequences.
pub const PATH_TRAVERSAL_PATTERNS: &[&str] = &[
    "..",
    "/./",
    "%2e%2e",
    "%252e%252e",
    "..%2f",
    "..%5c",
    "..%255c",
    "..%c0%af",
];

// =============================================================================
// Configuration Variables
// =============================================================================

/// Overrides `LoadOptions::path`.
pub const ENV_PATH_VAR: &str = "SIMPLEENVS_PATH";

/// Overrides `LoadOptions::max_depth`.
pub const ENV_MAX_DEPTH_VAR: &str = "SIMPLEENVS_MAX_DEPTH";

/// Overrides `LoadOptions::strict_validation`.
pub const ENV_STRICT_VAR: &str = "SIMPLEENVS_STRICT";
