//! Dual-mode `.env` loading.
//!
//! [`SimpleEnvLoader`] parses leniently and exports values to the process
//! environment. [`SecureEnvLoader`] validates paths, keys, values and whole-file
//! content, keeps the typed result private to the handle, journals every
//! access and can detect later tampering with the loaded file.

pub mod constants;
pub mod error;
pub mod export;
pub mod integrity;
pub mod journal;
pub mod options;
pub mod parser;
pub mod scanner;
pub mod session;
pub mod simple;
pub mod store;
pub mod validator;
pub mod value;

pub use error::{EnvError, Result};
pub use export::{EnvSummary, missing_keys, summarize, to_env_format, to_shell_format};
pub use integrity::{FileDescriptor, hash_bytes, hash_file};
pub use journal::{AccessJournal, AccessLogEntry, Operation};
pub use options::LoadOptions;
pub use parser::{ParsedFile, SecureParser, strip_quotes};
pub use scanner::{DirectoryScanner, scan};
pub use session::SecureSession;
pub use simple::{SimpleEnvLoader, parse_relaxed};
pub use store::{SecureEnvLoader, SecurityInfo};
pub use validator::{
    KeyMode, validate_content_batch, validate_file_metadata, validate_key, validate_path,
    validate_value_security,
};
pub use value::{EnvMap, EnvValue, parse_value, parse_value_bytes};
