//! Typed values and the raw-string value parser.
//!
//! Responsibilities:
//! - Define `EnvValue` and `EnvMap`.
//! - Convert raw strings to typed values with a fixed precedence.
//! - Provide best-effort coercions used by the typed accessors.
//!
//! Invariants:
//! - Boolean detection only uses the explicit `TRUE_VALUES` / `FALSE_VALUES` tables,
//!   so "2" is an integer and never a boolean.
//! - Integers that do not fit in `i64` stay strings; they never wrap and
//!   never fail the parse.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use zeroize::Zeroize;

use crate::constants::{FALSE_VALUES, TRUE_VALUES};
use crate::error::{EnvError, Result};

/// A parsed environment value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnvValue {
    Boolean(bool),
    Integer(i64),
    String(String),
}

/// Parsed key/value pairs, ordered by key.
pub type EnvMap = BTreeMap<String, EnvValue>;

impl fmt::Display for EnvValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvValue::Boolean(b) => write!(f, "{}", b),
            EnvValue::Integer(i) => write!(f, "{}", i),
            EnvValue::String(s) => f.write_str(s),
        }
    }
}

impl From<bool> for EnvValue {
    fn from(value: bool) -> Self {
        EnvValue::Boolean(value)
    }
}

impl From<i64> for EnvValue {
    fn from(value: i64) -> Self {
        EnvValue::Integer(value)
    }
}

impl From<&str> for EnvValue {
    fn from(value: &str) -> Self {
        EnvValue::String(value.to_string())
    }
}

impl From<String> for EnvValue {
    fn from(value: String) -> Self {
        EnvValue::String(value)
    }
}

impl EnvValue {
    /// Short type name used in summaries and CLI output.
    pub fn type_name(&self) -> &'static str {
        match self {
            EnvValue::Boolean(_) => "bool",
            EnvValue::Integer(_) => "int",
            EnvValue::String(_) => "str",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            EnvValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Integer view: stored integers, or strings that parse as `i64`.
    pub fn coerce_int(&self) -> Option<i64> {
        match self {
            EnvValue::Integer(i) => Some(*i),
            EnvValue::String(s) => s.trim().parse().ok(),
            EnvValue::Boolean(_) => None,
        }
    }

    /// Boolean view: stored booleans, or strings in the boolean tables.
    pub fn coerce_bool(&self) -> Option<bool> {
        match self {
            EnvValue::Boolean(b) => Some(*b),
            EnvValue::String(s) => match_bool(s.trim()),
            EnvValue::Integer(_) => None,
        }
    }

    /// Overwrite string contents in place. Non-string variants are reset.
    ///
    /// The refill never exceeds the original length, so the buffer is reused.
    pub(crate) fn overwrite(&mut self, fill: char) {
        match self {
            EnvValue::String(s) => {
                let len = s.chars().count();
                s.clear();
                s.extend(std::iter::repeat_n(fill, len));
            }
            EnvValue::Integer(i) => *i = 0,
            EnvValue::Boolean(b) => *b = false,
        }
    }
}

impl Zeroize for EnvValue {
    fn zeroize(&mut self) {
        match self {
            EnvValue::String(s) => s.zeroize(),
            EnvValue::Integer(i) => i.zeroize(),
            EnvValue::Boolean(b) => b.zeroize(),
        }
    }
}

fn match_bool(value: &str) -> Option<bool> {
    if TRUE_VALUES.iter().any(|t| t.eq_ignore_ascii_case(value)) {
        Some(true)
    } else if FALSE_VALUES.iter().any(|f| f.eq_ignore_ascii_case(value)) {
        Some(false)
    } else {
        None
    }
}

fn is_integer_literal(value: &str) -> bool {
    let digits = value.strip_prefix('-').unwrap_or(value);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Parse a raw value into an `EnvValue`.
///
/// Precedence: boolean tables, integer literal, string. An integer literal
/// outside the `i64` range is kept verbatim as a string; callers that need a
/// number go through the typed accessors, which report `TypeConversion`.
pub fn parse_value(raw: &str) -> EnvValue {
    let value = raw.trim();

    if let Some(b) = match_bool(value) {
        return EnvValue::Boolean(b);
    }

    if is_integer_literal(value) {
        if let Ok(n) = value.parse::<i64>() {
            return EnvValue::Integer(n);
        }
        tracing::debug!(digits = value.len(), "Integer literal out of i64 range, kept as string");
    }

    // Decimal literals ("3.14") have no dedicated variant. They fall through
    // to the textual form so re-export stays lossless.
    EnvValue::String(value.to_string())
}

/// Parse raw bytes, gating on UTF-8 validity first.
///
/// Invalid UTF-8 is an `InvalidInput` error under `strict` and is decoded
/// lossily otherwise.
pub fn parse_value_bytes(raw: &[u8], strict: bool) -> Result<EnvValue> {
    match std::str::from_utf8(raw) {
        Ok(s) => Ok(parse_value(s)),
        Err(_) if strict => Err(EnvError::invalid("Invalid UTF-8 encoding in value")),
        Err(_) => Ok(parse_value(&String::from_utf8_lossy(raw))),
    }
}
