//! JSON formatter.

use anyhow::Result;
use serde_json::json;
use simpleenvs::EnvValue;

use super::{CheckOutput, EntryRow, Formatter, InfoOutput, RequireOutput, VerifyRow};

/// Pretty-printed JSON formatter.
pub struct JsonFormatter;

fn pretty<T: serde::Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut output = serde_json::to_string_pretty(value)?;
    output.push('\n');
    Ok(output)
}

impl Formatter for JsonFormatter {
    fn format_check(&self, check: &CheckOutput) -> Result<String> {
        pretty(check)
    }

    fn format_value(&self, key: &str, value: &EnvValue) -> Result<String> {
        pretty(&json!({ "key": key, "type": value.type_name(), "value": value }))
    }

    fn format_keys(&self, keys: &[String]) -> Result<String> {
        pretty(keys)
    }

    fn format_entries(&self, entries: &[EntryRow]) -> Result<String> {
        pretty(entries)
    }

    fn format_info(&self, info: &InfoOutput) -> Result<String> {
        pretty(info)
    }

    fn format_verify(&self, rows: &[VerifyRow]) -> Result<String> {
        pretty(rows)
    }

    fn format_scan(&self, path: &str) -> Result<String> {
        pretty(&json!({ "path": path }))
    }

    fn format_require(&self, result: &RequireOutput) -> Result<String> {
        pretty(result)
    }
}
