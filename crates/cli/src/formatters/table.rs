//! Human-readable table formatter.

use anyhow::Result;
use simpleenvs::EnvValue;

use super::{CheckOutput, EntryRow, Formatter, InfoOutput, RequireOutput, VerifyRow};

/// Plain-text formatter with aligned columns.
pub struct TableFormatter;

impl Formatter for TableFormatter {
    fn format_check(&self, check: &CheckOutput) -> Result<String> {
        let mode = if check.strict { "strict" } else { "relaxed" };
        Ok(format!(
            "File:   {}\nKeys:   {}\nSize:   {} bytes\nSHA256: {}\nMode:   {}\n",
            check.path, check.keys, check.size, check.content_hash, mode
        ))
    }

    fn format_value(&self, _key: &str, value: &EnvValue) -> Result<String> {
        Ok(format!("{}\n", value))
    }

    fn format_keys(&self, keys: &[String]) -> Result<String> {
        if keys.is_empty() {
            return Ok("No keys loaded.\n".to_string());
        }
        Ok(keys.iter().map(|k| format!("{}\n", k)).collect())
    }

    fn format_entries(&self, entries: &[EntryRow]) -> Result<String> {
        if entries.is_empty() {
            return Ok("No keys loaded.\n".to_string());
        }
        let width = entries
            .iter()
            .map(|e| e.key.len())
            .max()
            .unwrap_or(0)
            .max("KEY".len());

        let mut output = format!("{:<width$}  {:<4}  VALUE\n", "KEY", "TYPE", width = width);
        for entry in entries {
            output.push_str(&format!(
                "{:<width$}  {:<4}  {}\n",
                entry.key,
                entry.type_name,
                entry.value,
                width = width
            ));
        }
        Ok(output)
    }

    fn format_info(&self, info: &InfoOutput) -> Result<String> {
        let security = &info.security;
        let mut output = format!(
            "Session ID:    {}\nCreated:       {}\nAccess count:  {}\nVariables:     {}\nTracked files: {}\nLog entries:   {}\n",
            security.session_id,
            security.creation_time.to_rfc3339(),
            security.access_count,
            security.env_count,
            security.file_hashes,
            security.log_entries
        );
        for file in &info.files {
            output.push_str(&format!(
                "  {}  {}  {} bytes\n",
                file.content_hash(),
                file.path().display(),
                file.size()
            ));
        }
        Ok(output)
    }

    fn format_verify(&self, rows: &[VerifyRow]) -> Result<String> {
        if rows.is_empty() {
            return Ok("No files tracked.\n".to_string());
        }
        Ok(rows
            .iter()
            .map(|row| {
                let status = if row.verified { "OK" } else { "FAILED" };
                format!("{}: {}\n", row.path, status)
            })
            .collect())
    }

    fn format_scan(&self, path: &str) -> Result<String> {
        Ok(format!("{}\n", path))
    }

    fn format_require(&self, result: &RequireOutput) -> Result<String> {
        if result.missing.is_empty() {
            return Ok(format!(
                "All {} required keys present.\n",
                result.required.len()
            ));
        }
        Ok(result
            .missing
            .iter()
            .map(|k| format!("missing: {}\n", k))
            .collect())
    }
}
