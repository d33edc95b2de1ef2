//! Rendering and summarizing loaded maps.

use serde::Serialize;

use crate::value::{EnvMap, EnvValue};

fn needs_quotes(value: &str) -> bool {
    value.contains([' ', '"', '\'', '\t', '#'])
}

/// Render `map` as `.env` text, one `KEY=VALUE` line per entry in key order.
///
/// Strings containing whitespace, quotes or `#` are wrapped in double quotes.
/// Values that do not re-parse to themselves (e.g. a string `"true"`) come
/// back with a different type.
pub fn to_env_format(map: &EnvMap) -> String {
    let mut out = String::new();
    for (key, value) in map {
        out.push_str(key);
        out.push('=');
        match value {
            EnvValue::String(s) if needs_quotes(s) => {
                out.push('"');
                out.push_str(s);
                out.push('"');
            }
            other => out.push_str(&other.to_string()),
        }
        out.push('\n');
    }
    out
}

/// Render `map` as `export KEY=VALUE` lines for POSIX shells.
///
/// With `quote`, values are single-quoted with embedded single quotes escaped.
pub fn to_shell_format(map: &EnvMap, quote: bool) -> String {
    map.iter()
        .map(|(key, value)| {
            let text = value.to_string();
            if quote {
                format!("export {}='{}'\n", key, text.replace('\'', r"'\''"))
            } else {
                format!("export {}={}\n", key, text)
            }
        })
        .collect()
}

/// Shape of a loaded map, without any values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnvSummary {
    pub count: usize,
    pub booleans: usize,
    pub integers: usize,
    pub strings: usize,
    pub keys: Vec<String>,
    pub max_key_length: usize,
    pub max_value_length: usize,
}

pub fn summarize(map: &EnvMap) -> EnvSummary {
    let mut summary = EnvSummary {
        count: map.len(),
        ..EnvSummary::default()
    };
    for (key, value) in map {
        match value {
            EnvValue::Boolean(_) => summary.booleans += 1,
            EnvValue::Integer(_) => summary.integers += 1,
            EnvValue::String(_) => summary.strings += 1,
        }
        summary.keys.push(key.clone());
        summary.max_key_length = summary.max_key_length.max(key.len());
        summary.max_value_length = summary.max_value_length.max(value.to_string().len());
    }
    summary
}

/// Required keys absent from `map`, in the order given.
pub fn missing_keys<S: AsRef<str>>(map: &EnvMap, required: &[S]) -> Vec<String> {
    required
        .iter()
        .map(AsRef::as_ref)
        .filter(|key| !map.contains_key(*key))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> EnvMap {
        let mut map = EnvMap::new();
        map.insert("NAME".into(), EnvValue::from("my app"));
        map.insert("DEBUG".into(), EnvValue::Boolean(false));
        map.insert("PORT".into(), EnvValue::Integer(8080));
        map.insert("HOST".into(), EnvValue::from("localhost"));
        map
    }

    #[test]
    fn test_env_format_sorted_and_quoted() {
        assert_eq!(
            to_env_format(&sample()),
            "DEBUG=false\nHOST=localhost\nNAME=\"my app\"\nPORT=8080\n"
        );
    }

    #[test]
    fn test_shell_format() {
        let mut map = EnvMap::new();
        map.insert("MSG".into(), EnvValue::from("it's"));
        assert_eq!(to_shell_format(&map, true), "export MSG='it'\\''s'\n");
        assert_eq!(to_shell_format(&map, false), "export MSG=it's\n");
    }

    #[test]
    fn test_summarize() {
        let summary = summarize(&sample());
        assert_eq!(summary.count, 4);
        assert_eq!(summary.booleans, 1);
        assert_eq!(summary.integers, 1);
        assert_eq!(summary.strings, 2);
        assert_eq!(summary.keys, vec!["DEBUG", "HOST", "NAME", "PORT"]);
        assert_eq!(summary.max_key_length, 5);
        assert_eq!(summary.max_value_length, "localhost".len());
    }

    #[test]
    fn test_missing_keys() {
        let missing = missing_keys(&sample(), &["PORT", "DB_URL", "HOST", "TOKEN"]);
        assert_eq!(missing, vec!["DB_URL", "TOKEN"]);
        assert!(missing_keys::<&str>(&sample(), &[]).is_empty());
    }
}
