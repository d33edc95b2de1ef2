//! Property-based tests for parsing and export.
//!
//! Test coverage:
//! - Non-strict parsing is total over well-formed, marker-free lines
//! - `.env` export re-parses to the same map for values that type back to themselves
//! - Line splitting and quote stripping agree with the `dotenvy` reference parser

use proptest::prelude::*;

use simpleenvs::{
    EnvMap, EnvValue, SecureParser, parse_value, to_env_format, validate_content_batch,
    validate_value_security,
};

/// Strategy for keys accepted by the strict grammar.
fn key_strategy() -> impl Strategy<Value = String> {
    "[A-Z][A-Z0-9_]{0,15}".prop_map(String::from)
}

/// Strategy for raw values free of injection markers and line breaks.
fn raw_value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_.:/@ -]{0,40}".prop_filter("no injection markers", |v| {
        validate_value_security(v).is_ok()
    })
}

/// Strategy for values that parse back to the same variant and payload.
fn stable_value_strategy() -> impl Strategy<Value = EnvValue> {
    let string = "[a-zA-Z][a-zA-Z0-9 _.-]{0,30}[a-zA-Z0-9]"
        .prop_map(String::from)
        .prop_filter("must stay a string", |s| {
            validate_value_security(s).is_ok()
                && parse_value(s) == EnvValue::String(s.clone())
        })
        .prop_map(EnvValue::String);

    prop_oneof![
        any::<bool>().prop_map(EnvValue::Boolean),
        any::<i64>().prop_map(EnvValue::Integer),
        string,
    ]
}

fn env_map_strategy() -> impl Strategy<Value = EnvMap> {
    prop::collection::btree_map(key_strategy(), stable_value_strategy(), 0..20)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Every well-formed pair survives a non-strict parse.
    #[test]
    fn test_non_strict_parse_is_total(
        pairs in prop::collection::vec((key_strategy(), raw_value_strategy()), 1..30)
    ) {
        let content: String = pairs
            .iter()
            .map(|(k, v)| format!("{}={}\n", k, v))
            .collect();
        // A key can complete a marker such as `onload=`.
        prop_assume!(validate_content_batch(&content).is_ok());

        let map = SecureParser::new(false).parse_str(&content);
        prop_assert!(map.is_ok(), "parse failed: {:?}", map.as_ref().err());
        let map = map.unwrap();
        for (key, _) in &pairs {
            prop_assert!(map.contains_key(key), "missing {}", key);
        }
    }

    /// Exported text parses back to the exported map.
    #[test]
    fn test_env_export_roundtrip(map in env_map_strategy()) {
        let text = to_env_format(&map);
        prop_assume!(validate_content_batch(&text).is_ok());
        let reparsed = SecureParser::new(true)
            .parse_str(&text)
            .expect("exported text should parse");
        prop_assert_eq!(reparsed, map);
    }

    /// Quoted and unquoted values split the same way `dotenvy` splits them.
    #[test]
    fn test_agrees_with_dotenvy(
        key in key_strategy(),
        value in "[a-zA-Z0-9_./-]{1,20}( [a-zA-Z0-9_./-]{1,10}){0,3}",
        quoted in any::<bool>(),
    ) {
        prop_assume!(validate_value_security(&value).is_ok());
        let unquoted_ok = !value.contains(' ');
        prop_assume!(quoted || unquoted_ok);

        let line = if quoted {
            format!("{}=\"{}\"\n", key, value)
        } else {
            format!("{}={}\n", key, value)
        };

        prop_assume!(validate_content_batch(&line).is_ok());

        let reference: Vec<(String, String)> = dotenvy::from_read_iter(line.as_bytes())
            .collect::<Result<_, _>>()
            .expect("dotenvy should accept the line");
        prop_assert_eq!(reference.len(), 1);
        let (ref_key, ref_value) = &reference[0];

        let ours = SecureParser::new(false).parse_str(&line).expect("line should parse");
        prop_assert_eq!(ours.get(ref_key), Some(&parse_value(ref_value)));
    }
}
