//! Property-based tests for configurer invariants.
//!
//! These tests verify that critical invariants hold for all possible inputs,
//! not just hand-picked test cases.

#![allow(clippy::pedantic)]

use proptest::prelude::*;

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for chr in text.chars() {
        if matches!(chr, '\\' | '=' | ',') {
            out.push('\\');
        }
        out.push(chr);
    }
    out
}

fn pairs_strategy() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec((".{1,8}", ".{0,8}"), 0..6)
}

// ============================================================================
// Directive Properties
// ============================================================================

mod directive_properties {
    use super::*;
    use configurer::directive::{self, Directive};

    proptest! {
        /// Parsing never panics on any input
        #[test]
        fn parse_never_panics(s in ".*") {
            let _ = Directive::parse(&s);
        }

        /// Escaped pairs parse back to the same pairs
        #[test]
        fn escaped_pairs_roundtrip(pairs in pairs_strategy()) {
            let text = pairs
                .iter()
                .map(|(label, value)| {
                    if value.is_empty() {
                        escape(label)
                    } else {
                        format!("{}={}", escape(label), escape(value))
                    }
                })
                .collect::<Vec<_>>()
                .join(",");

            let parsed = Directive::parse(&text).unwrap();
            prop_assert_eq!(parsed.pairs(), pairs.as_slice());
        }

        /// Display output is itself a valid directive with the same pairs
        #[test]
        fn display_roundtrip(s in ".*") {
            if let Ok(parsed) = Directive::parse(&s) {
                let again = Directive::parse(&parsed.to_string()).unwrap();
                prop_assert_eq!(again, parsed);
            }
        }

        /// Label order does not change the folded mapping of distinct labels
        #[test]
        fn order_independent(a in "[a-z]{1,6}", b in "[A-Z]{1,6}", v in "[0-9]{1,4}") {
            let forward = directive::parse(&format!("{a},{b}={v}")).unwrap();
            let backward = directive::parse(&format!("{b}={v},{a}")).unwrap();
            prop_assert_eq!(forward, backward);
        }

        /// The last duplicate wins
        #[test]
        fn last_duplicate_wins(first in "[a-z]{1,4}", second in "[a-z]{1,4}") {
            let parsed = Directive::parse(&format!("env={first},env={second}")).unwrap();
            prop_assert_eq!(parsed.get("env"), Some(second.as_str()));
        }
    }
}

// ============================================================================
// Key Map Properties
// ============================================================================

mod keymap_properties {
    use super::*;
    use configurer::keymap;
    use serde_json::{Map, Value};

    proptest! {
        /// Every key is lowercase after normalization, at every depth
        #[test]
        fn keys_are_lowercase(keys in prop::collection::vec("[a-zA-Z_]{1,8}", 0..8)) {
            let inner: Map<String, Value> = keys
                .iter()
                .map(|k| (k.clone(), Value::Bool(true)))
                .collect();
            let outer: Map<String, Value> = keys
                .iter()
                .map(|k| (k.clone(), Value::Object(inner.clone())))
                .collect();

            let normalized = keymap::normalize(outer);
            for (key, value) in &normalized {
                prop_assert_eq!(key, &key.to_lowercase());
                if let Value::Object(map) = value {
                    for key in map.keys() {
                        prop_assert_eq!(key, &key.to_lowercase());
                    }
                }
            }
        }

        /// Normalization never grows the map
        #[test]
        fn never_grows(keys in prop::collection::vec("[a-zA-Z]{1,4}", 0..12)) {
            let map: Map<String, Value> = keys
                .iter()
                .map(|k| (k.clone(), Value::Null))
                .collect();
            let before = map.len();
            prop_assert!(keymap::normalize(map).len() <= before);
        }

        /// The respelled entry is the one the normalized lookup sees
        #[test]
        fn canonical_entry_matches_lookup(
            spellings in prop::collection::vec("[pP][oO][rR][tT]", 1..6),
            key in "[pP][oO][rR][tT]",
        ) {
            let map: Map<String, Value> = spellings
                .iter()
                .enumerate()
                .map(|(i, k)| (k.clone(), Value::from(i)))
                .collect();

            let normalized = keymap::normalize(map.clone());
            let mut raw = Value::Object(map);
            let entry = keymap::canonical_entry(&mut raw, &key).cloned();

            prop_assert_eq!(entry.as_ref(), normalized.get("port"));
        }
    }
}

// ============================================================================
// Policy Properties
// ============================================================================

mod policy_properties {
    use super::*;
    use configurer::policy::FieldPolicy;

    proptest! {
        /// Any escaped default value is recovered exactly
        #[test]
        fn default_value_recovered(value in ".{1,16}") {
            let policy = FieldPolicy::parse(&format!("required,default={}", escape(&value))).unwrap();
            prop_assert!(policy.required);
            prop_assert_eq!(policy.default.as_deref(), Some(value.as_str()));
        }
    }
}
