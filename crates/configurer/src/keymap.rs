//! The case-insensitive key map the binder consults.
//!
//! Decoders produce a [`serde_json::Value`] tree whose keys keep the spelling
//! of the source document. Directive lookups are case-insensitive, so before
//! binding every mapping key in the tree is lowercased.
//!
//! Serde matches names exactly, so before the typed decode
//! [`canonical_entry`] respells each field's key to its serde name. Both views
//! then agree on which spelling a field was read from.

use serde_json as SJSON;

/// Generic decoded mapping.
pub type KeyMap = SJSON::Map<String, SJSON::Value>;

/// Lowercases every key of `map`, recursing through nested mappings and
/// sequences.
///
/// Keys that collide after lowercasing keep the value of the key that sorts
/// last under its original spelling (`Port` loses to `port`).
#[must_use]
pub fn normalize(map: KeyMap) -> KeyMap {
    let mut entries: Vec<(String, SJSON::Value)> = map.into_iter().collect();
    entries.sort_by(|(a, _), (b, _)| a.cmp(b));

    let mut out = KeyMap::new();
    for (key, value) in entries {
        out.insert(key.to_lowercase(), normalize_value(value));
    }
    out
}

/// Normalizes one value of the generic tree.
///
/// Scalars and null are returned unchanged.
#[must_use]
pub fn normalize_value(value: SJSON::Value) -> SJSON::Value {
    match value {
        SJSON::Value::Object(map) => SJSON::Value::Object(normalize(map)),
        SJSON::Value::Array(items) => {
            SJSON::Value::Array(items.into_iter().map(normalize_value).collect())
        }
        other => other,
    }
}

/// Respells the entry of `raw` whose key matches `key` case-insensitively
/// as exactly `key`, and returns it.
///
/// When several spellings match, the one [`normalize`] keeps wins: the key
/// that sorts last. Returns `None` if `raw` is not a mapping or nothing
/// matches.
pub fn canonical_entry<'v>(raw: &'v mut SJSON::Value, key: &str) -> Option<&'v mut SJSON::Value> {
    let SJSON::Value::Object(map) = raw else {
        return None;
    };

    let folded = key.to_lowercase();
    let winner = map
        .keys()
        .filter(|candidate| candidate.to_lowercase() == folded)
        .max()
        .cloned()?;

    if winner != key {
        if let Some(value) = map.remove(&winner) {
            map.insert(key.to_string(), value);
        }
    }

    map.get_mut(key)
}

/// How a field's key appears in the key map.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Presence<'a> {
    /// The key is not in the map.
    Absent,

    /// The key maps to null.
    Null,

    /// The key maps to a zero-length string or sequence.
    Empty(&'a SJSON::Value),

    /// Anything else.
    Value(&'a SJSON::Value),
}

impl<'a> Presence<'a> {
    /// Classifies `key` in `keys`.
    #[must_use]
    pub fn classify(keys: &'a KeyMap, key: &str) -> Self {
        match keys.get(key) {
            None => Self::Absent,
            Some(SJSON::Value::Null) => Self::Null,
            Some(value @ SJSON::Value::String(s)) if s.is_empty() => Self::Empty(value),
            Some(value @ SJSON::Value::Array(items)) if items.is_empty() => Self::Empty(value),
            Some(value) => Self::Value(value),
        }
    }

    /// Returns `true` for [`Presence::Absent`] and [`Presence::Null`].
    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Absent | Self::Null)
    }

    /// Short name of the classification, for logs.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Absent => "absent",
            Self::Null => "null",
            Self::Empty(_) => "empty",
            Self::Value(_) => "value",
        }
    }

    /// The raw value, if the key is present and not null.
    #[must_use]
    pub fn value(&self) -> Option<&'a SJSON::Value> {
        match *self {
            Self::Empty(value) | Self::Value(value) => Some(value),
            Self::Absent | Self::Null => None,
        }
    }
}

/// Human name of a generic value's kind, used in type errors.
#[must_use]
pub fn kind_name(value: &SJSON::Value) -> &'static str {
    match value {
        SJSON::Value::Null => "null",
        SJSON::Value::Bool(_) => "bool",
        SJSON::Value::Number(_) => "number",
        SJSON::Value::String(_) => "string",
        SJSON::Value::Array(_) => "sequence",
        SJSON::Value::Object(_) => "mapping",
    }
}
