//! The recursive field binder.
//!
//! Binding runs after the typed value has been deserialized. It walks the
//! struct's fields through their static descriptors and, for each one,
//! applies the field's directive against the case-insensitive key map:
//!
//! 1. an `env` override or `default` literal fills a field that is absent or
//!    null in the document (the env value wins);
//! 2. `required` rejects a field that is still absent, null, or an empty
//!    string or sequence;
//! 3. nested structs and sequences of structs are bound recursively against
//!    their own slice of the key map.
//!
//! The first failure aborts the walk.

use serde::de::DeserializeOwned;
use serde_json as SJSON;
use tracing::{debug, trace};

use crate::decoder::Decoder;
use crate::descriptor::FieldDescriptor;
use crate::error::BindError;
use crate::field::{Configure, FieldKind, FieldValue};
use crate::keymap::{self, KeyMap, Presence};
use crate::policy::FieldPolicy;

/// Binds `dest` against `keys`, naming fields and reading literals with
/// `decoder`.
///
/// `keys` must already be normalized (see [`keymap::normalize`]).
///
/// # Errors
///
/// Returns the first [`BindError`] raised anywhere in the struct tree.
pub fn bind<T: Configure>(dest: &mut T, decoder: &dyn Decoder, keys: &KeyMap) -> Result<(), BindError> {
    Binder::new(decoder).bind(dest, keys)
}

/// Binding context threaded through generated code.
#[derive(Clone, Copy)]
pub struct Binder<'a> {
    decoder: &'a dyn Decoder,
}

impl<'a> Binder<'a> {
    /// A binder using `decoder` for field names and literals.
    #[must_use]
    pub fn new(decoder: &'a dyn Decoder) -> Self {
        Self { decoder }
    }

    /// The active decoder.
    #[must_use]
    pub fn decoder(&self) -> &'a dyn Decoder {
        self.decoder
    }

    /// Binds every field of `dest`.
    ///
    /// # Errors
    ///
    /// Returns the first [`BindError`] raised by any field.
    pub fn bind<T: Configure>(&self, dest: &mut T, keys: &KeyMap) -> Result<(), BindError> {
        dest.bind_fields(self, keys)
    }

    /// Applies `field`'s directive to `slot`.
    ///
    /// Called by `#[derive(Configure)]` for every field whose type
    /// implements [`FieldValue`].
    ///
    /// # Errors
    ///
    /// See [`BindError`] for the individual failure modes.
    pub fn bind_field<F: FieldValue>(
        &self,
        field: &'static FieldDescriptor,
        slot: &mut F,
        keys: &KeyMap,
    ) -> Result<(), BindError> {
        if field.flatten {
            Self::policy(field)?;
            return slot.bind_nested(self, keys);
        }

        let presence = self.apply_directive(field, slot, keys, F::kind)?;

        match slot.kind() {
            FieldKind::Struct => {
                let empty = KeyMap::new();
                let sub_keys = match presence.value() {
                    None => &empty,
                    Some(SJSON::Value::Object(map)) => map,
                    Some(other) => {
                        return Err(BindError::Type {
                            field: field.name.to_string(),
                            expected: "mapping",
                            found: keymap::kind_name(other),
                        });
                    }
                };

                slot.bind_nested(self, sub_keys)
                    .map_err(|source| BindError::Nested {
                        field: field.name,
                        source: Box::new(source),
                    })
            }

            FieldKind::Sequence { .. } => slot.bind_elements(self, field, presence.value()),

            FieldKind::String { .. } | FieldKind::Other => Ok(()),
        }
    }

    /// Applies `field`'s directive to a leaf `slot` of any deserializable
    /// type.
    ///
    /// The derive uses this for field types without a [`FieldValue`] impl.
    /// Such a value is never empty and has nothing to recurse into.
    ///
    /// # Errors
    ///
    /// See [`BindError`] for the individual failure modes.
    pub fn bind_leaf<F: DeserializeOwned>(
        &self,
        field: &'static FieldDescriptor,
        slot: &mut F,
        keys: &KeyMap,
    ) -> Result<(), BindError> {
        self.apply_directive(field, slot, keys, |_| FieldKind::Other)
            .map(drop)
    }

    fn policy(field: &'static FieldDescriptor) -> Result<FieldPolicy, BindError> {
        FieldPolicy::parse(field.directive).map_err(|source| BindError::Directive {
            field: field.name,
            source,
        })
    }

    /// Fills `slot` from the env or default when the key is missing, then
    /// runs the required checks. Returns the key's presence for recursion.
    fn apply_directive<'k, F: DeserializeOwned>(
        &self,
        field: &'static FieldDescriptor,
        slot: &mut F,
        keys: &'k KeyMap,
        kind: impl Fn(&F) -> FieldKind,
    ) -> Result<Presence<'k>, BindError> {
        let policy = Self::policy(field)?;

        // A variable that is set but empty counts as unset.
        let env_override = policy.env.as_deref().and_then(|var| {
            std::env::var(var)
                .ok()
                .filter(|value| !value.is_empty())
                .map(|value| (var, value))
        });

        let key = self.decoder.field_name(field).to_lowercase();
        let presence = Presence::classify(keys, &key);

        trace!(
            field = field.name,
            key = %key,
            presence = presence.label(),
            "binding field"
        );

        if kind(slot) == FieldKind::Struct && (policy.default.is_some() || env_override.is_some()) {
            return Err(BindError::StructDefault { field: field.name });
        }

        let mut applied = false;

        if presence.is_missing() {
            if let Some((var, value)) = &env_override {
                *slot = self
                    .decode_literal(value)
                    .map_err(|source| BindError::Env {
                        var: (*var).to_string(),
                        field: field.name,
                        source,
                    })?;
                debug!(field = field.name, var, "applied env override");
                applied = true;
            } else if let Some(default) = &policy.default {
                *slot = self
                    .decode_literal(default)
                    .map_err(|source| BindError::Default {
                        field: field.name,
                        source,
                    })?;
                debug!(field = field.name, default = %default, "applied default");
                applied = true;
            }
        }

        if policy.required {
            match presence {
                Presence::Absent if !applied => {
                    return Err(BindError::NotFound { field: field.name });
                }
                Presence::Null if !applied => return Err(BindError::Nil { field: field.name }),
                _ => {}
            }

            if kind(slot).is_empty() {
                return Err(BindError::Empty { field: field.name });
            }
        }

        Ok(presence)
    }

    /// Decodes a directive literal into `F`.
    ///
    /// The decoder's reading is tried first; if that does not fit and was not
    /// already a string, the raw text is tried as a string.
    fn decode_literal<F: DeserializeOwned>(&self, text: &str) -> Result<F, SJSON::Error> {
        let value = self.decoder.decode_literal(text);
        let was_string = value.is_string();

        match SJSON::from_value(value) {
            Ok(decoded) => Ok(decoded),
            Err(err) if was_string => Err(err),
            Err(err) => SJSON::from_value(SJSON::Value::String(text.to_string())).map_err(|_| err),
        }
    }
}

impl std::fmt::Debug for Binder<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binder")
            .field("format", &self.decoder.format())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::JsonDecoder;
    use crate::descriptor::StructDescriptor;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct Endpoint {
        host: String,
    }

    static ENDPOINT_FIELDS: [FieldDescriptor; 1] =
        [FieldDescriptor::new("host").directive("required")];

    static ENDPOINT: StructDescriptor = StructDescriptor {
        name: "Endpoint",
        fields: &ENDPOINT_FIELDS,
    };

    impl Configure for Endpoint {
        fn descriptor() -> &'static StructDescriptor {
            &ENDPOINT
        }

        fn bind_fields(&mut self, binder: &Binder<'_>, keys: &KeyMap) -> Result<(), BindError> {
            binder.bind_field(&ENDPOINT_FIELDS[0], &mut self.host, keys)
        }
    }

    impl FieldValue for Endpoint {
        fn kind(&self) -> FieldKind {
            FieldKind::Struct
        }

        fn bind_nested(&mut self, binder: &Binder<'_>, keys: &KeyMap) -> Result<(), BindError> {
            binder.bind(self, keys)
        }
    }

    static UPSTREAM: FieldDescriptor = FieldDescriptor::new("upstream");
    static LISTENERS: FieldDescriptor = FieldDescriptor::new("listeners").directive("required");

    static PORT: FieldDescriptor = FieldDescriptor::new("port").directive("required,default=9");
    static NAME: FieldDescriptor = FieldDescriptor::new("name").directive("required");
    static BAD: FieldDescriptor = FieldDescriptor::new("bad").directive("foo=bar=");
    static TAGS: FieldDescriptor = FieldDescriptor::new("tags").directive("required");
    static LABEL: FieldDescriptor = FieldDescriptor::new("label").directive("default=9");

    fn keys(value: SJSON::Value) -> KeyMap {
        match value {
            SJSON::Value::Object(map) => keymap::normalize(map),
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_default_applies_when_absent() {
        let binder = Binder::new(&JsonDecoder);
        let mut port = 0_u16;
        binder.bind_field(&PORT, &mut port, &keys(json!({}))).unwrap();
        assert_eq!(port, 9);
    }

    #[test]
    fn test_default_applies_when_null() {
        let binder = Binder::new(&JsonDecoder);
        let mut port = 0_u16;
        binder
            .bind_field(&PORT, &mut port, &keys(json!({ "port": null })))
            .unwrap();
        assert_eq!(port, 9);
    }

    #[test]
    fn test_present_value_stands() {
        let binder = Binder::new(&JsonDecoder);
        let mut port = 80_u16;
        binder
            .bind_field(&PORT, &mut port, &keys(json!({ "Port": 80 })))
            .unwrap();
        assert_eq!(port, 80);
    }

    #[test]
    fn test_numeric_default_into_string_field() {
        let binder = Binder::new(&JsonDecoder);
        let mut label = String::new();
        binder.bind_field(&LABEL, &mut label, &keys(json!({}))).unwrap();
        assert_eq!(label, "9");
    }

    #[test]
    fn test_required_string_states() {
        let binder = Binder::new(&JsonDecoder);
        let mut name = String::new();

        let err = binder.bind_field(&NAME, &mut name, &keys(json!({}))).unwrap_err();
        assert!(matches!(err, BindError::NotFound { field: "name" }));

        let err = binder
            .bind_field(&NAME, &mut name, &keys(json!({ "name": null })))
            .unwrap_err();
        assert!(matches!(err, BindError::Nil { field: "name" }));

        let err = binder
            .bind_field(&NAME, &mut name, &keys(json!({ "name": "" })))
            .unwrap_err();
        assert!(matches!(err, BindError::Empty { field: "name" }));

        name = "x".to_string();
        binder
            .bind_field(&NAME, &mut name, &keys(json!({ "name": "x" })))
            .unwrap();
    }

    #[test]
    fn test_required_empty_sequence() {
        let binder = Binder::new(&JsonDecoder);
        let mut tags: Vec<String> = Vec::new();
        let err = binder
            .bind_field(&TAGS, &mut tags, &keys(json!({ "tags": [] })))
            .unwrap_err();
        assert!(matches!(err, BindError::Empty { field: "tags" }));
    }

    #[test]
    fn test_malformed_directive() {
        let binder = Binder::new(&JsonDecoder);
        let mut bad = 0_i32;
        let err = binder.bind_field(&BAD, &mut bad, &keys(json!({}))).unwrap_err();
        assert_eq!(
            err.to_string(),
            "mal-formed config directive on field bad: expected EOF or a separator"
        );
    }

    #[test]
    fn test_default_that_does_not_fit() {
        static WRONG: FieldDescriptor = FieldDescriptor::new("flag").directive("default=maybe");
        let binder = Binder::new(&JsonDecoder);
        let mut flag = false;
        let err = binder.bind_field(&WRONG, &mut flag, &keys(json!({}))).unwrap_err();
        assert!(matches!(err, BindError::Default { field: "flag", .. }));
    }

    #[test]
    fn test_decode_literal_retries_as_string() {
        let binder = Binder::new(&JsonDecoder);
        let text: String = binder.decode_literal("true").unwrap();
        assert_eq!(text, "true");
        let flag: bool = binder.decode_literal("true").unwrap();
        assert!(flag);
    }

    #[test]
    fn test_struct_slot_against_scalar() {
        let binder = Binder::new(&JsonDecoder);
        let mut upstream = Endpoint::default();
        let err = binder
            .bind_field(&UPSTREAM, &mut upstream, &keys(json!({ "upstream": 5 })))
            .unwrap_err();

        assert!(matches!(
            &err,
            BindError::Type { field, expected: "mapping", found: "number" } if field == "upstream"
        ));
    }

    #[test]
    fn test_struct_slot_binds_sub_map() {
        let binder = Binder::new(&JsonDecoder);
        let mut upstream = Endpoint::default();
        let err = binder
            .bind_field(&UPSTREAM, &mut upstream, &keys(json!({ "upstream": {} })))
            .unwrap_err();
        assert_eq!(err.path(), "upstream.host");
    }

    #[test]
    fn test_sequence_element_against_scalar() {
        let binder = Binder::new(&JsonDecoder);
        let mut listeners = vec![Endpoint::default()];
        let err = binder
            .bind_field(&LISTENERS, &mut listeners, &keys(json!({ "listeners": [1] })))
            .unwrap_err();

        assert!(matches!(
            &err,
            BindError::Type { field, expected: "mapping", found: "number" } if field == "listeners[0]"
        ));
    }

    #[test]
    fn test_sequence_slot_against_mapping() {
        let binder = Binder::new(&JsonDecoder);
        let mut listeners = vec![Endpoint {
            host: "a".to_string(),
        }];
        let err = binder
            .bind_field(
                &LISTENERS,
                &mut listeners,
                &keys(json!({ "listeners": { "host": "a" } })),
            )
            .unwrap_err();

        assert!(matches!(
            &err,
            BindError::Type { field, expected: "sequence", found: "mapping" } if field == "listeners"
        ));
    }

    #[test]
    fn test_leaf_default_and_required() {
        static PAIR: FieldDescriptor =
            FieldDescriptor::new("pair").directive(r#"required,default=["a"\,1]"#);
        static MISSING: FieldDescriptor = FieldDescriptor::new("pair").directive("required");

        let binder = Binder::new(&JsonDecoder);
        let mut pair: (String, u16) = (String::new(), 0);
        binder.bind_leaf(&PAIR, &mut pair, &keys(json!({}))).unwrap();
        assert_eq!(pair, ("a".to_string(), 1));

        let err = binder
            .bind_leaf(&MISSING, &mut pair, &keys(json!({})))
            .unwrap_err();
        assert!(matches!(err, BindError::NotFound { field: "pair" }));
    }
}
