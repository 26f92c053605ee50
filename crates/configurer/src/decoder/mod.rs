//! Format decoders.
//!
//! A [`Decoder`] turns raw bytes into the generic [`serde_json::Value`] tree
//! and knows how to read directive literals (`default=...`, env values) in
//! its own syntax. It also names fields through [`FieldNamer`].
//!
//! # Built-in Decoders
//!
//! | Decoder | Feature | Extensions |
//! |---------|---------|------------|
//! | [`JsonDecoder`] | always | `json` |
//! | [`TomlDecoder`] | `toml` | `toml` |
//! | [`YamlDecoder`] | `yaml` | `yaml`, `yml` |

mod error;
mod json;

#[cfg(feature = "toml")]
mod toml;

#[cfg(feature = "yaml")]
mod yaml;

use std::borrow::Cow;
use std::sync::Arc;

use serde_json as SJSON;

use crate::descriptor::FieldDescriptor;

pub use error::DecodeError;
pub use json::JsonDecoder;

#[cfg(feature = "toml")]
pub use self::toml::TomlDecoder;

#[cfg(feature = "yaml")]
pub use yaml::YamlDecoder;

/// Resolves the key a field is looked up under.
///
/// The binder lowercases the result, so only the spelling matters, not the
/// case.
pub trait FieldNamer {
    /// The serialized name of `field`.
    ///
    /// The default is the serde-visible name recorded by the derive.
    fn field_name(&self, field: &FieldDescriptor) -> Cow<'static, str> {
        Cow::Borrowed(field.key)
    }
}

/// A document format.
///
/// # Example
///
/// A decoder for a `key=value` line format:
///
/// ```rust
/// use configurer::decoder::{DecodeError, Decoder, FieldNamer};
/// use serde_json::{Map, Value};
///
/// struct Properties;
///
/// impl FieldNamer for Properties {}
///
/// impl Decoder for Properties {
///     fn format(&self) -> &'static str {
///         "properties"
///     }
///
///     fn extensions(&self) -> &'static [&'static str] {
///         &["properties"]
///     }
///
///     fn decode(&self, _origin: &str, bytes: &[u8]) -> Result<Value, DecodeError> {
///         let text = String::from_utf8_lossy(bytes);
///         let map: Map<String, Value> = text
///             .lines()
///             .filter_map(|line| line.split_once('='))
///             .map(|(k, v)| (k.trim().to_string(), Value::String(v.trim().to_string())))
///             .collect();
///         Ok(Value::Object(map))
///     }
///
///     fn decode_literal(&self, text: &str) -> Value {
///         Value::String(text.to_string())
///     }
/// }
/// ```
pub trait Decoder: FieldNamer + Send + Sync {
    /// Human name used in diagnostics, e.g. `"TOML"`.
    fn format(&self) -> &'static str;

    /// URL extensions this decoder claims, without the dot.
    fn extensions(&self) -> &'static [&'static str];

    /// Decodes a whole document.
    ///
    /// `origin` names the document in diagnostics.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] for invalid UTF-8 or syntax errors.
    fn decode(&self, origin: &str, bytes: &[u8]) -> Result<SJSON::Value, DecodeError>;

    /// Decodes a directive literal.
    ///
    /// Text that is not a valid value in this format is returned as a plain
    /// string.
    fn decode_literal(&self, text: &str) -> SJSON::Value;
}

/// All decoders compiled in.
pub(crate) fn builtin() -> Vec<Arc<dyn Decoder>> {
    let mut decoders: Vec<Arc<dyn Decoder>> = vec![Arc::new(JsonDecoder)];

    #[cfg(feature = "toml")]
    decoders.push(Arc::new(TomlDecoder));

    #[cfg(feature = "yaml")]
    decoders.push(Arc::new(YamlDecoder));

    decoders
}
