use ::toml as TOML;
use miette::SourceSpan;
use serde_json as SJSON;

use super::error::{self, DecodeError};
use super::{Decoder, FieldNamer};

const HELP: &str = "check for missing quotes, invalid values, or syntax errors";

/// Key the literal is wrapped under so TOML will parse a bare value.
const LITERAL_KEY: &str = "literal";

/// TOML documents (`.toml`).
///
/// Datetimes become strings in their RFC 3339 form.
#[derive(Clone, Copy, Debug, Default)]
pub struct TomlDecoder;

impl FieldNamer for TomlDecoder {}

impl Decoder for TomlDecoder {
    fn format(&self) -> &'static str {
        "TOML"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["toml"]
    }

    fn decode(&self, origin: &str, bytes: &[u8]) -> Result<SJSON::Value, DecodeError> {
        let content = error::utf8(self.format(), origin, bytes)?;

        let table: TOML::Table = TOML::from_str(content).map_err(|e| match e.span() {
            Some(span) => DecodeError::at_span(
                self.format(),
                origin,
                content,
                SourceSpan::new(span.start.into(), span.end.saturating_sub(span.start)),
                e.message(),
                HELP,
            ),
            None => DecodeError::no_span(self.format(), origin, e.to_string(), HELP),
        })?;

        Ok(toml_to_json(TOML::Value::Table(table)))
    }

    fn decode_literal(&self, text: &str) -> SJSON::Value {
        // A line break would let the text add keys of its own.
        if text.contains(['\n', '\r']) {
            return SJSON::Value::String(text.to_string());
        }

        let document = format!("{LITERAL_KEY} = {text}");

        TOML::from_str::<TOML::Table>(&document)
            .ok()
            .and_then(|mut table| table.remove(LITERAL_KEY))
            .map_or_else(|| SJSON::Value::String(text.to_string()), toml_to_json)
    }
}

/// Converts a TOML value into the generic tree.
fn toml_to_json(toml: TOML::Value) -> SJSON::Value {
    match toml {
        TOML::Value::String(s) => SJSON::Value::String(s),

        TOML::Value::Integer(i) => SJSON::Value::Number(i.into()),

        // NaN and infinities have no JSON form.
        TOML::Value::Float(f) => {
            SJSON::Number::from_f64(f).map_or(SJSON::Value::Null, SJSON::Value::Number)
        }

        TOML::Value::Boolean(b) => SJSON::Value::Bool(b),

        TOML::Value::Datetime(dt) => SJSON::Value::String(dt.to_string()),

        TOML::Value::Array(arr) => {
            SJSON::Value::Array(arr.into_iter().map(toml_to_json).collect())
        }

        TOML::Value::Table(table) => SJSON::Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}
