use serde_json as SJSON;
use serde_saphyr as YAML;

use super::error::{self, DecodeError, extract_line_col, line_col_to_offset};
use super::{Decoder, FieldNamer};

const HELP: &str = "check indentation and ensure proper YAML syntax";

/// YAML documents (`.yaml`, `.yml`).
///
/// A blank document decodes to an empty mapping.
#[derive(Clone, Copy, Debug, Default)]
pub struct YamlDecoder;

impl FieldNamer for YamlDecoder {}

impl Decoder for YamlDecoder {
    fn format(&self) -> &'static str {
        "YAML"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["yaml", "yml"]
    }

    fn decode(&self, origin: &str, bytes: &[u8]) -> Result<SJSON::Value, DecodeError> {
        let content = error::utf8(self.format(), origin, bytes)?;

        if content.trim().is_empty() {
            return Ok(SJSON::Value::Object(SJSON::Map::new()));
        }

        YAML::from_str(content).map_err(|e| {
            let message = e.to_string();

            match extract_line_col(&message) {
                Some((line, col)) => {
                    let offset = line_col_to_offset(content, line, col);
                    DecodeError::at_offset(self.format(), origin, content, offset, message, HELP)
                }
                None => DecodeError::no_span(self.format(), origin, message, HELP),
            }
        })
    }

    fn decode_literal(&self, text: &str) -> SJSON::Value {
        YAML::from_str(text).unwrap_or_else(|_| SJSON::Value::String(text.to_string()))
    }
}
