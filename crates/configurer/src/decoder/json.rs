use serde_json as SJSON;

use super::error::{self, DecodeError, line_col_to_offset};
use super::{Decoder, FieldNamer};

const HELP: &str = "check for missing commas, quotes, or brackets";

/// JSON documents (`.json`).
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonDecoder;

impl FieldNamer for JsonDecoder {}

impl Decoder for JsonDecoder {
    fn format(&self) -> &'static str {
        "JSON"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["json"]
    }

    fn decode(&self, origin: &str, bytes: &[u8]) -> Result<SJSON::Value, DecodeError> {
        let content = error::utf8(self.format(), origin, bytes)?;

        SJSON::from_str(content).map_err(|e| {
            if e.line() == 0 {
                return DecodeError::no_span(self.format(), origin, e.to_string(), HELP);
            }

            let offset = line_col_to_offset(content, e.line(), e.column());
            DecodeError::at_offset(self.format(), origin, content, offset, e.to_string(), HELP)
        })
    }

    fn decode_literal(&self, text: &str) -> SJSON::Value {
        SJSON::from_str(text).unwrap_or_else(|_| SJSON::Value::String(text.to_string()))
    }
}
