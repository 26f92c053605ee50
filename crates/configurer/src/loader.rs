//! The source and decoder registry.
//!
//! A [`Loader`] maps URL protocols to [`Source`]s and file extensions to
//! [`Decoder`]s. Loading a URL picks both from the URL, reads the document,
//! deserializes it into the destination type and then binds the field
//! directives. Field names match the document case-insensitively in both
//! steps.
//!
//! # Example
//!
//! ```rust,no_run
//! use configurer::{Configure, Loader};
//! use serde::Deserialize;
//!
//! #[derive(Configure, Deserialize, Default)]
//! #[serde(default)]
//! struct Config {
//!     #[config("required,env=APP_HOST")]
//!     host: String,
//!
//!     #[config("default=8080")]
//!     port: u16,
//! }
//!
//! let loader = Loader::with_defaults();
//! let config: Config = loader.load_url("file://config.toml")?;
//! # Ok::<(), configurer::Error>(())
//! ```

use std::collections::HashMap;
use std::fmt::{self, Debug, Formatter};
use std::io::Read;
use std::sync::Arc;

use serde_json as SJSON;
use tracing::debug;

use crate::bind;
use crate::decoder::{self, Decoder};
use crate::error::Error;
use crate::field::Configure;
use crate::keymap::{self, KeyMap};
use crate::source::{self, Source};

const PROTOCOL_SEPARATOR: &str = "://";

/// Origin name for documents loaded from a reader.
const READER_ORIGIN: &str = "<reader>";

/// Origin name for documents loaded from a string.
const STRING_ORIGIN: &str = "<string>";

/// Registry of sources and decoders.
///
/// Every protocol and every extension is owned by exactly one
/// implementation; registering a second one is an error.
#[derive(Clone, Default)]
pub struct Loader {
    sources: HashMap<&'static str, Arc<dyn Source>>,
    decoders: HashMap<&'static str, Arc<dyn Decoder>>,
}

impl Loader {
    /// Creates a loader with nothing registered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a loader with every built-in source and decoder registered.
    ///
    /// Always: `file`, `json`. With features: `http`/`https` (`http`),
    /// `toml` (`toml`), `yaml`/`yml` (`yaml`).
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut loader = Self::new();

        // Built-ins claim disjoint protocols and extensions.
        for source in source::builtin() {
            for &protocol in source.protocols() {
                loader.sources.insert(protocol, Arc::clone(&source));
            }
        }

        for decoder in decoder::builtin() {
            for &extension in decoder.extensions() {
                loader.decoders.insert(extension, Arc::clone(&decoder));
            }
        }

        loader
    }

    /// Registers `source` for each of its protocols.
    ///
    /// Nothing is registered if any protocol is already taken.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateSource`] naming the first taken protocol.
    #[allow(clippy::result_large_err)]
    pub fn register_source<S: Source + 'static>(&mut self, source: S) -> Result<(), Error> {
        self.register_shared_source(Arc::new(source))
    }

    /// Registers an already shared source.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateSource`] naming the first taken protocol.
    #[allow(clippy::result_large_err)]
    pub fn register_shared_source(&mut self, source: Arc<dyn Source>) -> Result<(), Error> {
        if let Some(protocol) = source
            .protocols()
            .iter()
            .copied()
            .find(|protocol| self.sources.contains_key(protocol))
        {
            return Err(Error::DuplicateSource { protocol });
        }

        for &protocol in source.protocols() {
            self.sources.insert(protocol, Arc::clone(&source));
        }

        Ok(())
    }

    /// Registers `decoder` for each of its extensions.
    ///
    /// Nothing is registered if any extension is already taken.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateDecoder`] naming the first taken extension.
    #[allow(clippy::result_large_err)]
    pub fn register_decoder<D: Decoder + 'static>(&mut self, decoder: D) -> Result<(), Error> {
        self.register_shared_decoder(Arc::new(decoder))
    }

    /// Registers an already shared decoder.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateDecoder`] naming the first taken extension.
    #[allow(clippy::result_large_err)]
    pub fn register_shared_decoder(&mut self, decoder: Arc<dyn Decoder>) -> Result<(), Error> {
        if let Some(extension) = decoder
            .extensions()
            .iter()
            .copied()
            .find(|extension| self.decoders.contains_key(extension))
        {
            return Err(Error::DuplicateDecoder { extension });
        }

        for &extension in decoder.extensions() {
            self.decoders.insert(extension, Arc::clone(&decoder));
        }

        Ok(())
    }

    /// Builder form of [`register_source`](Self::register_source).
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateSource`] if a protocol is already taken.
    #[allow(clippy::result_large_err)]
    pub fn with_source<S: Source + 'static>(mut self, source: S) -> Result<Self, Error> {
        self.register_source(source)?;
        Ok(self)
    }

    /// Builder form of [`register_decoder`](Self::register_decoder).
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateDecoder`] if an extension is already taken.
    #[allow(clippy::result_large_err)]
    pub fn with_decoder<D: Decoder + 'static>(mut self, decoder: D) -> Result<Self, Error> {
        self.register_decoder(decoder)?;
        Ok(self)
    }

    /// The source registered for `protocol`.
    #[must_use]
    pub fn source(&self, protocol: &str) -> Option<&Arc<dyn Source>> {
        self.sources.get(protocol)
    }

    /// The decoder registered for `extension`.
    #[must_use]
    pub fn decoder(&self, extension: &str) -> Option<&Arc<dyn Decoder>> {
        self.decoders.get(extension)
    }

    /// Loads the document at `url`.
    ///
    /// The protocol is the text before `://` and selects the source. The
    /// extension is the text after the last `.` and selects the decoder.
    ///
    /// # Errors
    ///
    /// URL and registry errors are checked before anything is opened, the
    /// protocol and its source first; then any [`Error`] from reading,
    /// decoding or binding.
    #[allow(clippy::result_large_err)]
    pub fn load_url<T: Configure>(&self, url: &str) -> Result<T, Error> {
        let protocol = parse_protocol(url)?;

        let source = self
            .source(protocol)
            .ok_or_else(|| Error::UnknownProtocol {
                protocol: protocol.to_string(),
            })?;

        let extension = parse_extension(url)?;
        let decoder = self.decoder_for(extension)?;

        debug!(url, protocol, extension, "loading config");

        let reader = source.open(url).map_err(|source| Error::Open {
            url: url.to_string(),
            source,
        })?;

        self.load_named(url, reader, decoder.as_ref())
    }

    /// Reads all of `reader` and loads it with `decoder`.
    ///
    /// # Errors
    ///
    /// Any [`Error`] from reading, decoding or binding.
    #[allow(clippy::result_large_err)]
    pub fn load<T: Configure, R: Read>(&self, reader: R, decoder: &dyn Decoder) -> Result<T, Error> {
        self.load_named(READER_ORIGIN, reader, decoder)
    }

    /// Loads JSON from `reader` with the registered `json` decoder.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownExtension`] if no `json` decoder is registered, else
    /// as [`load`](Self::load).
    #[allow(clippy::result_large_err)]
    pub fn load_json<T: Configure, R: Read>(&self, reader: R) -> Result<T, Error> {
        self.load_registered("json", reader)
    }

    /// Loads TOML from `reader` with the registered `toml` decoder.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownExtension`] if no `toml` decoder is registered, else
    /// as [`load`](Self::load).
    #[allow(clippy::result_large_err)]
    pub fn load_toml<T: Configure, R: Read>(&self, reader: R) -> Result<T, Error> {
        self.load_registered("toml", reader)
    }

    /// Loads YAML from `reader` with the registered `yaml` decoder.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownExtension`] if no `yaml` decoder is registered, else
    /// as [`load`](Self::load).
    #[allow(clippy::result_large_err)]
    pub fn load_yaml<T: Configure, R: Read>(&self, reader: R) -> Result<T, Error> {
        self.load_registered("yaml", reader)
    }

    /// Loads an in-memory document with `decoder`.
    ///
    /// # Errors
    ///
    /// Any [`Error`] from decoding or binding.
    #[allow(clippy::result_large_err)]
    pub fn load_str<T: Configure>(&self, text: &str, decoder: &dyn Decoder) -> Result<T, Error> {
        load_bytes(STRING_ORIGIN, text.as_bytes(), decoder)
    }

    #[allow(clippy::result_large_err)]
    fn load_registered<T: Configure, R: Read>(&self, extension: &str, reader: R) -> Result<T, Error> {
        let decoder = self.decoder_for(extension)?;
        self.load_named(READER_ORIGIN, reader, decoder.as_ref())
    }

    #[allow(clippy::result_large_err)]
    fn load_named<T: Configure, R: Read>(
        &self,
        origin: &str,
        mut reader: R,
        decoder: &dyn Decoder,
    ) -> Result<T, Error> {
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .map_err(|source| Error::Read {
                origin: origin.to_string(),
                source,
            })?;

        load_bytes(origin, &bytes, decoder)
    }

    #[allow(clippy::result_large_err)]
    fn decoder_for(&self, extension: &str) -> Result<Arc<dyn Decoder>, Error> {
        self.decoder(extension)
            .cloned()
            .ok_or_else(|| Error::UnknownExtension {
                extension: extension.to_string(),
            })
    }
}

impl Debug for Loader {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut protocols: Vec<_> = self.sources.keys().collect();
        protocols.sort();

        let mut extensions: Vec<_> = self.decoders.keys().collect();
        extensions.sort();

        f.debug_struct("Loader")
            .field("protocols", &protocols)
            .field("extensions", &extensions)
            .finish()
    }
}

/// Splits a URL into its protocol and extension.
///
/// # Errors
///
/// [`Error::MissingProtocol`], [`Error::MissingExtension`] or
/// [`Error::TrailingDot`].
#[allow(clippy::result_large_err)]
pub fn parse_url(url: &str) -> Result<(&str, &str), Error> {
    Ok((parse_protocol(url)?, parse_extension(url)?))
}

#[allow(clippy::result_large_err)]
fn parse_protocol(url: &str) -> Result<&str, Error> {
    url.split_once(PROTOCOL_SEPARATOR)
        .map(|(protocol, _)| protocol)
        .ok_or_else(|| Error::MissingProtocol {
            url: url.to_string(),
        })
}

#[allow(clippy::result_large_err)]
fn parse_extension(url: &str) -> Result<&str, Error> {
    let Some((_, extension)) = url.rsplit_once('.') else {
        return Err(Error::MissingExtension {
            url: url.to_string(),
        });
    };

    if extension.is_empty() {
        return Err(Error::TrailingDot {
            url: url.to_string(),
        });
    }

    Ok(extension)
}

/// Decodes, deserializes and binds one document.
#[allow(clippy::result_large_err)]
fn load_bytes<T: Configure>(origin: &str, bytes: &[u8], decoder: &dyn Decoder) -> Result<T, Error> {
    let mut tree = match decoder.decode(origin, bytes)? {
        SJSON::Value::Null => SJSON::Value::Object(KeyMap::new()),
        tree @ SJSON::Value::Object(_) => tree,
        other => {
            return Err(Error::NotAMapping {
                origin: origin.to_string(),
                found: keymap::kind_name(&other),
            });
        }
    };

    // Serde matches names exactly; respell keys that differ only in case.
    T::canonicalize(&mut tree);

    let mut value: T = serde_path_to_error::deserialize(&tree).map_err(|e| Error::Unmarshal {
        origin: origin.to_string(),
        path: e.path().to_string(),
        source: e.into_inner(),
    })?;

    let keys = match tree {
        SJSON::Value::Object(map) => keymap::normalize(map),
        _ => KeyMap::new(),
    };

    bind::bind(&mut value, decoder, &keys)?;

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::JsonDecoder;

    #[test]
    fn test_parse_url() {
        assert_eq!(parse_url("file://a/b.toml").unwrap(), ("file", "toml"));
        assert_eq!(
            parse_url("https://example.com/app.yaml").unwrap(),
            ("https", "yaml")
        );
    }

    #[test]
    fn test_parse_url_errors() {
        assert!(matches!(
            parse_url("config.toml"),
            Err(Error::MissingProtocol { .. })
        ));
        assert!(matches!(
            parse_url("file://config"),
            Err(Error::MissingExtension { .. })
        ));
        assert!(matches!(
            parse_url("file://config."),
            Err(Error::TrailingDot { .. })
        ));
    }

    #[test]
    fn test_protocol_parses_without_extension() {
        assert_eq!(parse_protocol("s3://bucket/key").unwrap(), "s3");
        assert!(matches!(
            parse_extension("s3://bucket/key"),
            Err(Error::MissingExtension { .. })
        ));
    }

    #[test]
    fn test_with_defaults_registers_builtins() {
        let loader = Loader::with_defaults();
        assert!(loader.source("file").is_some());
        assert!(loader.decoder("json").is_some());
        #[cfg(feature = "toml")]
        assert!(loader.decoder("toml").is_some());
        #[cfg(feature = "yaml")]
        assert!(loader.decoder("yml").is_some());
        assert!(loader.decoder("ini").is_none());
    }

    #[test]
    fn test_duplicate_decoder_registers_nothing() {
        let mut loader = Loader::new();
        loader.register_decoder(JsonDecoder).unwrap();

        let err = loader.register_decoder(JsonDecoder).unwrap_err();
        assert!(matches!(err, Error::DuplicateDecoder { extension: "json" }));
    }

    #[test]
    fn test_empty_loader_debug() {
        assert_eq!(
            format!("{:?}", Loader::new()),
            "Loader { protocols: [], extensions: [] }"
        );
    }
}
