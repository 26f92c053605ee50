//! Error types for configuration loading and binding.
//!
//! Every error derives [`thiserror::Error`] and [`miette::Diagnostic`], so it
//! can be returned as-is or rendered with `miette::Report`.
//!
//! # Error Types
//!
//! | Type | Raised by |
//! |------|-----------|
//! | [`Error`] | [`Loader`](crate::Loader): URL resolution, registry, reading, typed decode |
//! | [`BindError`] | the binder: field directives, required/default/env handling |
//! | [`DecodeError`](crate::decoder::DecodeError) | decoders: syntax errors with source spans |
//! | [`SourceError`](crate::source::SourceError) | sources: I/O and HTTP failures |
//! | [`DirectiveError`] | directive syntax |
//!
//! Errors never accumulate: the first failure aborts the load. Nested binding
//! failures are wrapped once per level, so [`BindError::path`] can render
//! where the failure happened:
//!
//! ```text
//! error processing field server: error processing array field listeners[1]: required field port not found
//! path: server.listeners[1].port
//! ```

use serde_json as SJSON;

use miette::Diagnostic;

use crate::decoder::DecodeError;
use crate::directive::DirectiveError;
use crate::source::SourceError;

/// Errors from [`Loader`](crate::Loader) operations.
///
/// # Diagnostic Codes
///
/// | Code | Meaning |
/// |------|---------|
/// | `configurer::url::missing_protocol` | URL has no `protocol://` prefix |
/// | `configurer::url::unknown_protocol` | no source registered for the protocol |
/// | `configurer::url::missing_extension` | URL has no `.ext` suffix |
/// | `configurer::url::unknown_extension` | no decoder registered for the extension |
/// | `configurer::registry::duplicate_*` | protocol or extension registered twice |
/// | `configurer::load::*` | reading, shape and typed-decode failures |
#[derive(Debug, Diagnostic, thiserror::Error)]
pub enum Error {
    /// The URL has no `protocol://` prefix.
    #[error("url `{url}` should start with some protocol")]
    #[diagnostic(
        code(configurer::url::missing_protocol),
        help("prefix the location with a protocol, e.g. `file://config.toml`")
    )]
    MissingProtocol {
        /// The offending URL.
        url: String,
    },

    /// No source is registered for the URL's protocol.
    #[error("can't find source for protocol {protocol}")]
    #[diagnostic(
        code(configurer::url::unknown_protocol),
        help("try registering one with `Loader::register_source`")
    )]
    UnknownProtocol {
        /// The protocol as written in the URL.
        protocol: String,
    },

    /// The URL has no `.` after the protocol separator.
    #[error("url `{url}` does not have a detectable file extension")]
    #[diagnostic(
        code(configurer::url::missing_extension),
        help("add an extension, or load with an explicit decoder")
    )]
    MissingExtension {
        /// The offending URL.
        url: String,
    },

    /// The URL ends in a dot.
    #[error("url `{url}` ends in a dot, but doesn't have a detectable file extension")]
    #[diagnostic(
        code(configurer::url::trailing_dot),
        help("add an extension, or load with an explicit decoder")
    )]
    TrailingDot {
        /// The offending URL.
        url: String,
    },

    /// No decoder is registered for the URL's extension.
    #[error("can't find decoder for extension {extension}")]
    #[diagnostic(
        code(configurer::url::unknown_extension),
        help("try registering one with `Loader::register_decoder`")
    )]
    UnknownExtension {
        /// The extension as written in the URL.
        extension: String,
    },

    /// A source claimed a protocol that is already taken.
    #[error("source with protocol {protocol} already registered")]
    #[diagnostic(code(configurer::registry::duplicate_source))]
    DuplicateSource {
        /// The contested protocol.
        protocol: &'static str,
    },

    /// A decoder claimed an extension that is already taken.
    #[error("decoder with extension {extension} already registered")]
    #[diagnostic(code(configurer::registry::duplicate_decoder))]
    DuplicateDecoder {
        /// The contested extension.
        extension: &'static str,
    },

    /// The source could not be opened.
    #[error("error opening config {url}")]
    #[diagnostic(code(configurer::load::open))]
    Open {
        /// The URL being opened.
        url: String,

        /// The transport failure.
        #[source]
        #[diagnostic_source]
        source: SourceError,
    },

    /// Reading the opened source failed.
    #[error("error reading config {origin}")]
    #[diagnostic(code(configurer::load::read))]
    Read {
        /// Where the bytes came from.
        origin: String,

        /// The I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The bytes are not valid in the decoder's format.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Decode(#[from] DecodeError),

    /// The document decoded to something other than a mapping.
    #[error("config {origin} must be a mapping at the top level, got {found}")]
    #[diagnostic(code(configurer::load::not_a_mapping))]
    NotAMapping {
        /// Where the bytes came from.
        origin: String,

        /// The kind of the decoded root.
        found: &'static str,
    },

    /// The decoded tree does not fit the destination type.
    #[error("error unmarshalling config {origin} at `{path}`: {source}")]
    #[diagnostic(
        code(configurer::load::unmarshal),
        help("check that the value matches the expected type")
    )]
    Unmarshal {
        /// Where the bytes came from.
        origin: String,

        /// Dotted path of the offending value, `.` for the root.
        path: String,

        /// The serde failure.
        #[source]
        source: SJSON::Error,
    },

    /// A field directive could not be satisfied.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Bind(#[from] BindError),
}

impl Error {
    /// The binding failure, if this is one.
    #[must_use]
    pub fn as_bind(&self) -> Option<&BindError> {
        match self {
            Self::Bind(err) => Some(err),
            _ => None,
        }
    }
}

/// Errors raised while applying field directives.
///
/// `field` is always the field's declared Rust name, so messages read the
/// same regardless of the document format.
#[derive(Debug, Diagnostic, thiserror::Error)]
pub enum BindError {
    /// The field's directive string is malformed.
    #[error("mal-formed config directive on field {field}: {source}")]
    #[diagnostic(code(configurer::bind::directive))]
    Directive {
        /// The field carrying the directive.
        field: &'static str,

        /// The syntax error.
        #[source]
        source: DirectiveError,
    },

    /// A required field is absent and nothing filled it.
    #[error("required field {field} not found")]
    #[diagnostic(
        code(configurer::bind::not_found),
        help("set it in the configuration, or give it a default")
    )]
    NotFound {
        /// The field.
        field: &'static str,
    },

    /// A required field is explicitly null and nothing filled it.
    #[error("required field {field} is nil")]
    #[diagnostic(code(configurer::bind::nil))]
    Nil {
        /// The field.
        field: &'static str,
    },

    /// A required string or sequence field is empty.
    #[error("required field {field} is empty")]
    #[diagnostic(code(configurer::bind::empty))]
    Empty {
        /// The field.
        field: &'static str,
    },

    /// The default literal does not fit the field's type.
    #[error("couldn't decode default value for field {field}: {source}")]
    #[diagnostic(code(configurer::bind::default))]
    Default {
        /// The field.
        field: &'static str,

        /// The serde failure.
        #[source]
        source: SJSON::Error,
    },

    /// The environment variable's value does not fit the field's type.
    #[error("couldn't decode env var {var} into field {field}: {source}")]
    #[diagnostic(code(configurer::bind::env))]
    Env {
        /// The environment variable.
        var: String,

        /// The field.
        field: &'static str,

        /// The serde failure.
        #[source]
        source: SJSON::Error,
    },

    /// A struct-valued field carries a default or an env override.
    #[error("struct field {field} cannot have a default defined")]
    #[diagnostic(
        code(configurer::bind::struct_default),
        help("put `default`/`env` directives on the nested struct's own fields")
    )]
    StructDefault {
        /// The field.
        field: &'static str,
    },

    /// The raw value has the wrong shape for a nested struct or sequence.
    #[error("field {field} expected a {expected}, got {found}")]
    #[diagnostic(code(configurer::bind::type_mismatch))]
    Type {
        /// The field, with an `[index]` suffix for sequence elements.
        field: String,

        /// The kind the binder needed.
        expected: &'static str,

        /// The kind it found.
        found: &'static str,
    },

    /// A failure inside a nested struct field.
    #[error("error processing field {field}: {source}")]
    #[diagnostic(code(configurer::bind::nested))]
    Nested {
        /// The struct field.
        field: &'static str,

        /// The inner failure.
        #[source]
        source: Box<BindError>,
    },

    /// A failure inside one element of a sequence of structs.
    #[error("error processing array field {field}[{index}]: {source}")]
    #[diagnostic(code(configurer::bind::element))]
    Element {
        /// The sequence field.
        field: &'static str,

        /// The element index.
        index: usize,

        /// The inner failure.
        #[source]
        source: Box<BindError>,
    },
}

impl BindError {
    /// The dotted path from the root struct to the failing field.
    ///
    /// ```rust
    /// # use configurer::BindError;
    /// let err = BindError::Nested {
    ///     field: "server",
    ///     source: Box::new(BindError::NotFound { field: "port" }),
    /// };
    /// assert_eq!(err.path(), "server.port");
    /// ```
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Nested { field, source } => format!("{field}.{}", source.path()),
            Self::Element {
                field,
                index,
                source,
            } => format!("{field}[{index}].{}", source.path()),
            leaf => leaf.field().to_string(),
        }
    }

    /// The innermost field the failure is about.
    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            Self::Nested { source, .. } | Self::Element { source, .. } => source.field(),
            Self::Type { field, .. } => field,
            Self::Directive { field, .. }
            | Self::NotFound { field }
            | Self::Nil { field }
            | Self::Empty { field }
            | Self::Default { field, .. }
            | Self::Env { field, .. }
            | Self::StructDefault { field } => field,
        }
    }

    /// The innermost error, past every `Nested` and `Element` wrapper.
    #[must_use]
    pub fn root_cause(&self) -> &Self {
        match self {
            Self::Nested { source, .. } | Self::Element { source, .. } => source.root_cause(),
            leaf => leaf,
        }
    }
}
