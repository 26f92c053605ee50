//! Decode errors with source locations.

use miette::{Diagnostic, NamedSource, SourceSpan};

/// A document could not be decoded.
///
/// When the underlying parser reports a location, [`DecodeError::Parse`]
/// carries the document and a span so `miette` can point at it:
///
/// ```text
/// Error: TOML parse error in file://config.toml
///    ╭─[file://config.toml:3:8]
///  3 │ port = = 8080
///    ·        ┬
///    ·        ╰── invalid string
///    ╰────
///   help: check for missing quotes, invalid values, or syntax errors
/// ```
#[derive(Debug, Diagnostic, thiserror::Error)]
pub enum DecodeError {
    /// The bytes are not UTF-8.
    #[error("{format} document {origin} is not valid UTF-8")]
    #[diagnostic(
        code(configurer::decode::invalid_utf8),
        help("configuration documents must be UTF-8 encoded")
    )]
    InvalidUtf8 {
        /// Format name.
        format: &'static str,

        /// Where the bytes came from.
        origin: String,

        /// The UTF-8 failure.
        #[source]
        source: std::str::Utf8Error,
    },

    /// Syntax error with a location.
    #[error("{format} parse error in {origin}")]
    #[diagnostic(code(configurer::decode::parse_error))]
    Parse {
        /// Format name.
        format: &'static str,

        /// Where the bytes came from.
        origin: String,

        /// The document, for display.
        #[source_code]
        src: NamedSource<String>,

        /// Location of the error.
        #[label("{message}")]
        span: SourceSpan,

        /// What went wrong.
        message: String,

        /// How to fix it.
        #[help]
        help: String,
    },

    /// Syntax error without a usable location.
    #[error("{format} parse error in {origin}: {message}")]
    #[diagnostic(code(configurer::decode::parse_error))]
    ParseNoSpan {
        /// Format name.
        format: &'static str,

        /// Where the bytes came from.
        origin: String,

        /// What went wrong.
        message: String,

        /// How to fix it.
        #[help]
        help: String,
    },
}

impl DecodeError {
    /// Builds a located parse error from a byte offset.
    pub(crate) fn at_offset(
        format: &'static str,
        origin: &str,
        content: &str,
        offset: usize,
        message: impl Into<String>,
        help: &str,
    ) -> Self {
        Self::at_span(
            format,
            origin,
            content,
            offset_to_span(offset, content),
            message,
            help,
        )
    }

    /// Builds a located parse error from an explicit span.
    pub(crate) fn at_span(
        format: &'static str,
        origin: &str,
        content: &str,
        span: SourceSpan,
        message: impl Into<String>,
        help: &str,
    ) -> Self {
        Self::Parse {
            format,
            origin: origin.to_string(),
            src: NamedSource::new(origin, content.to_string()),
            span,
            message: message.into(),
            help: help.to_string(),
        }
    }

    /// Builds an unlocated parse error.
    pub(crate) fn no_span(
        format: &'static str,
        origin: &str,
        message: impl Into<String>,
        help: &str,
    ) -> Self {
        Self::ParseNoSpan {
            format,
            origin: origin.to_string(),
            message: message.into(),
            help: help.to_string(),
        }
    }

    /// The format that failed.
    #[must_use]
    pub fn format(&self) -> &'static str {
        match self {
            Self::InvalidUtf8 { format, .. }
            | Self::Parse { format, .. }
            | Self::ParseNoSpan { format, .. } => format,
        }
    }
}

/// Interprets `bytes` as UTF-8.
pub(crate) fn utf8<'a>(
    format: &'static str,
    origin: &str,
    bytes: &'a [u8],
) -> Result<&'a str, DecodeError> {
    std::str::from_utf8(bytes).map_err(|source| DecodeError::InvalidUtf8 {
        format,
        origin: origin.to_string(),
        source,
    })
}

/// A span starting at `offset` that covers the token found there.
pub(crate) fn offset_to_span(offset: usize, content: &str) -> SourceSpan {
    let offset = floor_char_boundary(content, offset.min(content.len()));
    let remaining = &content[offset..];
    let len = remaining
        .find(|c: char| c.is_whitespace() || matches!(c, ',' | '}' | ']'))
        .unwrap_or(remaining.len().min(20))
        .max(1);

    SourceSpan::new(offset.into(), len)
}

/// Converts a 1-indexed line/column pair to a byte offset.
pub(crate) fn line_col_to_offset(content: &str, line: usize, col: usize) -> usize {
    let mut offset = 0;

    for (index, text) in content.split('\n').enumerate() {
        if index + 1 == line {
            return offset + col.saturating_sub(1).min(text.len());
        }

        offset += text.len() + 1;
    }

    content.len()
}

fn floor_char_boundary(content: &str, mut offset: usize) -> usize {
    while offset > 0 && !content.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

/// Pulls `line N column M` out of a parser message.
#[cfg(feature = "yaml")]
pub(crate) fn extract_line_col(message: &str) -> Option<(usize, usize)> {
    let line_idx = message.find("line ")?;
    let after_line = &message[(line_idx + 5)..];
    let line_end = after_line.find(|c: char| !c.is_ascii_digit())?;
    let line = after_line[..line_end].parse::<usize>().ok()?;

    let col_idx = after_line.find("column ")?;
    let after_col = &after_line[(col_idx + 7)..];
    let col_end = after_col
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(after_col.len());
    let col = after_col[..col_end].parse::<usize>().ok()?;

    Some((line, col))
}
