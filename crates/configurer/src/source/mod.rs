//! Byte sources addressed by URL protocol.
//!
//! A [`Source`] opens the document behind a URL such as
//! `file://config.toml` or `https://example.com/app.yaml`. The
//! [`Loader`](crate::Loader) picks the source by the URL's protocol.
//!
//! | Source | Feature | Protocols |
//! |--------|---------|-----------|
//! | [`FileSource`] | always | `file` |
//! | [`HttpSource`] | `http` | `http`, `https` |

mod file;

#[cfg(feature = "http")]
mod http;

use std::io::Read;
use std::sync::Arc;

use miette::Diagnostic;

pub use file::FileSource;

#[cfg(feature = "http")]
pub use http::HttpSource;

/// Transport failures.
#[derive(Debug, Diagnostic, thiserror::Error)]
pub enum SourceError {
    /// A local file could not be opened.
    #[error("couldn't open {path}")]
    #[diagnostic(
        code(configurer::source::io),
        help("check that the file exists and is readable")
    )]
    Io {
        /// The filesystem path.
        path: String,

        /// The I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The request never produced a response.
    #[error("error getting URL {url}")]
    #[diagnostic(code(configurer::source::http))]
    Http {
        /// The requested URL.
        url: String,

        /// The transport failure.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The server answered with something other than 200.
    #[error("expected 200 response code but got {status} from {url}")]
    #[diagnostic(code(configurer::source::status))]
    Status {
        /// The requested URL.
        url: String,

        /// The response status.
        status: u16,
    },
}

/// Opens documents for one or more URL protocols.
pub trait Source: Send + Sync {
    /// Protocols handled, without `://`.
    fn protocols(&self) -> &'static [&'static str];

    /// Opens the full URL (protocol included) for reading.
    ///
    /// # Errors
    ///
    /// Returns a [`SourceError`] if the document cannot be reached.
    fn open(&self, url: &str) -> Result<Box<dyn Read + Send>, SourceError>;
}

/// All sources compiled in.
pub(crate) fn builtin() -> Vec<Arc<dyn Source>> {
    let file: Arc<dyn Source> = Arc::new(FileSource);

    #[cfg(feature = "http")]
    let http: Option<Arc<dyn Source>> = Some(Arc::new(HttpSource::default()));

    #[cfg(not(feature = "http"))]
    let http: Option<Arc<dyn Source>> = None;

    std::iter::once(file).chain(http).collect()
}
