use std::fs::File;
use std::io::Read;

use super::{Source, SourceError};

const PREFIX: &str = "file://";

/// Local files: `file://relative/path.toml`, `file:///abs/path.json`.
#[derive(Clone, Copy, Debug, Default)]
pub struct FileSource;

impl FileSource {
    /// The filesystem path a `file://` URL points at.
    #[must_use]
    pub fn path(url: &str) -> &str {
        url.strip_prefix(PREFIX).unwrap_or(url)
    }
}

impl Source for FileSource {
    fn protocols(&self) -> &'static [&'static str] {
        &["file"]
    }

    fn open(&self, url: &str) -> Result<Box<dyn Read + Send>, SourceError> {
        let path = Self::path(url);

        let file = File::open(path).map_err(|source| SourceError::Io {
            path: path.to_string(),
            source,
        })?;

        Ok(Box::new(file))
    }
}
