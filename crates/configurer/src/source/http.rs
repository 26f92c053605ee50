use std::io::Read;
use std::time::Duration;

use super::{Source, SourceError};

const USER_AGENT: &str = concat!("configurer/", env!("CARGO_PKG_VERSION"));

/// Remote documents over `http://` and `https://`.
///
/// Issues a plain GET and accepts only a 200 response.
#[derive(Clone, Debug)]
pub struct HttpSource {
    agent: ureq::Agent,
}

impl HttpSource {
    /// A source whose requests give up after `timeout`.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            agent: ureq::AgentBuilder::new()
                .timeout(timeout)
                .user_agent(USER_AGENT)
                .build(),
        }
    }
}

impl Default for HttpSource {
    fn default() -> Self {
        Self::with_timeout(Duration::from_secs(30))
    }
}

impl Source for HttpSource {
    fn protocols(&self) -> &'static [&'static str] {
        &["http", "https"]
    }

    fn open(&self, url: &str) -> Result<Box<dyn Read + Send>, SourceError> {
        match self.agent.get(url).call() {
            Ok(resp) if resp.status() == 200 => Ok(Box::new(resp.into_reader())),
            Ok(resp) => Err(SourceError::Status {
                url: url.to_string(),
                status: resp.status(),
            }),
            Err(ureq::Error::Status(status, _)) => Err(SourceError::Status {
                url: url.to_string(),
                status,
            }),
            Err(e) => Err(SourceError::Http {
                url: url.to_string(),
                source: Box::new(e),
            }),
        }
    }
}
