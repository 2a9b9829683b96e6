use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while scraping, extracting or writing a resource.
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// Non-success HTTP status on a page, image or translation fetch.
    #[error("HTTP error {status} fetching {url}")]
    Fetch { url: String, status: u16 },

    #[error("request failed for {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The page did not have the structure the resource descriptor expects.
    #[error("parse error: {0}")]
    Parse(String),

    #[error("file system error at {}: {source}", path.display())]
    FileSystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("XML error: {0}")]
    Xml(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ScrapeError {
    pub fn fs(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ScrapeError::FileSystem {
            path: path.into(),
            source,
        }
    }

    pub fn transport(url: &str, source: reqwest::Error) -> Self {
        ScrapeError::Transport {
            url: url.to_string(),
            source,
        }
    }

    /// True for failures a later attempt may not hit (server errors, rate limits, dropped connections).
    pub fn is_retryable(&self) -> bool {
        match self {
            ScrapeError::Fetch { status, .. } => *status == 429 || *status >= 500,
            ScrapeError::Transport { .. } => true,
            _ => false,
        }
    }
}

impl From<quick_xml::Error> for ScrapeError {
    fn from(err: quick_xml::Error) -> Self {
        ScrapeError::Xml(err.to_string())
    }
}

impl From<config::ConfigError> for ScrapeError {
    fn from(err: config::ConfigError) -> Self {
        ScrapeError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
