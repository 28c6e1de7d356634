//! Error types for the dongban crawler
//!
//! Each enum matches one recovery boundary of a crawl run: transport,
//! single feed entry, single keyword, and result serialization.

use thiserror::Error;

/// Errors raised by the HTTP transport or while reading a feed document
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP request error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status code
    #[error("Server error: {0}")]
    ServerError(u16),

    /// Request timeout
    #[error("Request timeout")]
    Timeout,

    /// Content decoding error
    #[error("Decoding error: {0}")]
    Decode(String),

    /// Invalid or refused URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Response body is not a readable RSS document
    #[error("Malformed feed: {0}")]
    Feed(String),
}

/// Errors that make a single feed entry unusable
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Entry carries no link, so it has no identity
    #[error("Feed entry has no link")]
    MissingLink,
}

/// Failure of one keyword step inside a crawl run
#[derive(Error, Debug)]
pub enum CrawlerError {
    /// Fetch error
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// The keyword step panicked
    #[error("Keyword step panicked: {0}")]
    Panicked(String),
}

/// Errors writing crawl results
#[derive(Error, Debug)]
pub enum OutputError {
    /// Filesystem error
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization error
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV serialization error
    #[error("CSV serialization failed: {0}")]
    Csv(#[from] csv::Error),
}

impl OutputError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}
