//! Unified error handling for the dongban crate
//!
//! Domain errors live in [`crate::utils::error`]; this module folds them into
//! a single [`Error`] for code that crosses module boundaries, and classifies
//! them with [`ErrorCategory`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use dongban::error::{DongbanErrorTrait, Error};
//!
//! fn report(err: &Error) {
//!     if err.is_recoverable() {
//!         tracing::warn!(error = %err, "{}", err.korean_desc());
//!     } else {
//!         tracing::error!(error = %err, "{}", err.korean_desc());
//!     }
//! }
//! ```

use std::io;
use thiserror::Error;

pub use crate::utils::error::{CrawlerError, FetchError, OutputError, ParseError};

/// Common trait for all dongban error types
pub trait DongbanErrorTrait: std::error::Error {
    /// Whether the run can carry on past this error
    fn is_recoverable(&self) -> bool;

    /// Korean description for user-facing messages
    fn korean_desc(&self) -> String;

    /// Error category for handling strategies
    fn category(&self) -> ErrorCategory;
}

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Network-related errors (HTTP, timeout, feed transport)
    Network,
    /// Feed entry and document parsing errors
    Parsing,
    /// Output and I/O errors
    Storage,
    /// Configuration and validation errors
    Config,
    /// Other/unknown errors
    Other,
}

impl ErrorCategory {
    /// Korean description for the category
    pub fn korean_desc(&self) -> &'static str {
        match self {
            Self::Network => "네트워크 오류",
            Self::Parsing => "파싱 오류",
            Self::Storage => "저장소 오류",
            Self::Config => "설정 오류",
            Self::Other => "기타 오류",
        }
    }
}

/// Unified error type for the dongban crate
#[derive(Error, Debug)]
pub enum Error {
    /// Per-keyword crawl errors
    #[error("Crawler error: {0}")]
    Crawler(#[from] CrawlerError),

    /// Transport errors
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Feed entry errors
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Result serialization errors
    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    /// Generic error with context
    #[error("{context}")]
    Other {
        context: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl DongbanErrorTrait for Error {
    fn is_recoverable(&self) -> bool {
        match self {
            // Every per-keyword and per-entry failure degrades to fewer results
            Self::Crawler(_) | Self::Fetch(_) | Self::Parse(_) => true,
            Self::Output(_) | Self::Io(_) => true,
            Self::Config(_) => false,
            Self::Other { .. } => false,
        }
    }

    fn korean_desc(&self) -> String {
        match self {
            Self::Crawler(CrawlerError::Panicked(msg)) => {
                format!("키워드 처리 중 예기치 않은 오류: {msg}")
            }
            Self::Crawler(CrawlerError::Fetch(e)) | Self::Fetch(e) => fetch_desc(e),
            Self::Crawler(CrawlerError::Parse(e)) | Self::Parse(e) => parse_desc(e),
            Self::Output(e) => format!("결과 저장 실패: {e}"),
            Self::Io(e) => format!("입출력 오류: {e}"),
            Self::Config(msg) => format!("설정 오류: {msg}"),
            Self::Other { context, .. } => context.clone(),
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Crawler(CrawlerError::Fetch(_)) | Self::Fetch(_) => ErrorCategory::Network,
            Self::Crawler(CrawlerError::Parse(_)) | Self::Parse(_) => ErrorCategory::Parsing,
            Self::Crawler(CrawlerError::Panicked(_)) => ErrorCategory::Other,
            Self::Output(_) | Self::Io(_) => ErrorCategory::Storage,
            Self::Config(_) => ErrorCategory::Config,
            Self::Other { .. } => ErrorCategory::Other,
        }
    }
}

fn fetch_desc(err: &FetchError) -> String {
    match err {
        FetchError::Timeout => "요청 시간 초과".to_string(),
        FetchError::ServerError(status) => format!("서버 오류 (HTTP {status})"),
        FetchError::Feed(msg) => format!("피드 형식 오류: {msg}"),
        FetchError::InvalidUrl(url) => format!("잘못된 URL: {url}"),
        e => format!("네트워크 오류: {e}"),
    }
}

fn parse_desc(err: &ParseError) -> String {
    match err {
        ParseError::MissingLink => "링크가 없는 기사 항목".to_string(),
    }
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a generic error with context
    pub fn other(context: impl Into<String>) -> Self {
        Self::Other {
            context: context.into(),
            source: None,
        }
    }

    /// Create a generic error with context and source
    pub fn with_source(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Other {
            context: context.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;
