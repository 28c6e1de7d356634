//! dongban - Korean shared-growth news collector
//!
//! Queries a news search feed for a list of keywords, deduplicates the hits
//! across keywords by normalized URL, keeps only articles that mention the
//! shared-growth vocabulary, and writes the result as JSON and CSV.
//!
//! # Architecture
//!
//! - [`config`] - Configuration management and settings
//! - [`crawler`] - Feed transport, search feed, URL identity, orchestration
//! - [`relevance`] - Term-based relevance filter
//! - [`parser`] - Optional full-text extraction from article pages
//! - [`models`] - Articles and crawl results
//! - [`output`] - JSON, CSV and console summary sinks
//! - [`utils`] - Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use dongban::config::Config;
//! use dongban::crawler::{CrawlOrchestrator, GoogleNewsFeed};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let feed = GoogleNewsFeed::from_config(&config)?;
//!     let orchestrator = CrawlOrchestrator::from_config(feed, &config);
//!
//!     let result = orchestrator.run(&config.keywords).await;
//!     println!("{}", dongban::output::render_summary(&result));
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod crawler;
pub mod error;
pub mod models;
pub mod output;
pub mod parser;
pub mod relevance;
pub mod utils;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::crawler::{CrawlOrchestrator, FeedEntry, FeedSource, GoogleNewsFeed};
    pub use crate::error::{DongbanErrorTrait, Error, ErrorCategory, Result};
    pub use crate::models::{Article, CrawlResult, CrawlStats};
    pub use crate::parser::ContentExtractor;
    pub use crate::relevance::RelevanceFilter;
}

// Direct re-exports for convenience
pub use models::{Article, CrawlResult, CrawlStats};
