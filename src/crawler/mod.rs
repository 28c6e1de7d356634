//! Keyword crawling over news search feeds
//!
//! This module holds the feed transport, the search feed seam, article URL
//! identity, and the orchestrator that ties them together.

pub mod feed;
pub mod fetcher;
pub mod orchestrator;
pub mod url;

pub use feed::{FeedEntry, FeedSource, GoogleNewsFeed};
pub use fetcher::Fetcher;
pub use orchestrator::CrawlOrchestrator;
