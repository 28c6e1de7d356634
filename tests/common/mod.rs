//! Common test utilities
//!
//! Scripted [`FeedSource`] doubles for driving the orchestrator without a
//! network.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use dongban::crawler::{CrawlOrchestrator, FeedEntry, FeedSource};
use dongban::relevance::RelevanceFilter;
use dongban::utils::error::FetchError;
use std::time::Duration;

/// What the scripted feed does for one keyword
#[derive(Debug, Clone)]
pub enum Script {
    Entries(Vec<FeedEntry>),
    Fail(u16),
    Timeout,
    Panic,
}

/// Feed double answering from a keyword -> script table
///
/// Unknown keywords return no entries. Every call is recorded.
#[derive(Default)]
pub struct ScriptedFeed {
    scripts: HashMap<String, Script>,
    calls: Mutex<Vec<(String, usize)>>,
}

impl ScriptedFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, keyword: &str, script: Script) -> Self {
        self.scripts.insert(keyword.to_string(), script);
        self
    }

    pub fn entries(self, keyword: &str, entries: Vec<FeedEntry>) -> Self {
        self.with(keyword, Script::Entries(entries))
    }

    /// Keywords queried so far with the cap passed to each call
    pub fn calls(&self) -> Vec<(String, usize)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl FeedSource for ScriptedFeed {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn search(
        &self,
        keyword: &str,
        max_results: usize,
    ) -> Result<Vec<FeedEntry>, FetchError> {
        self.calls
            .lock()
            .unwrap()
            .push((keyword.to_string(), max_results));

        match self.scripts.get(keyword) {
            Some(Script::Entries(entries)) => {
                Ok(entries.iter().take(max_results).cloned().collect())
            }
            Some(Script::Fail(status)) => Err(FetchError::ServerError(*status)),
            Some(Script::Timeout) => Err(FetchError::Timeout),
            Some(Script::Panic) => panic!("scripted failure for {keyword}"),
            None => Ok(Vec::new()),
        }
    }
}

/// Feed entry with a title and link; other fields absent
pub fn entry(title: &str, link: &str) -> FeedEntry {
    FeedEntry {
        title: Some(title.to_string()),
        link: Some(link.to_string()),
        ..Default::default()
    }
}

/// Feed entry with every field present
pub fn full_entry(title: &str, link: &str, summary: &str, source: &str) -> FeedEntry {
    FeedEntry {
        title: Some(title.to_string()),
        link: Some(link.to_string()),
        published: Some("Tue, 14 Oct 2025 06:00:00 GMT".to_string()),
        summary: Some(summary.to_string()),
        source: Some(source.to_string()),
        media_url: None,
    }
}

/// Orchestrator without pacing over a scripted feed
pub fn orchestrator(feed: ScriptedFeed, terms: &[&str]) -> CrawlOrchestrator<ScriptedFeed> {
    CrawlOrchestrator::new(feed, RelevanceFilter::new(terms)).with_keyword_delay(Duration::ZERO)
}
