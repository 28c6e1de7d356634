//! Multi-keyword crawl orchestration
//!
//! ```text
//!   keywords ──▶ FeedSource::search ──▶ Article::from_entry ──▶ DedupState ──▶ RelevanceFilter
//!   (in order)    (one call each)        (bad entries skipped)   (first seen     (order kept)
//!                                                                 wins)
//! ```
//!
//! Keywords are processed strictly one after another. A failing keyword,
//! whether it returns an error or panics, is logged and the run moves on;
//! [`CrawlOrchestrator::run`] itself never fails.
//!
//! # Example
//!
//! ```no_run
//! use dongban::config::Config;
//! use dongban::crawler::feed::GoogleNewsFeed;
//! use dongban::crawler::orchestrator::CrawlOrchestrator;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::default();
//! let feed = GoogleNewsFeed::from_config(&config)?;
//! let orchestrator = CrawlOrchestrator::from_config(feed, &config);
//!
//! let result = orchestrator.run(&config.keywords).await;
//! println!("{} relevant articles", result.len());
//! # Ok(())
//! # }
//! ```

use chrono::Utc;
use futures::FutureExt;
use std::collections::HashSet;
use std::panic::AssertUnwindSafe;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::crawler::feed::FeedSource;
use crate::error::{DongbanErrorTrait, Error};
use crate::models::{Article, CrawlResult, CrawlStats};
use crate::relevance::RelevanceFilter;
use crate::utils::error::CrawlerError;

/// Entries consumed per keyword unless configured otherwise
pub const DEFAULT_MAX_RESULTS: usize = 30;

/// Pause between keyword queries unless configured otherwise
pub const DEFAULT_KEYWORD_DELAY: Duration = Duration::from_secs(2);

/// Drives one feed query per keyword and merges the results
pub struct CrawlOrchestrator<F> {
    source: F,
    filter: RelevanceFilter,
    max_results: usize,
    keyword_delay: Duration,
}

/// Articles built from one keyword's feed response
struct KeywordBatch {
    fetched: usize,
    malformed: usize,
    articles: Vec<Article>,
}

/// Run-local identity set and accumulated articles
#[derive(Default)]
struct DedupState {
    seen: HashSet<String>,
    articles: Vec<Article>,
}

impl DedupState {
    /// Append the article unless its identity was already seen
    fn offer(&mut self, article: Article) -> bool {
        if self.seen.contains(article.normalized_url()) {
            tracing::debug!(
                link = %article.link(),
                keyword = %article.keyword(),
                "Dropping duplicate article"
            );
            return false;
        }
        self.seen.insert(article.normalized_url().to_string());
        self.articles.push(article);
        true
    }
}

impl<F: FeedSource> CrawlOrchestrator<F> {
    pub fn new(source: F, filter: RelevanceFilter) -> Self {
        Self {
            source,
            filter,
            max_results: DEFAULT_MAX_RESULTS,
            keyword_delay: DEFAULT_KEYWORD_DELAY,
        }
    }

    /// Build an orchestrator using the crawler and relevance sections
    pub fn from_config(source: F, config: &Config) -> Self {
        Self::new(source, RelevanceFilter::new(&config.relevance.terms))
            .with_max_results(config.crawler.max_results_per_keyword)
            .with_keyword_delay(config.keyword_delay())
    }

    #[must_use]
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Pause between keyword queries; zero disables pacing
    #[must_use]
    pub fn with_keyword_delay(mut self, delay: Duration) -> Self {
        self.keyword_delay = delay;
        self
    }

    pub fn source(&self) -> &F {
        &self.source
    }

    pub fn filter(&self) -> &RelevanceFilter {
        &self.filter
    }

    /// Crawl every keyword in order and return the relevant, unique articles
    ///
    /// An empty result is a normal outcome meaning no relevant coverage.
    pub async fn run<S: AsRef<str>>(&self, keywords: &[S]) -> CrawlResult {
        let started = Instant::now();
        let mut state = DedupState::default();
        let mut stats = CrawlStats {
            keywords_total: keywords.len(),
            ..Default::default()
        };

        tracing::info!(
            source = %self.source.name(),
            keywords = keywords.len(),
            max_results = self.max_results,
            "Starting crawl run"
        );

        for (index, keyword) in keywords.iter().enumerate() {
            let keyword = keyword.as_ref();

            if index > 0 && !self.keyword_delay.is_zero() {
                tokio::time::sleep(self.keyword_delay).await;
            }

            match self.crawl_keyword_guarded(keyword).await {
                Ok(batch) => {
                    stats.entries_fetched += batch.fetched;
                    stats.malformed_entries += batch.malformed;

                    let mut added = 0usize;
                    for article in batch.articles {
                        if state.offer(article) {
                            added += 1;
                        } else {
                            stats.duplicates_dropped += 1;
                        }
                    }

                    tracing::info!(
                        keyword = %keyword,
                        fetched = batch.fetched,
                        added,
                        "Keyword processed"
                    );
                }
                Err(e) => {
                    stats.keywords_failed += 1;
                    let err = Error::from(e);
                    tracing::error!(
                        keyword = %keyword,
                        category = ?err.category(),
                        error = %err,
                        "Keyword step failed, continuing: {}",
                        err.korean_desc()
                    );
                }
            }
        }

        let (articles, irrelevant) = self.filter.retain(state.articles);
        stats.irrelevant_dropped = irrelevant;
        stats.articles_kept = articles.len();
        stats.duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        if articles.is_empty() {
            tracing::info!("No relevant coverage found");
        }

        tracing::info!(
            kept = stats.articles_kept,
            fetched = stats.entries_fetched,
            duplicates = stats.duplicates_dropped,
            irrelevant = stats.irrelevant_dropped,
            malformed = stats.malformed_entries,
            failed_keywords = stats.keywords_failed,
            duration_ms = stats.duration_ms,
            "Crawl run finished"
        );

        CrawlResult::new(articles, stats)
    }

    /// Run one keyword step, turning a panic into a `CrawlerError`
    async fn crawl_keyword_guarded(&self, keyword: &str) -> Result<KeywordBatch, CrawlerError> {
        match AssertUnwindSafe(self.crawl_keyword(keyword))
            .catch_unwind()
            .await
        {
            Ok(batch) => Ok(batch),
            Err(payload) => Err(CrawlerError::Panicked(panic_message(payload.as_ref()))),
        }
    }

    /// Query the feed for one keyword and build its articles
    ///
    /// Transport failures degrade to an empty batch; malformed entries are
    /// skipped one by one.
    async fn crawl_keyword(&self, keyword: &str) -> KeywordBatch {
        tracing::info!(keyword = %keyword, "Querying feed");

        let entries = match self.source.search(keyword, self.max_results).await {
            Ok(entries) => entries,
            Err(e) => {
                let err = Error::from(CrawlerError::from(e));
                tracing::warn!(
                    keyword = %keyword,
                    category = ?err.category(),
                    error = %err,
                    "Feed query failed, no entries for keyword: {}",
                    err.korean_desc()
                );
                Vec::new()
            }
        };

        if entries.is_empty() {
            tracing::info!(keyword = %keyword, "Feed returned no entries");
        } else {
            tracing::info!(keyword = %keyword, count = entries.len(), "Feed returned entries");
        }

        let fetched = entries.len();
        let mut malformed = 0usize;
        let mut articles = Vec::with_capacity(fetched);

        for (position, entry) in entries.into_iter().enumerate() {
            match Article::from_entry(entry, keyword, Utc::now()) {
                Ok(article) => articles.push(article),
                Err(e) => {
                    malformed += 1;
                    let err = Error::from(CrawlerError::from(e));
                    tracing::error!(
                        keyword = %keyword,
                        position,
                        error = %err,
                        "Skipping malformed feed entry: {}",
                        err.korean_desc()
                    );
                }
            }
        }

        KeywordBatch {
            fetched,
            malformed,
            articles,
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::feed::FeedEntry;
    use crate::utils::error::FetchError;
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct MapFeed(HashMap<&'static str, Vec<&'static str>>);

    #[async_trait]
    impl FeedSource for MapFeed {
        fn name(&self) -> &str {
            "map"
        }

        async fn search(
            &self,
            keyword: &str,
            max_results: usize,
        ) -> Result<Vec<FeedEntry>, FetchError> {
            Ok(self
                .0
                .get(keyword)
                .map(|links| {
                    links
                        .iter()
                        .take(max_results)
                        .map(|link| FeedEntry {
                            title: Some(format!("동반성장 {link}")),
                            link: Some(link.to_string()),
                            ..Default::default()
                        })
                        .collect()
                })
                .unwrap_or_default())
        }
    }

    fn orchestrator(map: HashMap<&'static str, Vec<&'static str>>) -> CrawlOrchestrator<MapFeed> {
        CrawlOrchestrator::new(MapFeed(map), RelevanceFilter::default())
            .with_keyword_delay(Duration::ZERO)
    }

    #[test]
    fn test_dedup_state_first_seen_wins() {
        let now = Utc::now();
        let make = |link: &str, kw: &str| {
            Article::from_entry(
                FeedEntry {
                    link: Some(link.to_string()),
                    ..Default::default()
                },
                kw,
                now,
            )
            .unwrap()
        };

        let mut state = DedupState::default();
        assert!(state.offer(make("https://x.com/a?utm=1", "A")));
        assert!(!state.offer(make("http://x.com/a", "B")));
        assert!(state.offer(make("https://y.com/b", "B")));
        assert_eq!(state.articles.len(), 2);
        assert_eq!(state.articles[0].keyword(), "A");
    }

    #[tokio::test]
    async fn test_run_merges_keywords() {
        let mut map = HashMap::new();
        map.insert("A", vec!["https://x.com/a?utm=1"]);
        map.insert("B", vec!["https://x.com/a", "https://y.com/b"]);

        let result = orchestrator(map).run(&["A", "B"]).await;

        let ids: Vec<&str> = result.iter().map(Article::normalized_url).collect();
        assert_eq!(ids, vec!["x.com/a", "y.com/b"]);
        assert_eq!(result.articles()[0].keyword(), "A");
        assert_eq!(result.stats().duplicates_dropped, 1);
        assert_eq!(result.stats().entries_fetched, 3);
    }

    #[tokio::test]
    async fn test_max_results_passed_to_source() {
        let mut map = HashMap::new();
        map.insert("A", vec!["https://x.com/1", "https://x.com/2", "https://x.com/3"]);

        let result = orchestrator(map).with_max_results(2).run(&["A"]).await;
        assert_eq!(result.len(), 2);
    }

    #[tokio::test]
    async fn test_no_keywords_yields_empty_result() {
        let result = orchestrator(HashMap::new()).run::<&str>(&[]).await;
        assert!(result.is_empty());
        assert_eq!(result.stats().keywords_total, 0);
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn std::any::Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");
        let payload: Box<dyn std::any::Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(payload.as_ref()), "owned");
        let payload: Box<dyn std::any::Any + Send> = Box::new(7u8);
        assert_eq!(panic_message(payload.as_ref()), "unknown panic");
    }
}
