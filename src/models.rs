// Core data structures for the dongban crawler

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::crawler::feed::FeedEntry;
use crate::crawler::url::normalize;
use crate::utils::error::ParseError;

/// News article collected from a keyword query
///
/// Built once from a feed entry and never mutated afterwards; the
/// `normalized_url` is derived from `link` at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    title: String,
    link: String,
    published: String,
    summary: String,
    #[serde(rename = "source")]
    source_name: String,
    keyword: String,
    crawled_at: DateTime<Utc>,
    normalized_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    media_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<String>,
}

impl Article {
    /// Build an article from a raw feed entry
    ///
    /// Missing text fields become empty strings. An entry without a
    /// non-blank link cannot be keyed and is rejected.
    pub fn from_entry(
        entry: FeedEntry,
        keyword: &str,
        crawled_at: DateTime<Utc>,
    ) -> Result<Self, ParseError> {
        let link = entry
            .link
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .ok_or(ParseError::MissingLink)?;

        let normalized_url = normalize(&link);

        Ok(Self {
            title: entry.title.unwrap_or_default(),
            link,
            published: entry.published.unwrap_or_default(),
            summary: entry.summary.unwrap_or_default(),
            source_name: entry.source.unwrap_or_default(),
            keyword: keyword.to_string(),
            crawled_at,
            normalized_url,
            media_url: entry.media_url.filter(|url| !url.trim().is_empty()),
            content: None,
        })
    }

    /// Return a copy carrying extracted full text
    #[must_use]
    pub fn with_content(self, content: String) -> Self {
        Self {
            content: Some(content),
            ..self
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn link(&self) -> &str {
        &self.link
    }

    pub fn published(&self) -> &str {
        &self.published
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn crawled_at(&self) -> DateTime<Utc> {
        self.crawled_at
    }

    pub fn normalized_url(&self) -> &str {
        &self.normalized_url
    }

    /// Thumbnail or media link from the feed, if any
    pub fn media_url(&self) -> Option<&str> {
        self.media_url.as_deref()
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// Publication time, when the feed text is RFC 2822 or RFC 3339
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.published.trim();
        DateTime::parse_from_rfc2822(raw)
            .or_else(|_| DateTime::parse_from_rfc3339(raw))
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Publication time as `%Y-%m-%d %H:%M:%S`, or the raw text
    pub fn published_display(&self) -> String {
        match self.published_at() {
            Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => self.published.clone(),
        }
    }
}

/// Counters collected over one crawl run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrawlStats {
    pub keywords_total: usize,
    pub keywords_failed: usize,
    pub entries_fetched: usize,
    pub malformed_entries: usize,
    pub duplicates_dropped: usize,
    pub irrelevant_dropped: usize,
    pub articles_kept: usize,
    pub duration_ms: u64,
}

impl CrawlStats {
    /// Share of well-formed entries dropped as duplicates
    pub fn dedup_ratio(&self) -> f64 {
        let candidates = self.entries_fetched.saturating_sub(self.malformed_entries);
        if candidates == 0 {
            0.0
        } else {
            self.duplicates_dropped as f64 / candidates as f64
        }
    }
}

/// Deduplicated, relevance-filtered articles of one run
///
/// Ordered by keyword order, then feed order. No two articles share a
/// `normalized_url`.
#[derive(Debug, Clone, Default)]
pub struct CrawlResult {
    articles: Vec<Article>,
    stats: CrawlStats,
}

impl CrawlResult {
    pub(crate) fn new(articles: Vec<Article>, stats: CrawlStats) -> Self {
        Self { articles, stats }
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Article> {
        self.articles.iter()
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn stats(&self) -> &CrawlStats {
        &self.stats
    }

    pub(crate) fn into_parts(self) -> (Vec<Article>, CrawlStats) {
        (self.articles, self.stats)
    }

    /// Article count per keyword, largest first
    ///
    /// Equal counts keep the order in which the keyword first appears.
    pub fn keyword_counts(&self) -> Vec<(String, usize)> {
        let mut counts: Vec<(String, usize)> = Vec::new();
        for article in &self.articles {
            match counts.iter_mut().find(|(k, _)| k == article.keyword()) {
                Some((_, n)) => *n += 1,
                None => counts.push((article.keyword().to_string(), 1)),
            }
        }
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts
    }
}

impl<'a> IntoIterator for &'a CrawlResult {
    type Item = &'a Article;
    type IntoIter = std::slice::Iter<'a, Article>;

    fn into_iter(self) -> Self::IntoIter {
        self.articles.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(link: Option<&str>) -> FeedEntry {
        FeedEntry {
            title: Some("동반성장 우수기업 선정".to_string()),
            link: link.map(str::to_string),
            published: Some("Mon, 13 Oct 2025 01:02:03 GMT".to_string()),
            summary: None,
            source: Some("연합뉴스".to_string()),
            media_url: None,
        }
    }

    #[test]
    fn test_from_entry_defaults_missing_fields() {
        let article =
            Article::from_entry(entry(Some("https://x.com/a?utm=1")), "키워드", Utc::now())
                .unwrap();
        assert_eq!(article.summary(), "");
        assert_eq!(article.source_name(), "연합뉴스");
        assert_eq!(article.keyword(), "키워드");
        assert_eq!(article.normalized_url(), "x.com/a");
        assert!(article.content().is_none());
    }

    #[test]
    fn test_from_entry_without_link_is_malformed() {
        assert_eq!(
            Article::from_entry(entry(None), "k", Utc::now()),
            Err(ParseError::MissingLink)
        );
        assert_eq!(
            Article::from_entry(entry(Some("   ")), "k", Utc::now()),
            Err(ParseError::MissingLink)
        );
    }

    #[test]
    fn test_equal_links_share_identity_across_keywords() {
        let a = Article::from_entry(entry(Some("https://x.com/a")), "A", Utc::now()).unwrap();
        let b = Article::from_entry(entry(Some("https://x.com/a")), "B", Utc::now()).unwrap();
        assert_eq!(a.normalized_url(), b.normalized_url());
    }

    #[test]
    fn test_published_display() {
        let article = Article::from_entry(entry(Some("https://x.com/a")), "k", Utc::now()).unwrap();
        assert_eq!(article.published_display(), "2025-10-13 01:02:03");

        let mut raw = entry(Some("https://x.com/b"));
        raw.published = Some("어제".to_string());
        let article = Article::from_entry(raw, "k", Utc::now()).unwrap();
        assert!(article.published_at().is_none());
        assert_eq!(article.published_display(), "어제");
    }

    #[test]
    fn test_with_content_keeps_identity() {
        let article = Article::from_entry(entry(Some("https://x.com/a")), "k", Utc::now()).unwrap();
        let enriched = article.clone().with_content("본문".to_string());
        assert_eq!(enriched.content(), Some("본문"));
        assert_eq!(enriched.normalized_url(), article.normalized_url());
    }

    #[test]
    fn test_json_shape() {
        let article = Article::from_entry(entry(Some("https://x.com/a")), "k", Utc::now()).unwrap();
        let value = serde_json::to_value(&article).unwrap();
        assert_eq!(value["source"], "연합뉴스");
        assert_eq!(value["normalized_url"], "x.com/a");
        assert!(value.get("content").is_none());
        assert!(value.get("media_url").is_none());
    }

    #[test]
    fn test_media_url_carried_from_entry() {
        let mut raw = entry(Some("https://x.com/a"));
        raw.media_url = Some("https://img.x.com/a.jpg".to_string());
        let article = Article::from_entry(raw, "k", Utc::now()).unwrap();
        assert_eq!(article.media_url(), Some("https://img.x.com/a.jpg"));

        let value = serde_json::to_value(&article).unwrap();
        assert_eq!(value["media_url"], "https://img.x.com/a.jpg");

        let mut blank = entry(Some("https://x.com/b"));
        blank.media_url = Some("  ".to_string());
        let article = Article::from_entry(blank, "k", Utc::now()).unwrap();
        assert!(article.media_url().is_none());
    }

    #[test]
    fn test_keyword_counts_sorted_descending() {
        let now = Utc::now();
        let make = |link: &str, kw: &str| {
            Article::from_entry(entry(Some(link)), kw, now).unwrap()
        };
        let result = CrawlResult::new(
            vec![
                make("https://a.com/1", "A"),
                make("https://a.com/2", "B"),
                make("https://a.com/3", "B"),
                make("https://a.com/4", "C"),
            ],
            CrawlStats::default(),
        );
        assert_eq!(
            result.keyword_counts(),
            vec![
                ("B".to_string(), 2),
                ("A".to_string(), 1),
                ("C".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_dedup_ratio() {
        let stats = CrawlStats {
            entries_fetched: 11,
            malformed_entries: 1,
            duplicates_dropped: 5,
            ..Default::default()
        };
        assert!((stats.dedup_ratio() - 0.5).abs() < f64::EPSILON);
        assert_eq!(CrawlStats::default().dedup_ratio(), 0.0);
    }
}
