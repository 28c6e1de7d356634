//! Keyword search feeds
//!
//! [`FeedSource`] is the seam between the crawl orchestrator and the
//! network. [`GoogleNewsFeed`] implements it over the Google News RSS search
//! endpoint.

use async_trait::async_trait;
use url::Url;

use crate::config::{Config, FeedConfig};
use crate::crawler::fetcher::Fetcher;
use crate::utils::error::FetchError;

/// One raw `<item>` of a search feed
///
/// Every field is optional; absent values are tolerated and become empty
/// strings when an [`Article`](crate::models::Article) is built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedEntry {
    pub title: Option<String>,
    pub link: Option<String>,
    pub published: Option<String>,
    pub summary: Option<String>,
    pub source: Option<String>,
    /// `url` of the first `<media:content>` element
    pub media_url: Option<String>,
}

impl From<&rss::Item> for FeedEntry {
    fn from(item: &rss::Item) -> Self {
        Self {
            title: item.title().map(str::to_string),
            link: item.link().map(str::to_string),
            published: item.pub_date().map(str::to_string),
            summary: item.description().map(str::to_string),
            source: item
                .source()
                .and_then(|s| s.title())
                .map(str::to_string),
            media_url: item
                .extensions()
                .get("media")
                .and_then(|media| media.get("content"))
                .and_then(|contents| contents.first())
                .and_then(|content| content.attrs().get("url"))
                .cloned(),
        }
    }
}

/// A search feed queried once per keyword
///
/// Implementations report transport and document failures through the
/// returned `Result` and never panic on bad input; the caller treats an
/// error as zero entries for that keyword.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Short name used in log events
    fn name(&self) -> &str;

    /// Return at most `max_results` entries for `keyword`, in feed order
    async fn search(&self, keyword: &str, max_results: usize)
        -> Result<Vec<FeedEntry>, FetchError>;
}

/// Google News RSS search feed
pub struct GoogleNewsFeed {
    fetcher: Fetcher,
    config: FeedConfig,
}

impl GoogleNewsFeed {
    pub fn new(fetcher: Fetcher, config: FeedConfig) -> Self {
        Self { fetcher, config }
    }

    /// Build a feed with its own fetcher from the full configuration
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Http` if the HTTP client cannot be created
    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        Ok(Self::new(Fetcher::from_config(config)?, config.feed.clone()))
    }

    /// Search URL for a keyword
    ///
    /// ```
    /// use dongban::config::FeedConfig;
    /// use dongban::crawler::feed::GoogleNewsFeed;
    ///
    /// let url = GoogleNewsFeed::search_url(&FeedConfig::default(), "상생 협력").unwrap();
    /// assert!(url.as_str().starts_with("https://news.google.com/rss/search?q="));
    /// assert!(url.as_str().ends_with("&hl=ko&gl=KR&ceid=KR:ko&num=100"));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `FetchError::InvalidUrl` if the configured base URL is invalid
    pub fn search_url(config: &FeedConfig, keyword: &str) -> Result<Url, FetchError> {
        let mut url = Url::parse_with_params(
            &config.base_url,
            &[
                ("q", keyword),
                ("hl", config.language.as_str()),
                ("gl", config.region.as_str()),
            ],
        )
        .map_err(|e| FetchError::InvalidUrl(format!("{}: {e}", config.base_url)))?;

        // Google writes the edition id as region:language with a bare colon
        let ceid = format!(
            "{}:{}",
            form_encode(&config.region),
            form_encode(&config.language)
        );
        let query = format!(
            "{}&ceid={ceid}&num={}",
            url.query().unwrap_or_default(),
            config.num
        );
        url.set_query(Some(&query));

        Ok(url)
    }

    /// Search URL for a keyword using this feed's configuration
    ///
    /// # Errors
    ///
    /// Returns `FetchError::InvalidUrl` if the configured base URL is invalid
    pub fn build_search_url(&self, keyword: &str) -> Result<Url, FetchError> {
        Self::search_url(&self.config, keyword)
    }
}

fn form_encode(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// Parse an RSS document into at most `max_results` entries
///
/// # Errors
///
/// Returns `FetchError::Feed` if the document is not valid RSS
pub fn parse_feed(xml: &str, max_results: usize) -> Result<Vec<FeedEntry>, FetchError> {
    let channel =
        rss::Channel::read_from(xml.as_bytes()).map_err(|e| FetchError::Feed(e.to_string()))?;

    Ok(channel
        .items()
        .iter()
        .take(max_results)
        .map(FeedEntry::from)
        .collect())
}

#[async_trait]
impl FeedSource for GoogleNewsFeed {
    fn name(&self) -> &str {
        "google-news"
    }

    async fn search(
        &self,
        keyword: &str,
        max_results: usize,
    ) -> Result<Vec<FeedEntry>, FetchError> {
        let url = self.build_search_url(keyword)?;
        let body = self.fetcher.get_text(url.as_str()).await?;
        parse_feed(&body, max_results)
    }
}
