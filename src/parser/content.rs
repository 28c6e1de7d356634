//! Best-effort full-text extraction for article pages
//!
//! Extraction walks an ordered list of strategies and keeps the first one
//! that yields text:
//!
//! 1. Known article body containers, in [`ContentSelectors`] order
//! 2. `<meta name="description">`, then `<meta property="og:description">`
//!
//! The result is cleaned and cut to a fixed number of characters. Every
//! failure, from a refused URL to an unparseable page, ends in an empty
//! string for callers that use [`ContentExtractor::extract`].

use scraper::{ElementRef, Html, Selector};

use crate::config::Config;
use crate::models::CrawlResult;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::url::validators;
use crate::parser::sanitize::{
    decode_html_entities, has_content, remove_byline, sanitize_text, strip_html_tags,
    truncate_chars,
};
use crate::parser::selectors::ContentSelectors;
use crate::utils::error::FetchError;

/// Characters kept from extracted text unless configured otherwise
pub const DEFAULT_MAX_CHARS: usize = 1000;

/// One way of pulling article text out of a parsed page
#[derive(Debug, Clone, Copy)]
pub enum ExtractionStrategy {
    /// Text of the first element matching the selector, minus noise
    Body(&'static Selector),
    /// `content` attribute of the first matching `<meta>` element
    MetaDescription(&'static Selector),
}

impl ExtractionStrategy {
    fn apply(&self, document: &Html, noise: &[Selector]) -> Option<String> {
        match self {
            Self::Body(selector) => document
                .select(selector)
                .next()
                .map(|element| element_text(element, noise))
                .filter(|text| has_content(text)),
            Self::MetaDescription(selector) => document
                .select(selector)
                .next()
                .and_then(|element| element.value().attr("content"))
                .map(|content| strip_html_tags(&decode_html_entities(content)))
                .filter(|text| has_content(text)),
        }
    }
}

/// Collect element text, skipping noise subtrees
fn element_text(element: ElementRef<'_>, noise: &[Selector]) -> String {
    let noisy: Vec<ElementRef<'_>> = noise
        .iter()
        .flat_map(|selector| element.select(selector))
        .collect();

    let mut text = String::new();
    for node in element.descendants() {
        let Some(fragment) = node.value().as_text() else {
            continue;
        };
        let inside_noise = node
            .ancestors()
            .filter_map(ElementRef::wrap)
            .any(|ancestor| noisy.iter().any(|n| n.id() == ancestor.id()));
        if !inside_noise {
            text.push_str(fragment);
        }
    }
    text
}

/// Article page text extractor
pub struct ContentExtractor {
    fetcher: Fetcher,
    strategies: Vec<ExtractionStrategy>,
    noise: &'static [Selector],
    max_chars: usize,
    allow_private_hosts: bool,
}

impl ContentExtractor {
    pub fn new(fetcher: Fetcher) -> Self {
        let selectors = ContentSelectors::new();
        let strategies = selectors
            .body
            .iter()
            .map(ExtractionStrategy::Body)
            .chain(
                selectors
                    .meta_description
                    .iter()
                    .map(ExtractionStrategy::MetaDescription),
            )
            .collect();

        Self {
            fetcher,
            strategies,
            noise: selectors.noise,
            max_chars: DEFAULT_MAX_CHARS,
            allow_private_hosts: false,
        }
    }

    /// Build an extractor with its own fetcher from the full configuration
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Http` if the HTTP client cannot be created
    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        Ok(Self::new(Fetcher::from_config(config)?).with_max_chars(config.content.max_chars))
    }

    #[must_use]
    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    /// Permit loopback and private-range hosts, e.g. for local test servers
    #[must_use]
    pub fn allow_private_hosts(mut self) -> Self {
        self.allow_private_hosts = true;
        self
    }

    pub fn strategies(&self) -> &[ExtractionStrategy] {
        &self.strategies
    }

    /// Extract text from an already fetched page
    ///
    /// Returns an empty string when no strategy finds text.
    pub fn extract_from_html(&self, html: &str) -> String {
        let document = Html::parse_document(html);

        self.strategies
            .iter()
            .find_map(|strategy| strategy.apply(&document, self.noise))
            .map(|raw| {
                let clean = remove_byline(&sanitize_text(&raw));
                truncate_chars(&clean, self.max_chars)
            })
            .unwrap_or_default()
    }

    /// Fetch a page and extract its text
    ///
    /// # Errors
    ///
    /// Returns `FetchError::InvalidUrl` for unparseable or unsafe URLs and
    /// any transport error from the fetcher.
    pub async fn try_extract(&self, url: &str) -> Result<String, FetchError> {
        if self.allow_private_hosts {
            url::Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{url}: {e}")))?;
        } else {
            validators::validate_url(url).map_err(FetchError::InvalidUrl)?;
        }

        let html = self.fetcher.get_text(url).await?;
        Ok(self.extract_from_html(&html))
    }

    /// Fetch a page and extract its text, or an empty string on failure
    pub async fn extract(&self, url: &str) -> String {
        match self.try_extract(url).await {
            Ok(text) => {
                if text.is_empty() {
                    tracing::debug!(url = %url, "No article text found");
                }
                text
            }
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Content extraction failed");
                String::new()
            }
        }
    }

    /// Attach extracted text to every article of a crawl result
    ///
    /// Pages are fetched one at a time; order and stats are unchanged.
    pub async fn enrich(&self, result: CrawlResult) -> CrawlResult {
        let (articles, stats) = result.into_parts();
        let mut enriched = Vec::with_capacity(articles.len());

        for article in articles {
            let text = self.extract(article.link()).await;
            enriched.push(article.with_content(text));
        }

        tracing::info!(articles = enriched.len(), "Article content extracted");
        CrawlResult::new(enriched, stats)
    }
}
