//! Configuration management for the dongban crawler
//!
//! Configuration is read from a TOML file, from `DONGBAN_*` environment
//! variables, or taken from defaults. Command-line flags are applied on top
//! by the binary.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Search keywords used when none are configured
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "동반성장 지수 기업 활동",
    "동반성장위원회 실적평가 기업",
    "공정거래협약 이행평가 기업",
    "중소기업 지원 대기업 뉴스",
    "공정거래 준수 기업 사례",
];

/// Relevance vocabulary, deliberately wider than the keywords
pub const DEFAULT_RELEVANCE_TERMS: &[&str] = &[
    "동반성장",
    "상생",
    "공정거래",
    "하도급",
    "협력사",
    "협력업체",
    "중소기업",
    "대기업",
    "동반위",
    "공정위",
    "납품",
    "실적평가",
    "이행평가",
];

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Search keywords, queried in order
    pub keywords: Vec<String>,

    /// Crawler configuration
    pub crawler: CrawlerConfig,

    /// Feed endpoint configuration
    pub feed: FeedConfig,

    /// Relevance filter configuration
    pub relevance: RelevanceConfig,

    /// Full-text extraction configuration
    pub content: ContentConfig,

    /// Output configuration
    pub output: OutputConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Crawler-specific configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Entries consumed per keyword query
    pub max_results_per_keyword: usize,

    /// Pause between keyword queries in milliseconds
    pub keyword_delay_ms: u64,

    /// Request timeout in seconds
    pub request_timeout_secs: u64,

    /// Rate limit for outbound requests (requests per second)
    pub requests_per_second: u32,

    /// User agent override; a rotating browser pool is used when unset
    pub user_agent: Option<String>,
}

/// Google News RSS search endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Search endpoint URL
    pub base_url: String,

    /// Interface language (`hl`)
    pub language: String,

    /// Edition region (`gl`)
    pub region: String,

    /// Value of the `num` query parameter
    pub num: usize,
}

/// Relevance filter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RelevanceConfig {
    /// Terms matched case-insensitively against title and summary
    pub terms: Vec<String>,
}

/// Full-text extraction configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Fetch article pages and attach extracted text
    pub enabled: bool,

    /// Maximum characters kept from extracted text
    pub max_chars: usize,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving result files
    pub dir: PathBuf,

    /// File name stem shared by the JSON and CSV outputs
    pub file_stem: String,

    /// Append `_%Y%m%d_%H%M%S` to the file stem
    pub timestamped: bool,

    /// Write the JSON document
    pub write_json: bool,

    /// Write the CSV document
    pub write_csv: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// `DONGBAN_KEYWORDS` and `DONGBAN_RELEVANCE_TERMS` are comma-separated.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env();
        Ok(config)
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        Ok(config)
    }

    /// Overlay `DONGBAN_*` environment variables onto this configuration
    pub fn apply_env(&mut self) {
        if let Some(keywords) = env_string("DONGBAN_KEYWORDS") {
            let keywords = crate::utils::split_keywords(&keywords);
            if !keywords.is_empty() {
                self.keywords = keywords;
            }
        }

        if let Some(terms) = env_string("DONGBAN_RELEVANCE_TERMS") {
            let terms = crate::utils::split_keywords(&terms);
            if !terms.is_empty() {
                self.relevance.terms = terms;
            }
        }

        if let Some(v) = env_parse("DONGBAN_MAX_RESULTS") {
            self.crawler.max_results_per_keyword = v;
        }
        if let Some(v) = env_parse("DONGBAN_KEYWORD_DELAY_MS") {
            self.crawler.keyword_delay_ms = v;
        }
        if let Some(v) = env_parse("DONGBAN_REQUEST_TIMEOUT") {
            self.crawler.request_timeout_secs = v;
        }
        if let Some(v) = env_parse("DONGBAN_RATE_LIMIT") {
            self.crawler.requests_per_second = v;
        }
        if let Some(v) = env_string("DONGBAN_USER_AGENT") {
            self.crawler.user_agent = Some(v);
        }

        if let Some(v) = env_string("DONGBAN_FEED_URL") {
            self.feed.base_url = v;
        }
        if let Some(v) = env_string("DONGBAN_FEED_LANGUAGE") {
            self.feed.language = v;
        }
        if let Some(v) = env_string("DONGBAN_FEED_REGION") {
            self.feed.region = v;
        }

        if let Some(v) = env_parse("DONGBAN_FETCH_CONTENT") {
            self.content.enabled = v;
        }

        if let Some(v) = env_string("DONGBAN_OUTPUT_DIR") {
            self.output.dir = PathBuf::from(v);
        }

        if let Some(v) = env_string("DONGBAN_LOG_LEVEL") {
            self.logging.level = v;
        }
        if let Some(v) = env_string("DONGBAN_LOG_FORMAT") {
            self.logging.format = v;
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.keywords.iter().all(|k| k.trim().is_empty()) {
            anyhow::bail!("at least one keyword must be configured");
        }

        if self.crawler.max_results_per_keyword == 0 {
            anyhow::bail!("max_results_per_keyword must be greater than 0");
        }

        if self.crawler.requests_per_second == 0 {
            anyhow::bail!("requests_per_second must be greater than 0");
        }

        if self.relevance.terms.iter().all(|t| t.trim().is_empty()) {
            anyhow::bail!("at least one relevance term must be configured");
        }

        if self.content.max_chars == 0 {
            anyhow::bail!("content.max_chars must be greater than 0");
        }

        if !matches!(self.logging.format.as_str(), "text" | "json") {
            anyhow::bail!(
                "unknown log format '{}', expected text or json",
                self.logging.format
            );
        }

        Ok(())
    }

    /// Get request timeout as Duration
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.crawler.request_timeout_secs)
    }

    /// Get the inter-keyword pause as Duration
    #[must_use]
    pub fn keyword_delay(&self) -> Duration {
        Duration::from_millis(self.crawler.keyword_delay_ms)
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env_string(key).and_then(|v| v.trim().parse::<T>().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            keywords: DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            crawler: CrawlerConfig::default(),
            feed: FeedConfig::default(),
            relevance: RelevanceConfig::default(),
            content: ContentConfig::default(),
            output: OutputConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_results_per_keyword: 30,
            keyword_delay_ms: 2000,
            request_timeout_secs: 10,
            requests_per_second: 2,
            user_agent: None,
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: String::from("https://news.google.com/rss/search"),
            language: String::from("ko"),
            region: String::from("KR"),
            num: 100,
        }
    }
}

impl Default for RelevanceConfig {
    fn default() -> Self {
        Self {
            terms: DEFAULT_RELEVANCE_TERMS
                .iter()
                .map(|t| t.to_string())
                .collect(),
        }
    }
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_chars: 1000,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            file_stem: String::from("dongban_news_articles"),
            timestamped: true,
            write_json: true,
            write_csv: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}
