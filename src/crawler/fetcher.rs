//! HTTP fetcher with rate limiting and EUC-KR encoding support
//!
//! Shared transport for the feed source and the content extractor:
//! - User-Agent rotation
//! - Rate limiting with governor
//! - EUC-KR encoding detection and conversion
//!
//! Requests are made once. Failures surface as [`FetchError`] and callers
//! decide how to degrade.

use crate::config::Config;
use crate::utils::error::FetchError;
use encoding_rs::{EUC_KR, UTF_8};
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use rand::seq::SliceRandom;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, USER_AGENT},
    Client, Response,
};
use std::num::NonZeroU32;
use std::time::Duration;

/// Pool of realistic User-Agent strings for rotation
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.2 Safari/605.1.15",
];

/// Rate-limited HTTP fetcher
pub struct Fetcher {
    /// HTTP client with configured timeout and compression
    client: Client,

    /// Rate limiter to control request frequency
    rate_limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,

    /// Fixed User-Agent; rotates through [`USER_AGENTS`] when unset
    user_agent: Option<String>,
}

impl Fetcher {
    /// Create a fetcher with a 10 second timeout
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Http` if the HTTP client cannot be created
    pub fn new(requests_per_second: u32) -> Result<Self, FetchError> {
        Self::with_config(requests_per_second, Duration::from_secs(10), None)
    }

    /// Create a fetcher with custom configuration
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Http` if the HTTP client cannot be created
    pub fn with_config(
        requests_per_second: u32,
        timeout: Duration,
        user_agent: Option<String>,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .gzip(true)
            .cookie_store(true)
            .build()?;

        let rate = NonZeroU32::new(requests_per_second).unwrap_or(NonZeroU32::MIN);
        let rate_limiter = RateLimiter::direct(Quota::per_second(rate));

        Ok(Self {
            client,
            rate_limiter,
            user_agent,
        })
    }

    /// Create a fetcher from the crawler section of the configuration
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Http` if the HTTP client cannot be created
    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        Self::with_config(
            config.crawler.requests_per_second,
            config.request_timeout(),
            config.crawler.user_agent.clone(),
        )
    }

    /// Fetch a URL and decode the body as text
    ///
    /// # Errors
    ///
    /// - `FetchError::Timeout` when the client timeout fires
    /// - `FetchError::ServerError` for any non-success status
    /// - `FetchError::Http` for other transport failures
    /// - `FetchError::Decode` when the body is neither UTF-8 nor EUC-KR
    pub async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        self.rate_limiter.until_ready().await;

        tracing::debug!(url = %url, "Fetching URL");

        let response = self
            .client
            .get(url)
            .headers(self.build_headers())
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::ServerError(status.as_u16()));
        }

        self.decode_response(response).await
    }

    /// Decode response body handling both UTF-8 and EUC-KR encodings
    async fn decode_response(&self, response: Response) -> Result<String, FetchError> {
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
            .unwrap_or_default();

        let bytes = response.bytes().await.map_err(classify)?;

        self.decode_bytes(&bytes, &content_type)
    }

    /// Decode bytes to a UTF-8 string with encoding detection
    ///
    /// 1. Charset from the Content-Type header
    /// 2. UTF-8
    /// 3. EUC-KR (older Korean news sites)
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Decode` if decoding fails with all strategies
    pub fn decode_bytes(&self, bytes: &[u8], content_type: &str) -> Result<String, FetchError> {
        let content_type = content_type.to_lowercase();

        if content_type.contains("charset=euc-kr") || content_type.contains("charset=ks_c_5601") {
            return decode_with(EUC_KR, bytes);
        }

        if content_type.contains("charset=utf-8") {
            return decode_with(UTF_8, bytes);
        }

        if let Ok(text) = decode_with(UTF_8, bytes) {
            return Ok(text);
        }

        decode_with(EUC_KR, bytes).map_err(|_| {
            FetchError::Decode("Failed to decode content with UTF-8 or EUC-KR".to_string())
        })
    }

    /// Build request headers
    fn build_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();

        let agent = match &self.user_agent {
            Some(agent) => HeaderValue::from_str(agent).ok(),
            None => None,
        };
        headers.insert(
            USER_AGENT,
            agent.unwrap_or_else(|| HeaderValue::from_static(random_user_agent())),
        );

        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "application/rss+xml,application/xml;q=0.9,text/html;q=0.8,*/*;q=0.5",
            ),
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static("ko-KR,ko;q=0.9,en-US;q=0.8,en;q=0.7"),
        );

        headers
    }
}

fn classify(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Http(err)
    }
}

fn decode_with(encoding: &'static encoding_rs::Encoding, bytes: &[u8]) -> Result<String, FetchError> {
    let (cow, _encoding, had_errors) = encoding.decode(bytes);

    if had_errors {
        return Err(FetchError::Decode(format!("{} decoding errors", encoding.name())));
    }

    Ok(cow.into_owned())
}

/// Get a random user agent from the pool
fn random_user_agent() -> &'static str {
    let mut rng = rand::thread_rng();
    USER_AGENTS.choose(&mut rng).copied().unwrap_or(USER_AGENTS[0])
}
