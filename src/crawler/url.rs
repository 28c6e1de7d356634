//! Article URL identity and fetch-safety checks
//!
//! [`normalize`] maps an article link to the key used for cross-keyword
//! deduplication. The identity is lossy on purpose: links that differ only
//! in scheme, query string or fragment collapse to one key, while distinct
//! paths stay distinct.

use url::Url;

/// Normalize a URL to its deduplication identity: `host[:port]/path`
///
/// The scheme, credentials, query string and fragment are dropped and a
/// trailing `/` is removed from the path. Input that does not parse as an
/// absolute URL with a host is returned unchanged.
///
/// # Examples
///
/// ```
/// use dongban::crawler::url::normalize;
///
/// assert_eq!(normalize("https://x.com/a?utm=1"), "x.com/a");
/// assert_eq!(normalize("http://x.com/a/#top"), "x.com/a");
/// assert_eq!(normalize("not a url"), "not a url");
/// ```
pub fn normalize(url: &str) -> String {
    let parsed = match Url::parse(url) {
        Ok(u) => u,
        Err(_) => return url.to_string(),
    };

    let host = match parsed.host_str() {
        Some(h) if !h.is_empty() => h,
        _ => return url.to_string(),
    };

    let mut identity = String::with_capacity(host.len() + parsed.path().len() + 6);
    identity.push_str(host);

    if let Some(port) = parsed.port() {
        identity.push(':');
        identity.push_str(&port.to_string());
    }

    identity.push_str(parsed.path().trim_end_matches('/'));
    identity
}

/// URL validation and security functions
pub mod validators {
    use url::Url;

    /// SSRF prevention - block internal/private IPs
    ///
    /// Blocks dangerous URLs including:
    /// - localhost, 127.0.0.1
    /// - Private IPs: 10.x.x.x, 172.16-31.x.x, 192.168.x.x
    /// - Link-local: 169.254.x.x
    /// - Non-http(s) schemes
    ///
    /// # Examples
    ///
    /// ```
    /// use dongban::crawler::url::validators;
    ///
    /// assert!(!validators::is_safe_url("http://127.0.0.1/admin"));
    /// assert!(!validators::is_safe_url("file:///etc/passwd"));
    /// assert!(validators::is_safe_url("https://www.yna.co.kr/view/AKR2025"));
    /// ```
    pub fn is_safe_url(url: &str) -> bool {
        let parsed = match Url::parse(url) {
            Ok(u) => u,
            Err(_) => return false,
        };

        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return false;
        }

        let host = match parsed.host_str() {
            Some(h) => h,
            None => return false,
        };

        if host == "localhost" || host == "127.0.0.1" || host == "[::1]" || host == "::1" {
            return false;
        }

        !is_private_ip(host)
    }

    /// Check if host is a private IPv4 address
    fn is_private_ip(host: &str) -> bool {
        let octets: Vec<u8> = host.split('.').filter_map(|s| s.parse::<u8>().ok()).collect();

        if octets.len() != 4 || host.split('.').count() != 4 {
            return false;
        }

        matches!(
            (octets[0], octets[1]),
            (10, _) | (127, _) | (192, 168) | (169, 254)
        ) || (octets[0] == 172 && (16..=31).contains(&octets[1]))
    }

    /// Validate that a URL may be fetched
    pub fn validate_url(url: &str) -> Result<(), String> {
        if Url::parse(url).is_err() {
            return Err(format!("Invalid URL format: {url}"));
        }

        if !is_safe_url(url) {
            return Err(format!("Unsafe URL (SSRF risk): {url}"));
        }

        Ok(())
    }
}
