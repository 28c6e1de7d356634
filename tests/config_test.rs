//! Configuration loading tests

use std::path::Path;

use dongban::config::{Config, DEFAULT_KEYWORDS, DEFAULT_RELEVANCE_TERMS};
use serial_test::serial;

const ENV_KEYS: &[&str] = &[
    "DONGBAN_KEYWORDS",
    "DONGBAN_RELEVANCE_TERMS",
    "DONGBAN_MAX_RESULTS",
    "DONGBAN_KEYWORD_DELAY_MS",
    "DONGBAN_RATE_LIMIT",
    "DONGBAN_FETCH_CONTENT",
    "DONGBAN_OUTPUT_DIR",
    "DONGBAN_LOG_FORMAT",
];

fn clear_env() {
    for key in ENV_KEYS {
        std::env::remove_var(key);
    }
}

#[test]
fn test_shipped_config_matches_defaults() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config.toml");
    let config = Config::from_file(&path).unwrap();

    config.validate().unwrap();
    assert_eq!(config.keywords, DEFAULT_KEYWORDS);
    assert_eq!(config.relevance.terms, DEFAULT_RELEVANCE_TERMS);
    assert_eq!(config.crawler.max_results_per_keyword, 30);
    assert_eq!(config.crawler.keyword_delay_ms, 2000);
    assert!(config.crawler.user_agent.is_none());
    assert_eq!(config.content.max_chars, 1000);
}

#[test]
fn test_missing_file_is_error() {
    let err = Config::from_file(Path::new("/nonexistent/dongban.toml")).unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"));
}

#[test]
fn test_invalid_toml_is_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(&path, "keywords = [unterminated").unwrap();

    let err = Config::from_file(&path).unwrap_err();
    assert!(err.to_string().contains("Failed to parse TOML"));
}

#[test]
#[serial]
fn test_env_overrides() {
    clear_env();
    std::env::set_var("DONGBAN_KEYWORDS", "하도급 대금, 납품단가 연동제 ,");
    std::env::set_var("DONGBAN_MAX_RESULTS", "12");
    std::env::set_var("DONGBAN_KEYWORD_DELAY_MS", "0");
    std::env::set_var("DONGBAN_FETCH_CONTENT", "true");
    std::env::set_var("DONGBAN_OUTPUT_DIR", "/tmp/dongban");

    let config = Config::from_env().unwrap();
    clear_env();

    assert_eq!(config.keywords, vec!["하도급 대금", "납품단가 연동제"]);
    assert_eq!(config.crawler.max_results_per_keyword, 12);
    assert_eq!(config.crawler.keyword_delay_ms, 0);
    assert!(config.content.enabled);
    assert_eq!(config.output.dir, Path::new("/tmp/dongban"));
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn test_unparseable_env_values_are_ignored() {
    clear_env();
    std::env::set_var("DONGBAN_MAX_RESULTS", "many");
    std::env::set_var("DONGBAN_KEYWORDS", " , ");

    let config = Config::from_env().unwrap();
    clear_env();

    assert_eq!(config.crawler.max_results_per_keyword, 30);
    assert_eq!(config.keywords.len(), DEFAULT_KEYWORDS.len());
}

#[test]
#[serial]
fn test_env_overlays_file_values() {
    clear_env();
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("dongban.toml");
    std::fs::write(&path, "[crawler]\nrequests_per_second = 5\n").unwrap();

    std::env::set_var("DONGBAN_RATE_LIMIT", "0");
    let mut config = Config::from_file(&path).unwrap();
    assert_eq!(config.crawler.requests_per_second, 5);
    config.apply_env();
    clear_env();

    assert_eq!(config.crawler.requests_per_second, 0);
    assert!(config.validate().is_err());
}
