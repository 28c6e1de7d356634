//! Human-readable run summary printed after a crawl

use std::fmt::Write;

use crate::models::CrawlResult;
use crate::utils::{normalize_whitespace, truncate_text};

/// Articles listed in the preview section
pub const PREVIEW_LEN: usize = 5;

const PREVIEW_TITLE_CHARS: usize = 80;

/// Render the end-of-run report
///
/// Lists the total, per-keyword counts in descending order, and the first
/// few articles with their source, link and publication time.
pub fn render_summary(result: &CrawlResult) -> String {
    let stats = result.stats();
    let mut out = String::new();

    // Writing to a String cannot fail
    let _ = writeln!(out, "총 {}개의 기사를 수집했습니다.", result.len());
    let _ = writeln!(
        out,
        "키워드 {}개 (실패 {}), 항목 {}개, 중복 {}개, 무관 {}개 제외, {}ms",
        stats.keywords_total,
        stats.keywords_failed,
        stats.entries_fetched,
        stats.duplicates_dropped,
        stats.irrelevant_dropped,
        stats.duration_ms,
    );

    if result.is_empty() {
        return out;
    }

    let _ = writeln!(out, "\n키워드별 기사 수:");
    for (keyword, count) in result.keyword_counts() {
        let _ = writeln!(out, "- {keyword}: {count}개");
    }

    let _ = writeln!(out, "\n수집된 기사 미리보기:");
    for (i, article) in result.iter().take(PREVIEW_LEN).enumerate() {
        let title = truncate_text(&normalize_whitespace(article.title()), PREVIEW_TITLE_CHARS);
        let _ = writeln!(out, "{}. {title}", i + 1);
        let _ = writeln!(out, "   출처: {}", article.source_name());
        let _ = writeln!(out, "   링크: {}", article.link());
        let _ = writeln!(out, "   발행일: {}", article.published_display());
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::feed::FeedEntry;
    use crate::models::{Article, CrawlStats};
    use chrono::Utc;

    fn article(n: usize, keyword: &str) -> Article {
        let entry = FeedEntry {
            title: Some(format!("상생협력 기사 {n}")),
            link: Some(format!("https://news.example.com/{n}")),
            published: Some("Tue, 14 Oct 2025 06:00:00 GMT".to_string()),
            summary: None,
            source: Some("한국경제".to_string()),
            media_url: None,
        };
        Article::from_entry(entry, keyword, Utc::now()).unwrap()
    }

    #[test]
    fn test_empty_summary() {
        let text = render_summary(&CrawlResult::default());
        assert!(text.starts_with("총 0개의 기사를 수집했습니다."));
        assert!(!text.contains("미리보기"));
    }

    #[test]
    fn test_summary_counts_and_preview() {
        let articles: Vec<Article> = (0..7)
            .map(|n| article(n, if n < 2 { "동반성장" } else { "상생협력" }))
            .collect();
        let stats = CrawlStats {
            keywords_total: 2,
            articles_kept: 7,
            ..Default::default()
        };
        let text = render_summary(&CrawlResult::new(articles, stats));

        assert!(text.contains("총 7개의 기사"));
        let top = text.find("- 상생협력: 5개").unwrap();
        let second = text.find("- 동반성장: 2개").unwrap();
        assert!(top < second);

        assert!(text.contains("5. 상생협력 기사 4"));
        assert!(!text.contains("6. "));
        assert!(text.contains("발행일: 2025-10-14 06:00:00"));
        assert!(text.contains("출처: 한국경제"));
    }
}
