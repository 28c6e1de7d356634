//! Topical relevance filter
//!
//! An article is kept when any relevance term occurs in its title or its
//! summary. Matching is a literal substring test on lowercased text: no
//! tokenization and no stemming, so a term inside a longer word still
//! matches. Hangul has no case, so lowercasing leaves it untouched.

use crate::config::DEFAULT_RELEVANCE_TERMS;
use crate::models::Article;

/// Recall-oriented keyword filter over title and summary
#[derive(Debug, Clone)]
pub struct RelevanceFilter {
    terms: Vec<String>,
}

impl RelevanceFilter {
    /// Create a filter; terms are lowercased and blank terms are dropped
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let terms = terms
            .into_iter()
            .map(|t| t.as_ref().trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        Self { terms }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Whether the article mentions at least one term
    pub fn is_relevant(&self, article: &Article) -> bool {
        self.matched_term(article).is_some()
    }

    /// First term found in the title, otherwise in the summary
    pub fn matched_term(&self, article: &Article) -> Option<&str> {
        self.match_text(article.title(), article.summary())
    }

    /// Term matching for raw title and summary text
    pub fn match_text(&self, title: &str, summary: &str) -> Option<&str> {
        let title = title.to_lowercase();
        let summary = summary.to_lowercase();

        self.terms
            .iter()
            .find(|term| title.contains(term.as_str()) || summary.contains(term.as_str()))
            .map(String::as_str)
    }

    /// Keep relevant articles in order, returning them with the drop count
    pub fn retain(&self, articles: Vec<Article>) -> (Vec<Article>, usize) {
        let before = articles.len();
        let kept: Vec<Article> = articles
            .into_iter()
            .filter(|article| match self.matched_term(article) {
                Some(term) => {
                    tracing::trace!(link = %article.link(), term = %term, "Relevant article");
                    true
                }
                None => {
                    tracing::debug!(link = %article.link(), title = %article.title(), "Dropping irrelevant article");
                    false
                }
            })
            .collect();
        let dropped = before - kept.len();
        (kept, dropped)
    }
}

impl Default for RelevanceFilter {
    fn default() -> Self {
        Self::new(DEFAULT_RELEVANCE_TERMS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::feed::FeedEntry;
    use chrono::Utc;

    fn article(title: &str, summary: &str, link: &str) -> Article {
        Article::from_entry(
            FeedEntry {
                title: Some(title.to_string()),
                link: Some(link.to_string()),
                summary: Some(summary.to_string()),
                ..Default::default()
            },
            "k",
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn test_title_match_is_case_insensitive() {
        let filter = RelevanceFilter::new(["foo"]);
        assert!(filter.is_relevant(&article("Foo News", "", "https://a.com/1")));
        assert!(!filter.is_relevant(&article("Bar", "nothing here", "https://a.com/2")));
    }

    #[test]
    fn test_summary_match() {
        let filter = RelevanceFilter::new(["상생"]);
        let a = article("삼성전자 실적 발표", "협력사와 상생 방안 논의", "https://a.com/1");
        assert_eq!(filter.matched_term(&a), Some("상생"));
    }

    #[test]
    fn test_uppercase_terms_are_lowercased() {
        let filter = RelevanceFilter::new(["ESG", "  "]);
        assert_eq!(filter.terms(), &["esg".to_string()]);
        assert!(filter.is_relevant(&article("Esg 경영 확산", "", "https://a.com/1")));
    }

    #[test]
    fn test_substring_inside_longer_word_matches() {
        let filter = RelevanceFilter::new(["납품"]);
        assert!(filter.is_relevant(&article("납품단가 연동제 시행", "", "https://a.com/1")));
    }

    #[test]
    fn test_empty_filter_rejects_everything() {
        let filter = RelevanceFilter::new(Vec::<String>::new());
        assert!(!filter.is_relevant(&article("동반성장", "상생", "https://a.com/1")));
    }

    #[test]
    fn test_retain_preserves_order() {
        let filter = RelevanceFilter::default();
        let articles = vec![
            article("동반성장지수 발표", "", "https://a.com/1"),
            article("프로야구 결과", "홈런", "https://a.com/2"),
            article("대기업 협력사 지원", "", "https://a.com/3"),
        ];
        let (kept, dropped) = filter.retain(articles);
        assert_eq!(dropped, 1);
        let links: Vec<&str> = kept.iter().map(Article::link).collect();
        assert_eq!(links, vec!["https://a.com/1", "https://a.com/3"]);
    }
}
