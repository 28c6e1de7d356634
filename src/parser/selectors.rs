//! CSS selectors for article body extraction
//!
//! Body selectors cover the layouts of the major Korean news sites that
//! Google News links to. They are tried in declaration order.

use lazy_static::lazy_static;
use scraper::Selector;

// Helper macro to parse selectors safely at compile time
macro_rules! parse_selector {
    ($s:expr) => {
        Selector::parse($s).expect(concat!("Invalid CSS selector: ", $s))
    };
}

lazy_static! {
    static ref BODY: Vec<Selector> = vec![
        parse_selector!("article"),
        parse_selector!("div#articleBody"),
        parse_selector!("div#article-view-content-div"),
        parse_selector!("div.article_body"),
        parse_selector!("div#dic_area"),
        parse_selector!("div.news_content"),
        parse_selector!("div.article-body"),
        parse_selector!("div#content"),
    ];

    static ref META_DESCRIPTION: Vec<Selector> = vec![
        parse_selector!(r#"meta[name="description"]"#),
        parse_selector!(r#"meta[property="og:description"]"#),
    ];

    // Noise selectors - elements to filter out
    static ref NOISE_ELEMENTS: Vec<Selector> = {
        let selectors = vec![
            "script",
            "style",
            "noscript",
            "iframe",
            "figcaption",     // Image captions
            ".ad_wrap",       // Advertisements
            ".reporter_area", // Reporter info
            ".byline_wrap",   // Byline area
            ".copyright",     // Copyright notice
            ".relation_news", // Related article links
        ];

        selectors
            .iter()
            .filter_map(|s| Selector::parse(s).ok())
            .collect()
    };
}

/// Selectors used by the content extractor
pub struct ContentSelectors {
    pub body: &'static [Selector],
    pub meta_description: &'static [Selector],
    pub noise: &'static [Selector],
}

impl ContentSelectors {
    pub fn new() -> Self {
        Self {
            body: &BODY,
            meta_description: &META_DESCRIPTION,
            noise: &NOISE_ELEMENTS,
        }
    }
}

impl Default for ContentSelectors {
    fn default() -> Self {
        Self::new()
    }
}
