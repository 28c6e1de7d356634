//! Text cleanup for extracted article bodies and feed summaries
//!
//! Google News summaries arrive as escaped HTML fragments and article pages
//! carry invisible characters and reporter bylines; these helpers turn both
//! into plain text.

use regex::Regex;
use std::sync::LazyLock;

static WHITESPACE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]+").unwrap());

static MULTI_NEWLINE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());

static BYLINE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)(^.*기자\s*=.*$|^.*기자$|\S+@\S+\.\S+)").unwrap());

/// Clean extracted text
///
/// Removes zero-width and control characters, decodes common entities,
/// collapses runs of spaces, trims every line and squeezes blank lines.
///
/// ```
/// use dongban::parser::sanitize::sanitize_text;
///
/// let clean = sanitize_text("상생\u{200B}협력&nbsp;&amp; 동반성장  \n\n\n\n끝");
/// assert_eq!(clean, "상생협력 & 동반성장\n\n끝");
/// ```
pub fn sanitize_text(text: &str) -> String {
    let text = remove_invisible(text);
    let text = decode_html_entities(&text);
    let text = WHITESPACE_REGEX.replace_all(&text, " ");
    let text = text
        .lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n");
    let text = MULTI_NEWLINE_REGEX.replace_all(&text, "\n\n");

    text.trim().to_string()
}

/// Drop zero-width marks, BOMs, and control characters except `\n` and `\t`
pub fn remove_invisible(text: &str) -> String {
    text.chars()
        .filter(|c| {
            !matches!(*c,
                '\u{200B}'..='\u{200F}' |
                '\u{2028}'..='\u{202F}' |
                '\u{FEFF}'
            )
        })
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect()
}

/// Decode common HTML entities to plain text
pub fn decode_html_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&#xa0;", " ")
        .replace("&#160;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Remove markup tags, keeping their text
pub fn strip_html_tags(html: &str) -> String {
    TAG_REGEX.replace_all(html, " ").to_string()
}

/// Remove reporter bylines and e-mail addresses
pub fn remove_byline(text: &str) -> String {
    BYLINE_REGEX.replace_all(text, "").trim().to_string()
}

/// Check if text has meaningful content (not just whitespace)
pub fn has_content(text: &str) -> bool {
    !text.trim().is_empty()
}

/// Keep at most `max_chars` characters
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}
