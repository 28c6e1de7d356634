//! CSV result file
//!
//! The file starts with a UTF-8 byte order mark so spreadsheet tools pick
//! the right encoding for Korean text.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::models::Article;
use crate::utils::error::OutputError;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Serialize)]
struct CsvRow<'a> {
    title: &'a str,
    link: &'a str,
    published: &'a str,
    summary: &'a str,
    source: &'a str,
    keyword: &'a str,
    crawled_at: String,
}

impl<'a> From<&'a Article> for CsvRow<'a> {
    fn from(article: &'a Article) -> Self {
        Self {
            title: article.title(),
            link: article.link(),
            published: article.published(),
            summary: article.summary(),
            source: article.source_name(),
            keyword: article.keyword(),
            crawled_at: article.crawled_at().to_rfc3339(),
        }
    }
}

/// Write articles as CSV with a fixed header row
///
/// Columns: `title,link,published,summary,source,keyword,crawled_at`.
/// The header is written even when there are no articles.
pub fn write_csv(path: &Path, articles: &[Article]) -> Result<(), OutputError> {
    let mut file = File::create(path).map_err(|e| OutputError::io(path, e))?;
    file.write_all(UTF8_BOM)
        .map_err(|e| OutputError::io(path, e))?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);

    writer.write_record([
        "title",
        "link",
        "published",
        "summary",
        "source",
        "keyword",
        "crawled_at",
    ])?;
    for article in articles {
        writer.serialize(CsvRow::from(article))?;
    }
    writer.flush().map_err(|e| OutputError::io(path, e))?;

    Ok(())
}
