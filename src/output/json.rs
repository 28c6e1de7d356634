//! JSON result file

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::models::Article;
use crate::utils::error::OutputError;

/// Write articles as a pretty-printed UTF-8 JSON array
///
/// Hangul and other non-ASCII text is written as-is, not escaped.
pub fn write_json(path: &Path, articles: &[Article]) -> Result<(), OutputError> {
    let file = File::create(path).map_err(|e| OutputError::io(path, e))?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, articles)?;
    writer
        .write_all(b"\n")
        .and_then(|()| writer.flush())
        .map_err(|e| OutputError::io(path, e))?;

    Ok(())
}
