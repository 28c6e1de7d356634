//! Crawl result sinks
//!
//! Results are written as JSON and CSV files next to each other, named from
//! a common stem and an optional local timestamp. Writing is best-effort:
//! a failed file is logged and reported, and the other formats still run.

pub mod csv;
pub mod json;
pub mod summary;

use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone};

use crate::config::OutputConfig;
use crate::error::{DongbanErrorTrait, Error};
use crate::models::Article;
use crate::utils::error::OutputError;

pub use self::csv::write_csv;
pub use self::json::write_json;
pub use self::summary::render_summary;

/// Resolved output file locations
///
/// A disabled format has no path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub json: Option<PathBuf>,
    pub csv: Option<PathBuf>,
}

impl OutputPaths {
    /// Resolve file names from configuration and the crawl time
    ///
    /// With `timestamped` set the stem gets a `_YYYYMMDD_HHMMSS` suffix.
    ///
    /// ```
    /// use chrono::{TimeZone, Utc};
    /// use dongban::config::OutputConfig;
    /// use dongban::output::OutputPaths;
    ///
    /// let now = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
    /// let paths = OutputPaths::from_config(&OutputConfig::default(), now);
    /// assert_eq!(
    ///     paths.json.unwrap().to_str().unwrap(),
    ///     "./dongban_news_articles_20240501_093000.json"
    /// );
    /// ```
    pub fn from_config<Tz>(config: &OutputConfig, now: DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let stem = if config.timestamped {
            format!("{}_{}", config.file_stem, now.format("%Y%m%d_%H%M%S"))
        } else {
            config.file_stem.clone()
        };

        let path_for = |enabled: bool, ext: &str| {
            enabled.then(|| config.dir.join(format!("{stem}.{ext}")))
        };

        Self {
            json: path_for(config.write_json, "json"),
            csv: path_for(config.write_csv, "csv"),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathBuf> {
        self.json.iter().chain(self.csv.iter())
    }
}

type WriteFn = fn(&Path, &[Article]) -> Result<(), OutputError>;

/// Outcome of [`write_all`]
#[derive(Debug, Default)]
pub struct WriteReport {
    pub written: Vec<PathBuf>,
    pub errors: Vec<Error>,
}

impl WriteReport {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Write every enabled format
///
/// Missing output directories are created first. Each failure is logged at
/// error level and collected; none of them stops the remaining writes.
pub fn write_all(paths: &OutputPaths, articles: &[Article]) -> WriteReport {
    let mut report = WriteReport::default();

    let targets: [(Option<&PathBuf>, WriteFn); 2] = [
        (paths.json.as_ref(), write_json),
        (paths.csv.as_ref(), write_csv),
    ];

    for (path, write) in targets {
        let Some(path) = path else {
            continue;
        };

        let result = ensure_parent(path).and_then(|()| write(path, articles));
        match result {
            Ok(()) => {
                tracing::info!(path = %path.display(), articles = articles.len(), "Results written");
                report.written.push(path.clone());
            }
            Err(e) => {
                let err = Error::from(e);
                tracing::error!(
                    path = %path.display(),
                    category = ?err.category(),
                    error = %err,
                    "Failed to write results: {}",
                    err.korean_desc()
                );
                report.errors.push(err);
            }
        }
    }

    report
}

fn ensure_parent(path: &Path) -> Result<(), OutputError> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            std::fs::create_dir_all(dir).map_err(|e| OutputError::io(dir, e))
        }
        _ => Ok(()),
    }
}
