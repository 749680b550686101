//! Report file output.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::debug;

use crate::error::AppResult;

/// `<dir>/YYYY-MM-DD.md` for the given report date.
pub fn report_path(dir: &Path, date: NaiveDate) -> PathBuf {
    dir.join(format!("{}.md", date.format("%Y-%m-%d")))
}

/// Writes the report, creating the directory if needed and replacing any
/// report already written for the same date.
pub fn write_report(dir: &Path, date: NaiveDate, contents: &str) -> AppResult<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = report_path(dir, date);
    std::fs::write(&path, contents)?;
    debug!(path = %path.display(), bytes = contents.len(), "Wrote report");
    Ok(path)
}
