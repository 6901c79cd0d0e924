//! Output file naming and delivery

use std::path::{Path, PathBuf};
use chrono::NaiveDate;
use crate::error::Result;

/// Prefix of the default, date-stamped output name
pub const DEFAULT_NAME_PREFIX: &str = "expense-report";

/// Default output name for `date`, e.g. `expense-report-2024-11-20`
pub fn default_file_name(date: NaiveDate) -> String {
    format!("{}-{}", DEFAULT_NAME_PREFIX, date.format("%Y-%m-%d"))
}

/// Append `.pdf` unless the name already ends with it
pub fn ensure_pdf_extension(name: &str) -> String {
    if name.ends_with(".pdf") {
        name.to_string()
    } else {
        format!("{}.pdf", name)
    }
}

/// The file name to save to: the user's choice, or the dated default
///
/// Blank names fall back to the default.
pub fn resolve_output_name(requested: Option<&str>, date: NaiveDate) -> String {
    match requested.map(str::trim) {
        Some(name) if !name.is_empty() => ensure_pdf_extension(name),
        _ => ensure_pdf_extension(&default_file_name(date)),
    }
}

/// Write the assembled bytes to `path`, creating parent directories
pub fn write_output(path: &Path, bytes: &[u8]) -> Result<PathBuf> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, bytes)?;
    Ok(path.to_path_buf())
}
