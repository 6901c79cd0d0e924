//! Raw input files handed to the collection

use std::path::{Path, PathBuf};
use glob::glob;
use crate::error::{Error, Result};

/// A file as supplied by the user: name, declared media type and content
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Original file name
    pub name: String,
    /// Declared media type (e.g. `image/png`, `application/pdf`)
    pub media_type: String,
    /// File content
    pub bytes: Vec<u8>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    /// Read a file from disk, declaring its media type from the extension
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }

        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let media_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        Ok(Self { name, media_type, bytes })
    }
}

/// Expand glob patterns into file paths
///
/// Patterns keep the order they were given in, since input order becomes page
/// order. Matches of a single pattern are sorted so the expansion is stable.
/// Arguments without glob characters are taken literally.
pub fn expand_patterns(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for pattern in patterns {
        if !(pattern.contains('*') || pattern.contains('?') || pattern.contains('[')) {
            paths.push(PathBuf::from(pattern));
            continue;
        }

        let entries = glob(pattern).map_err(|e| Error::InvalidGlob(format!("{}: {}", pattern, e)))?;
        let mut matched: Vec<PathBuf> = Vec::new();
        for entry in entries {
            match entry {
                Ok(path) => matched.push(path),
                Err(e) => tracing::warn!(%pattern, error = %e, "glob entry unreadable"),
            }
        }

        if matched.is_empty() {
            return Err(Error::NoFilesMatched(pattern.clone()));
        }

        matched.sort();
        paths.extend(matched);
    }

    Ok(paths)
}
