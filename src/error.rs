//! Error types for the receipt merge library

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the receipt merge library
#[derive(Error, Debug)]
pub enum Error {
    /// PDF processing error
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An image item that neither the PNG nor the JPEG decoder accepts
    #[error("Unsupported image format in {name}: {reason}")]
    UnsupportedImageFormat { name: String, reason: String },

    /// A document item that cannot be parsed or copied
    #[error("Corrupt source document {name}: {reason}")]
    CorruptSourceDocument { name: String, reason: String },

    /// Reorder payload is not a permutation of the current items
    #[error("Invalid reorder: {0}")]
    InvalidReorder(String),

    /// File not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Invalid glob pattern
    #[error("Invalid glob pattern: {0}")]
    InvalidGlob(String),

    /// No files matched pattern
    #[error("No files found matching pattern: {0}")]
    NoFilesMatched(String),

    /// General error
    #[error("{0}")]
    General(String),
}
