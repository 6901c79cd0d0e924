//! PDF assembly module

pub mod assemble;
pub mod images;
pub mod import;
pub mod metadata;
pub mod writer;

// Re-export commonly used items
pub use assemble::{assemble, assemble_with, AssembleOptions, Assembly, SkippedItem};
pub use images::PreparedImage;
pub use import::SourceDocument;
pub use metadata::{count_pages, count_pages_in_bytes, extract_metadata, extract_metadata_from_bytes, PdfMetadata};
pub use writer::PdfWriter;
