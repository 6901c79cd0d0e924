//! Receipt Merge Library
//!
//! Collects image and PDF receipts and merges them into a single PDF.
//! This library provides functionality to:
//! - Keep an ordered collection of added files with stable ids
//! - Lay out images four to a page on a 2×2 grid
//! - Copy pages of existing PDFs verbatim, in order
//! - Name and write the merged output
//!
//! # Example
//!
//! ```no_run
//! use receipt_merge::{Collection, SourceFile};
//! use receipt_merge::pdf::assemble;
//!
//! let mut collection = Collection::new();
//! let ids = collection.add(vec![
//!     SourceFile::new("taxi.jpg", "image/jpeg", std::fs::read("taxi.jpg")?),
//!     SourceFile::new("hotel.pdf", "application/pdf", std::fs::read("hotel.pdf")?),
//! ])?;
//! collection.reorder(&[ids[1], ids[0]])?;
//!
//! let assembly = assemble(collection.items())?;
//! for skipped in &assembly.skipped {
//!     eprintln!("skipped {}: {}", skipped.name, skipped.error);
//! }
//! std::fs::write("receipts.pdf", &assembly.bytes)?;
//! # Ok::<(), receipt_merge::Error>(())
//! ```

pub mod collection;
pub mod error;
pub mod layout;
pub mod output;
pub mod pdf;
pub mod source;

// Re-export commonly used items
pub use collection::{Collection, Item, ItemId, ItemKind, PreviewHandle};
pub use error::{Error, Result};
pub use source::SourceFile;
