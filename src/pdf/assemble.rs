//! Assemble an ordered item list into a single PDF
//!
//! Images are collected into batches of up to four and laid out on 2×2 grid
//! pages; documents have all their pages copied in place. A document always
//! closes the current batch first, so grid pages and copied pages never share
//! a page and images on either side of a document never share a grid.
//!
//! # Example
//!
//! ```no_run
//! use receipt_merge::{Collection, SourceFile};
//! use receipt_merge::pdf::assemble;
//! use std::path::Path;
//!
//! let mut collection = Collection::new();
//! collection.add(vec![
//!     SourceFile::from_path(Path::new("lunch.jpg"))?,
//!     SourceFile::from_path(Path::new("hotel.pdf"))?,
//! ])?;
//!
//! let assembly = assemble(collection.items())?;
//! std::fs::write("receipts.pdf", &assembly.bytes)?;
//! # Ok::<(), receipt_merge::Error>(())
//! ```

use crate::collection::{Item, ItemId, ItemKind};
use crate::error::{Error, Result};
use crate::layout::{GridLayout, CELLS_PER_PAGE};
use super::images::PreparedImage;
use super::import::SourceDocument;
use super::writer::PdfWriter;

/// Options for assembling the output document
#[derive(Debug, Clone, Default)]
pub struct AssembleOptions {
    /// Geometry of image grid pages
    pub layout: GridLayout,
}

/// An item left out of the output, with the reason
#[derive(Debug)]
pub struct SkippedItem {
    pub id: ItemId,
    pub name: String,
    pub error: Error,
}

/// Result of a successful assembly
#[derive(Debug)]
pub struct Assembly {
    /// Serialized PDF
    pub bytes: Vec<u8>,
    /// Number of pages in the output
    pub page_count: usize,
    /// Items that could not be decoded, in input order
    pub skipped: Vec<SkippedItem>,
}

/// Assemble `items` with the default grid layout
pub fn assemble(items: &[Item]) -> Result<Assembly> {
    assemble_with(items, &AssembleOptions::default())
}

/// Assemble `items`, in order, into one PDF
///
/// A file that cannot be decoded is reported in [`Assembly::skipped`] and
/// left out; the rest of the document is still produced. Only a failure to
/// serialize the output is returned as an error. An empty slice yields a
/// valid document with no pages.
pub fn assemble_with(items: &[Item], options: &AssembleOptions) -> Result<Assembly> {
    let mut writer = PdfWriter::new();
    let mut batch: Vec<PreparedImage> = Vec::with_capacity(CELLS_PER_PAGE);
    let mut skipped = Vec::new();

    for item in items {
        tracing::debug!(id = %item.id(), name = %item.name(), kind = ?item.kind(), "processing item");

        let outcome = match item.kind() {
            ItemKind::Image => {
                PreparedImage::decode(item.name(), item.media_type(), item.bytes()).map(|image| {
                    batch.push(image);
                    if batch.len() == CELLS_PER_PAGE {
                        flush(&mut writer, &mut batch, &options.layout);
                    }
                })
            }
            ItemKind::Document => {
                flush(&mut writer, &mut batch, &options.layout);
                SourceDocument::parse(item.name(), item.bytes()).map(|source| {
                    let added = writer.import_pages(source);
                    tracing::debug!(name = %item.name(), pages = added, "copied document pages");
                })
            }
        };

        if let Err(error) = outcome {
            tracing::warn!(id = %item.id(), name = %item.name(), %error, "skipping item");
            skipped.push(SkippedItem {
                id: item.id(),
                name: item.name().to_string(),
                error,
            });
        }
    }

    flush(&mut writer, &mut batch, &options.layout);

    let page_count = writer.page_count();
    let bytes = writer.finish()?;

    tracing::info!(
        items = items.len(),
        pages = page_count,
        skipped = skipped.len(),
        bytes = bytes.len(),
        "assembled document"
    );

    Ok(Assembly {
        bytes,
        page_count,
        skipped,
    })
}

/// Turn the pending batch into a grid page, if there is one
fn flush(writer: &mut PdfWriter, batch: &mut Vec<PreparedImage>, layout: &GridLayout) {
    if batch.is_empty() {
        return;
    }
    let images = std::mem::take(batch);
    let count = images.len();
    writer.add_grid_page(images, layout);
    tracing::debug!(images = count, page = writer.page_count(), "flushed grid page");
}
