//! Output document builder
//!
//! Pages are appended one at a time, either as freshly drawn grid pages or as
//! pages imported from another document. The page tree and catalog are only
//! written in [`PdfWriter::finish`], once the full list of pages is known.

use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use crate::error::Result;
use crate::layout::{fit_in_cell, GridLayout};
use super::images::PreparedImage;
use super::import::SourceDocument;

/// Incrementally built output PDF
pub struct PdfWriter {
    doc: Document,
    pages_id: ObjectId,
    page_ids: Vec<ObjectId>,
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfWriter {
    pub fn new() -> Self {
        let mut doc = Document::with_version("1.5");
        // Reserve the page tree root so pages can point at it as they are added
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            page_ids: Vec::new(),
        }
    }

    /// Number of pages added so far
    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Add one grid page holding up to four images
    ///
    /// Images fill the cells of `layout` in order; cells without an image stay
    /// empty. Images beyond the number of cells are dropped, so callers batch.
    pub fn add_grid_page(&mut self, images: Vec<PreparedImage>, layout: &GridLayout) -> ObjectId {
        let (page_w, page_h) = layout.page_size_pt();
        let cells = layout.cells();

        let mut xobjects = Dictionary::new();
        let mut content = String::new();

        for (index, (image, cell)) in images.into_iter().zip(cells.iter()).enumerate() {
            let placed = fit_in_cell(cell, image.width as f64, image.height as f64);
            let name = format!("Im{}", index + 1);

            let image_id = image.embed(&mut self.doc);
            xobjects.set(name.as_bytes().to_vec(), Object::Reference(image_id));

            // Image space is the unit square, so the matrix scales it to the
            // placed size and moves it to the placed origin.
            content.push_str("q\n");
            content.push_str(&format!(
                "{:.4} 0 0 {:.4} {:.4} {:.4} cm\n",
                placed.width, placed.height, placed.x, placed.y
            ));
            content.push_str(&format!("/{} Do\n", name));
            content.push_str("Q\n");
        }

        let content_id = self.doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

        let mut resources = Dictionary::new();
        resources.set("XObject", Object::Dictionary(xobjects));

        let mut page = Dictionary::new();
        page.set("Type", Object::Name(b"Page".to_vec()));
        page.set("Parent", Object::Reference(self.pages_id));
        page.set(
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(page_w as f32),
                Object::Real(page_h as f32),
            ]),
        );
        page.set("Resources", Object::Dictionary(resources));
        page.set("Contents", Object::Reference(content_id));

        let page_id = self.doc.add_object(Object::Dictionary(page));
        self.page_ids.push(page_id);
        page_id
    }

    /// Append every page of `source`, in order, returning how many were added
    pub fn import_pages(&mut self, source: SourceDocument) -> usize {
        let (objects, page_ids, max_id) = source.into_parts(self.doc.max_id + 1);

        self.doc.objects.extend(objects);
        // Keep new_object_id() clear of the imported ids
        self.doc.max_id = self.doc.max_id.max(max_id);

        for &page_id in &page_ids {
            if let Ok(Object::Dictionary(dict)) = self.doc.get_object_mut(page_id) {
                dict.set("Parent", Object::Reference(self.pages_id));
            }
        }

        let added = page_ids.len();
        self.page_ids.extend(page_ids);
        added
    }

    /// Write the page tree and catalog, then serialize the document
    pub fn finish(mut self) -> Result<Vec<u8>> {
        let kids: Vec<Object> = self
            .page_ids
            .iter()
            .map(|&id| Object::Reference(id))
            .collect();

        let mut pages_object = Dictionary::new();
        pages_object.set("Type", Object::Name(b"Pages".to_vec()));
        pages_object.set("Count", Object::Integer(self.page_ids.len() as i64));
        pages_object.set("Kids", Object::Array(kids));
        self.doc.objects.insert(self.pages_id, Object::Dictionary(pages_object));

        let catalog_id = self.doc.new_object_id();
        let mut catalog = Dictionary::new();
        catalog.set("Type", Object::Name(b"Catalog".to_vec()));
        catalog.set("Pages", Object::Reference(self.pages_id));
        self.doc.objects.insert(catalog_id, Object::Dictionary(catalog));
        self.doc.trailer.set("Root", Object::Reference(catalog_id));

        let mut info = Dictionary::new();
        info.set(
            "Producer",
            Object::string_literal(concat!("receipt-merge ", env!("CARGO_PKG_VERSION"))),
        );
        let info_id = self.doc.add_object(Object::Dictionary(info));
        self.doc.trailer.set("Info", Object::Reference(info_id));

        self.doc.compress();

        let mut buffer = Vec::new();
        self.doc.save_to(&mut buffer)?;
        Ok(buffer)
    }
}
