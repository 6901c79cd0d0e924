//! Verbatim page import from source PDFs
//!
//! Pages are copied as objects, not re-rendered. Because every copied page is
//! re-parented under the output's page tree, attributes a page inherits from
//! its old ancestors are copied onto the page itself first.

use std::collections::BTreeMap;
use lopdf::{Document, Object, ObjectId};
use crate::error::{Error, Result};

/// Page attributes that a page may inherit from its ancestors
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Object types that belong to the source's document structure, not its pages
const STRUCTURAL_TYPES: [&[u8]; 4] = [b"Catalog", b"Pages", b"Outlines", b"Outline"];

/// Guards against malformed page trees whose Parent links form a cycle
const MAX_TREE_DEPTH: usize = 64;

/// A parsed source PDF, ready to have its pages copied
#[derive(Debug)]
pub struct SourceDocument {
    doc: Document,
}

impl SourceDocument {
    /// Parse `bytes` as a PDF
    ///
    /// Encrypted documents are rejected since their objects cannot be copied
    /// into an unencrypted output.
    pub fn parse(name: &str, bytes: &[u8]) -> Result<Self> {
        let mut doc = Document::load_mem(bytes).map_err(|e| corrupt(name, e.to_string()))?;

        if doc.is_encrypted() {
            return Err(corrupt(name, "encrypted documents are not supported".to_string()));
        }
        doc.catalog().map_err(|e| corrupt(name, format!("no document catalog: {}", e)))?;

        let pages: Vec<ObjectId> = doc.get_pages().into_values().collect();
        for page_id in pages {
            inherit_page_attributes(&mut doc, page_id)
                .map_err(|e| corrupt(name, e.to_string()))?;
        }

        Ok(Self { doc })
    }

    /// Number of pages that will be imported
    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    /// Renumber objects from `start_id` and split out what the output needs
    ///
    /// Returns the page-related objects, the page ids in page order and the
    /// highest object id in use after renumbering.
    pub(crate) fn into_parts(mut self, start_id: u32) -> (BTreeMap<ObjectId, Object>, Vec<ObjectId>, u32) {
        self.doc.renumber_objects_with(start_id);

        let page_ids: Vec<ObjectId> = self.doc.get_pages().into_values().collect();
        let max_id = self.doc.max_id;

        let objects = self
            .doc
            .objects
            .into_iter()
            .filter(|(_, object)| !is_structural(object))
            .collect();

        (objects, page_ids, max_id)
    }
}

fn corrupt(name: &str, reason: String) -> Error {
    Error::CorruptSourceDocument {
        name: name.to_string(),
        reason,
    }
}

fn is_structural(object: &Object) -> bool {
    let dict = match object {
        Object::Dictionary(dict) => dict,
        _ => return false,
    };
    match dict.get(b"Type").and_then(Object::as_name) {
        Ok(type_name) => STRUCTURAL_TYPES.iter().any(|t| *t == type_name),
        Err(_) => false,
    }
}

/// Copy inheritable attributes missing on the page from its nearest ancestor
fn inherit_page_attributes(doc: &mut Document, page_id: ObjectId) -> Result<()> {
    let page = doc.get_dictionary(page_id)?;
    let mut missing: Vec<&[u8]> = INHERITABLE
        .iter()
        .copied()
        .filter(|key| !page.has(key))
        .collect();
    if missing.is_empty() {
        return Ok(());
    }

    let mut inherited = Vec::new();
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    let mut depth = 0;

    while let Some(parent_id) = parent {
        if missing.is_empty() || depth >= MAX_TREE_DEPTH {
            break;
        }
        let node = match doc.get_dictionary(parent_id) {
            Ok(node) => node,
            Err(_) => break,
        };

        missing.retain(|key| match node.get(key) {
            Ok(value) => {
                inherited.push((key.to_vec(), value.clone()));
                false
            }
            Err(_) => true,
        });

        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
        depth += 1;
    }

    if inherited.is_empty() {
        return Ok(());
    }

    let page = doc.get_dictionary_mut(page_id)?;
    for (key, value) in inherited {
        page.set(key, value);
    }
    Ok(())
}
