//! Ordered file collection
//!
//! The collection owns every file the user has added, in the order the final
//! document should follow. Items keep their [`ItemId`] for their whole
//! lifetime; reordering never reassigns identities.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use tempfile::TempPath;
use uuid::Uuid;
use crate::error::{Error, Result};
use crate::source::SourceFile;

/// Stable identifier of a collection item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(Uuid);

impl ItemId {
    fn new() -> Self {
        ItemId(Uuid::new_v4())
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// What an item contributes to the output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    /// Placed on a grid page
    Image,
    /// Pages copied verbatim
    Document,
}

impl ItemKind {
    /// Classify a declared media type; anything that is not a PDF is an image
    pub fn from_media_type(media_type: &str) -> Self {
        if media_type.to_ascii_lowercase().contains("pdf") {
            ItemKind::Document
        } else {
            ItemKind::Image
        }
    }
}

/// Local copy of an item's bytes for thumbnail display
///
/// The backing file is deleted when the handle is dropped, which happens
/// whenever its item leaves the collection.
#[derive(Debug)]
pub struct PreviewHandle {
    path: TempPath,
}

impl PreviewHandle {
    fn create(dir: &Path, file: &SourceFile) -> Result<Self> {
        let suffix = Path::new(&file.name)
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();

        let mut temp = tempfile::Builder::new()
            .prefix("receipt-preview-")
            .suffix(&suffix)
            .tempfile_in(dir)?;
        std::io::Write::write_all(&mut temp, &file.bytes)?;

        Ok(Self { path: temp.into_temp_path() })
    }

    /// Location of the preview file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// One user-added file
#[derive(Debug)]
pub struct Item {
    id: ItemId,
    kind: ItemKind,
    name: String,
    media_type: String,
    bytes: Vec<u8>,
    preview: PreviewHandle,
}

impl Item {
    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    /// Original file name, for labeling only
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Media type declared when the file was added
    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn preview(&self) -> &PreviewHandle {
        &self.preview
    }
}

/// Ordered, user-controlled list of items
///
/// Sequence order is output order. All mutation goes through `&mut self`, so a
/// host that shares a collection between threads has to put it behind a lock.
#[derive(Debug)]
pub struct Collection {
    items: Vec<Item>,
    preview_dir: PathBuf,
}

impl Default for Collection {
    fn default() -> Self {
        Self::new()
    }
}

impl Collection {
    /// Empty collection with previews in the system temp directory
    pub fn new() -> Self {
        Self::with_preview_dir(std::env::temp_dir())
    }

    /// Empty collection with previews in `dir`
    pub fn with_preview_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            items: Vec::new(),
            preview_dir: dir.into(),
        }
    }

    /// Append files in the given order, returning their new ids
    ///
    /// Files are classified by declared media type only; content is not
    /// validated here. If a preview cannot be written, nothing from this call
    /// is added.
    pub fn add(&mut self, files: Vec<SourceFile>) -> Result<Vec<ItemId>> {
        let mut added = Vec::with_capacity(files.len());

        for file in files {
            let preview = PreviewHandle::create(&self.preview_dir, &file)?;
            let item = Item {
                id: ItemId::new(),
                kind: ItemKind::from_media_type(&file.media_type),
                name: file.name,
                media_type: file.media_type,
                bytes: file.bytes,
                preview,
            };
            tracing::debug!(id = %item.id, name = %item.name, kind = ?item.kind, "added item");
            added.push(item);
        }

        let ids = added.iter().map(Item::id).collect();
        self.items.extend(added);
        Ok(ids)
    }

    /// Remove the item with `id`, releasing its preview
    ///
    /// Returns `false` if no such item exists.
    pub fn remove(&mut self, id: ItemId) -> bool {
        match self.items.iter().position(|item| item.id == id) {
            Some(index) => {
                let item = self.items.remove(index);
                tracing::debug!(id = %item.id, name = %item.name, "removed item");
                true
            }
            None => false,
        }
    }

    /// Replace the whole ordering
    ///
    /// `new_order` must name every current item exactly once; anything else is
    /// rejected and the collection is left untouched.
    pub fn reorder(&mut self, new_order: &[ItemId]) -> Result<()> {
        if new_order.len() != self.items.len() {
            return Err(Error::InvalidReorder(format!(
                "expected {} ids, got {}",
                self.items.len(),
                new_order.len()
            )));
        }

        let mut seen = HashSet::with_capacity(new_order.len());
        for id in new_order {
            if !seen.insert(*id) {
                return Err(Error::InvalidReorder(format!("duplicate id {}", id)));
            }
            if !self.items.iter().any(|item| item.id == *id) {
                return Err(Error::InvalidReorder(format!("unknown id {}", id)));
            }
        }

        let mut remaining: Vec<Option<Item>> = self.items.drain(..).map(Some).collect();
        for id in new_order {
            if let Some(slot) = remaining
                .iter_mut()
                .find(|slot| slot.as_ref().is_some_and(|item| item.id == *id))
            {
                if let Some(item) = slot.take() {
                    self.items.push(item);
                }
            }
        }

        Ok(())
    }

    /// Move the item at `from` so it ends up at index `to`
    pub fn move_item(&mut self, from: usize, to: usize) -> Result<()> {
        let len = self.items.len();
        if from >= len || to >= len {
            return Err(Error::InvalidReorder(format!(
                "cannot move {} to {} in a collection of {}",
                from, to, len
            )));
        }

        let item = self.items.remove(from);
        self.items.insert(to, item);
        Ok(())
    }

    /// Remove every item, releasing all previews
    pub fn clear(&mut self) {
        tracing::debug!(count = self.items.len(), "clearing collection");
        self.items.clear();
    }

    /// Current ordered snapshot
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn ids(&self) -> Vec<ItemId> {
        self.items.iter().map(Item::id).collect()
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
