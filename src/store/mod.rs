//! In-memory entry and category stores
//!
//! [`EntryStore`] owns the live entries (in insertion order, which is also the
//! display and export order) and a recycle bin. Removing an entry moves it to
//! the bin; it can be restored as long as no live entry took its source
//! reference in the meantime.
//!
//! [`CategoryStore`] owns the ordered tag taxonomy.

use std::collections::HashSet;

use tracing::debug;

use crate::{EntryId, ImageEntry};

pub mod categories;
pub mod error;

pub use categories::CategoryStore;
pub use error::StoreError;

type Result<T> = std::result::Result<T, StoreError>;

/// Live entries plus the recycle bin
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryStore {
    live: Vec<ImageEntry>,
    recycled: Vec<ImageEntry>,
}

impl EntryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from persisted parts
    #[must_use]
    pub fn from_parts(live: Vec<ImageEntry>, recycled: Vec<ImageEntry>) -> Self {
        let mut store = Self::new();
        for entry in live {
            if let Err(e) = store.add(entry) {
                debug!("dropping persisted entry: {e}");
            }
        }
        store.recycled = recycled;
        store
    }

    /// Append an entry to the live set
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Duplicate` if a live entry has the same source
    /// reference. The existing entry is left untouched.
    pub fn add(&mut self, entry: ImageEntry) -> Result<EntryId> {
        if self.contains_source(&entry.source_ref) {
            return Err(StoreError::Duplicate(entry.source_ref));
        }
        let id = entry.id.clone();
        self.live.push(entry);
        Ok(id)
    }

    /// Move a live entry into the recycle bin
    ///
    /// A previously recycled entry with the same id is replaced.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no live entry has this id.
    pub fn remove(&mut self, id: &EntryId) -> Result<()> {
        let pos = self.position(id).ok_or_else(|| StoreError::NotFound(id.clone()))?;
        let entry = self.live.remove(pos);
        self.recycled.retain(|e| e.id != entry.id);
        self.recycled.push(entry);
        Ok(())
    }

    /// Move a recycled entry back to the end of the live set
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the bin has no such entry, or
    /// `StoreError::Duplicate` if its source reference is live again.
    pub fn restore(&mut self, id: &EntryId) -> Result<()> {
        let pos = self
            .recycled
            .iter()
            .position(|e| &e.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        if self.contains_source(&self.recycled[pos].source_ref) {
            return Err(StoreError::Duplicate(self.recycled[pos].source_ref.clone()));
        }
        let entry = self.recycled.remove(pos);
        self.live.push(entry);
        Ok(())
    }

    /// Restore every recycled entry that does not collide with a live one
    ///
    /// Returns the ids that were restored; colliding entries stay in the bin.
    pub fn restore_all(&mut self) -> Vec<EntryId> {
        let ids: Vec<EntryId> = self.recycled.iter().map(|e| e.id.clone()).collect();
        ids.into_iter()
            .filter(|id| self.restore(id).is_ok())
            .collect()
    }

    /// Drop all recycled entries, returning how many were purged
    pub fn purge_recycled(&mut self) -> usize {
        let count = self.recycled.len();
        self.recycled.clear();
        count
    }

    /// Replace an entry's tags verbatim
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no live entry has this id.
    pub fn set_tags(&mut self, id: &EntryId, tags: Vec<String>) -> Result<()> {
        let entry = self.get_mut(id).ok_or_else(|| StoreError::NotFound(id.clone()))?;
        entry.tags = tags;
        Ok(())
    }

    /// Live entries in store order, optionally restricted to `filter`
    #[must_use]
    pub fn list(&self, filter: Option<&HashSet<EntryId>>) -> Vec<&ImageEntry> {
        self.live
            .iter()
            .filter(|e| filter.is_none_or(|ids| ids.contains(&e.id)))
            .collect()
    }

    /// All live entries in store order
    #[must_use]
    pub fn entries(&self) -> &[ImageEntry] {
        &self.live
    }

    /// Recycled entries, oldest removal first
    #[must_use]
    pub fn recycled(&self) -> &[ImageEntry] {
        &self.recycled
    }

    #[must_use]
    pub fn get(&self, id: &EntryId) -> Option<&ImageEntry> {
        self.live.iter().find(|e| &e.id == id)
    }

    pub fn get_mut(&mut self, id: &EntryId) -> Option<&mut ImageEntry> {
        self.live.iter_mut().find(|e| &e.id == id)
    }

    #[must_use]
    pub fn find_by_source(&self, source_ref: &str) -> Option<&ImageEntry> {
        self.live.iter().find(|e| e.source_ref == source_ref)
    }

    /// Resolve user input (an id or a full source reference) to a live id
    #[must_use]
    pub fn resolve(&self, key: &str) -> Option<EntryId> {
        self.live
            .iter()
            .find(|e| e.id.as_str() == key || e.source_ref == key)
            .map(|e| e.id.clone())
    }

    /// Same as [`resolve`](Self::resolve), looking in the recycle bin
    #[must_use]
    pub fn resolve_recycled(&self, key: &str) -> Option<EntryId> {
        self.recycled
            .iter()
            .find(|e| e.id.as_str() == key || e.source_ref == key)
            .map(|e| e.id.clone())
    }

    #[must_use]
    pub fn contains_source(&self, source_ref: &str) -> bool {
        self.live.iter().any(|e| e.source_ref == source_ref)
    }

    /// Number of live entries
    #[must_use]
    pub fn count(&self) -> usize {
        self.live.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Drop every live entry; the recycle bin is kept
    pub fn clear_live(&mut self) {
        self.live.clear();
    }

    fn position(&self, id: &EntryId) -> Option<usize> {
        self.live.iter().position(|e| &e.id == id)
    }
}
