//! The persisted curation session
//!
//! A [`Session`] owns the entry store, the category store and the backups,
//! and writes all of them through its [`KeyValueStore`] after every
//! successful mutation. Read-only operations never write.

use std::collections::HashSet;
use std::path::PathBuf;

use rand::Rng;
use tracing::{debug, info};

use crate::backup::{self, BackupError, BackupManager};
use crate::mutate::{self, Placement};
use crate::persist::{self, BACKUPS, CATEGORIES, IMAGES, KeyValueStore, RECYCLED};
use crate::query;
use crate::scrape::{self, MergeOutcome, ScrapeOptions, ScrapeRules, TagScrapeResult, TagScraper};
use crate::stats::{self, ProjectStats};
use crate::store::{CategoryStore, EntryStore};
use crate::transfer::{self, ExportReport, ExportTarget, ImageSource, ImportOptions, ImportReport};
use crate::{CuratrError, EntryId, ImageEntry, TagCategory};

type Result<T> = std::result::Result<T, CuratrError>;

pub struct Session<S: KeyValueStore> {
    store: S,
    entries: EntryStore,
    categories: CategoryStore,
    backups: BackupManager,
}

impl<S: KeyValueStore> Session<S> {
    /// Load the session from `store`
    ///
    /// Keys that are absent (first run) start empty and are written back
    /// before returning.
    ///
    /// # Errors
    ///
    /// Returns `CuratrError::PersistError` if a value cannot be read or decoded,
    /// or the initial values cannot be written.
    pub fn open(store: S) -> Result<Self> {
        let images: Option<Vec<ImageEntry>> = persist::load(&store, IMAGES)?;
        let recycled: Option<Vec<ImageEntry>> = persist::load(&store, RECYCLED)?;
        let categories: Option<Vec<TagCategory>> = persist::load(&store, CATEGORIES)?;
        let backups: Option<Vec<backup::Backup>> = persist::load(&store, BACKUPS)?;
        let first_run = images.is_none() || recycled.is_none() || categories.is_none() || backups.is_none();

        let session = Self {
            entries: EntryStore::from_parts(images.unwrap_or_default(), recycled.unwrap_or_default()),
            categories: CategoryStore::from_categories(categories.unwrap_or_default()),
            backups: BackupManager::from_backups(backups.unwrap_or_default()),
            store,
        };
        if first_run {
            debug!("initializing missing session keys");
            session.save()?;
        }
        debug!(
            "loaded session: {} entries, {} recycled, {} categories, {} backups",
            session.entries.count(),
            session.entries.recycled().len(),
            session.categories.len(),
            session.backups.len()
        );
        Ok(session)
    }

    /// Write the full session to the store
    ///
    /// # Errors
    ///
    /// Returns `CuratrError::PersistError` if any value cannot be written.
    pub fn save(&self) -> Result<()> {
        persist::save(&self.store, IMAGES, &self.entries.entries())?;
        persist::save(&self.store, RECYCLED, &self.entries.recycled())?;
        persist::save(&self.store, CATEGORIES, &self.categories.list())?;
        persist::save(&self.store, BACKUPS, &self.backups.backups())?;
        debug!("session saved");
        Ok(())
    }

    fn commit<T>(&self, value: T) -> Result<T> {
        self.save()?;
        Ok(value)
    }

    #[must_use]
    pub fn entries(&self) -> &EntryStore {
        &self.entries
    }

    #[must_use]
    pub fn categories(&self) -> &CategoryStore {
        &self.categories
    }

    #[must_use]
    pub fn backups(&self) -> &BackupManager {
        &self.backups
    }

    /// Id of the live entry named by an id or a source reference
    ///
    /// # Errors
    ///
    /// Returns `CuratrError::InvalidInput` if nothing live matches.
    pub fn resolve(&self, key: &str) -> Result<EntryId> {
        self.entries
            .resolve(key)
            .ok_or_else(|| CuratrError::InvalidInput(format!("No entry matches '{key}'")))
    }

    /// Like [`Session::resolve`], for the recycle bin
    ///
    /// # Errors
    ///
    /// Returns `CuratrError::InvalidInput` if nothing recycled matches.
    pub fn resolve_recycled(&self, key: &str) -> Result<EntryId> {
        self.entries
            .resolve_recycled(key)
            .ok_or_else(|| CuratrError::InvalidInput(format!("No recycled entry matches '{key}'")))
    }

    // Entries

    /// # Errors
    ///
    /// Returns `StoreError::Duplicate` if the source reference is already live.
    pub fn add_entry(&mut self, entry: ImageEntry) -> Result<EntryId> {
        let id = self.entries.add(entry)?;
        self.commit(id)
    }

    /// Move an entry to the recycle bin
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the entry is not live.
    pub fn remove_entry(&mut self, id: &EntryId) -> Result<()> {
        self.entries.remove(id)?;
        self.commit(())
    }

    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the entry is not recycled, or
    /// `StoreError::Duplicate` if its source reference is live again.
    pub fn restore_entry(&mut self, id: &EntryId) -> Result<()> {
        self.entries.restore(id)?;
        self.commit(())
    }

    /// Restore every recycled entry that does not clash with a live one
    ///
    /// # Errors
    ///
    /// Returns `CuratrError::PersistError` if the session cannot be saved.
    pub fn restore_all_recycled(&mut self) -> Result<Vec<EntryId>> {
        let restored = self.entries.restore_all();
        self.commit(restored)
    }

    /// # Errors
    ///
    /// Returns `CuratrError::PersistError` if the session cannot be saved.
    pub fn purge_recycled(&mut self) -> Result<usize> {
        let purged = self.entries.purge_recycled();
        info!("purged {purged} recycled entries");
        self.commit(purged)
    }

    /// Replace an entry's tags verbatim
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the entry is not live.
    pub fn set_tags(&mut self, id: &EntryId, tags: Vec<String>) -> Result<()> {
        self.entries.set_tags(id, tags)?;
        self.commit(())
    }

    // Tag mutations

    /// # Errors
    ///
    /// Returns `MutateError` if the tags or the selection are invalid; nothing
    /// changes in that case.
    pub fn add_tags(&mut self, selection: &[EntryId], tags: &[String], placement: Placement) -> Result<usize> {
        let changed = mutate::apply_add_tags(&mut self.entries, selection, tags, placement)?;
        self.commit(changed)
    }

    /// [`Session::add_tags`] with an explicit random source
    ///
    /// # Errors
    ///
    /// See [`Session::add_tags`].
    pub fn add_tags_with_rng<R: Rng + ?Sized>(
        &mut self,
        selection: &[EntryId],
        tags: &[String],
        placement: Placement,
        rng: &mut R,
    ) -> Result<usize> {
        let changed = mutate::apply_add_tags_with_rng(&mut self.entries, selection, tags, placement, rng)?;
        self.commit(changed)
    }

    /// # Errors
    ///
    /// Returns `MutateError` if the tags or the selection are invalid.
    pub fn remove_tags(&mut self, selection: &[EntryId], tags: &[String]) -> Result<usize> {
        let changed = mutate::apply_remove_tags(&mut self.entries, selection, tags)?;
        self.commit(changed)
    }

    // Queries

    /// Ids of the live entries matching a query string
    #[must_use]
    pub fn query(&self, text: &str) -> HashSet<EntryId> {
        query::evaluate(text, self.entries.entries())
    }

    #[must_use]
    pub fn select_by_tags(&self, with_all: &[String], without_any: &[String]) -> HashSet<EntryId> {
        mutate::select_by_tags(self.entries.entries(), with_all, without_any)
    }

    /// Live entries in store order, optionally restricted to `filter`
    #[must_use]
    pub fn list(&self, filter: Option<&HashSet<EntryId>>) -> Vec<&ImageEntry> {
        self.entries.list(filter)
    }

    // Backups

    /// Snapshot entries and categories, returning the label used
    ///
    /// Without a label the current local time is used.
    ///
    /// # Errors
    ///
    /// Returns `CuratrError::PersistError` if the session cannot be saved.
    pub fn capture_backup(&mut self, label: Option<&str>) -> Result<String> {
        let label = label.map_or_else(backup::timestamp_label, str::to_string);
        self.backups.capture(&label, &self.entries, &self.categories);
        self.commit(label)
    }

    /// Replace live entries and categories with a backup's contents
    ///
    /// # Errors
    ///
    /// Returns `BackupError::NotFound` if no backup has this label.
    pub fn restore_backup(&mut self, label: &str) -> Result<()> {
        self.backups.restore(label, &mut self.entries, &mut self.categories)?;
        self.commit(())
    }

    /// # Errors
    ///
    /// Returns `BackupError::NotFound` if no backup has this label.
    pub fn delete_backup(&mut self, label: &str) -> Result<()> {
        if !self.backups.delete(label) {
            return Err(BackupError::NotFound(label.to_string()).into());
        }
        self.commit(())
    }

    // Categories

    /// Append a category, returning its position
    ///
    /// # Errors
    ///
    /// Returns `CuratrError::PersistError` if the session cannot be saved.
    pub fn add_category(&mut self, category: TagCategory) -> Result<usize> {
        let index = self.categories.add(category);
        self.commit(index)
    }

    /// # Errors
    ///
    /// Returns `StoreError::CategoryNotFound` for an invalid position.
    pub fn remove_category(&mut self, index: usize) -> Result<TagCategory> {
        let removed = self.categories.remove(index)?;
        self.commit(removed)
    }

    /// # Errors
    ///
    /// Returns `StoreError::CategoryNotFound` for an invalid position.
    pub fn rename_category(&mut self, index: usize, name: &str) -> Result<()> {
        self.categories.rename(index, name)?;
        self.commit(())
    }

    /// # Errors
    ///
    /// Returns `StoreError::CategoryNotFound` for an invalid position.
    pub fn set_category_emoji(&mut self, index: usize, emoji: &str) -> Result<()> {
        self.categories.set_emoji(index, emoji)?;
        self.commit(())
    }

    /// # Errors
    ///
    /// Returns `StoreError::CategoryNotFound` for an invalid position.
    pub fn add_category_tags(&mut self, index: usize, tags: &[String]) -> Result<usize> {
        let added = self.categories.add_tags(index, tags)?;
        self.commit(added)
    }

    /// # Errors
    ///
    /// Returns `StoreError::CategoryNotFound` for an invalid position.
    pub fn remove_category_tag(&mut self, index: usize, tag: &str) -> Result<bool> {
        let removed = self.categories.remove_tag(index, tag)?;
        self.commit(removed)
    }

    /// # Errors
    ///
    /// Returns `StoreError::CategoryNotFound` for an invalid position.
    pub fn clear_category_tags(&mut self, index: usize) -> Result<()> {
        self.categories.clear_tags(index)?;
        self.commit(())
    }

    /// Swap a category with the one above it, returning its new position
    ///
    /// # Errors
    ///
    /// Returns `StoreError::CategoryNotFound` for an invalid position.
    pub fn move_category_up(&mut self, index: usize) -> Result<usize> {
        let moved = self.categories.move_up(index)?;
        self.commit(moved)
    }

    /// Swap a category with the one below it, returning its new position
    ///
    /// # Errors
    ///
    /// Returns `StoreError::CategoryNotFound` for an invalid position.
    pub fn move_category_down(&mut self, index: usize) -> Result<usize> {
        let moved = self.categories.move_down(index)?;
        self.commit(moved)
    }

    // Import/export

    /// Import image/tag pairs, saving once the batch is done
    ///
    /// # Errors
    ///
    /// Returns `TransferError::NoInput` for an empty path list, or
    /// `CuratrError::PersistError` if the session cannot be saved.
    pub fn import(&mut self, paths: &[PathBuf], options: &ImportOptions) -> Result<ImportReport> {
        let report = transfer::import_into(&mut self.entries, paths, options)?;
        self.commit(report)
    }

    /// Export every live entry
    ///
    /// # Errors
    ///
    /// Returns `TransferError` if the target cannot be written.
    pub fn export<I: ImageSource + ?Sized>(&self, source: &I, target: &ExportTarget) -> Result<ExportReport> {
        Ok(transfer::export(self.entries.entries(), source, target)?)
    }

    // Scraping

    /// # Errors
    ///
    /// Returns `StoreError` if a new entry cannot be added.
    pub fn merge_scraped(&mut self, result: &TagScrapeResult, rules: &ScrapeRules) -> Result<MergeOutcome> {
        let outcome = scrape::merge_into(&mut self.entries, result, rules)?;
        if outcome == MergeOutcome::Empty {
            return Ok(outcome);
        }
        self.commit(outcome)
    }

    /// Ask `scraper` for the tags of `source_ref` and merge them
    ///
    /// # Errors
    ///
    /// See [`Session::merge_scraped`].
    pub fn scrape_into<T: TagScraper + ?Sized>(
        &mut self,
        scraper: &T,
        source_ref: &str,
        options: &ScrapeOptions,
    ) -> Result<MergeOutcome> {
        let result = scraper.scrape(source_ref, options);
        self.merge_scraped(&result, &options.rules)
    }

    // Stats

    #[must_use]
    pub fn stats(&self) -> ProjectStats {
        ProjectStats::compute(self.entries.entries())
    }

    #[must_use]
    pub fn tag_counts(&self) -> Vec<(String, usize)> {
        stats::tag_counts(self.entries.entries())
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod session_tests;
