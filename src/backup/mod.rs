//! Labeled point-in-time snapshots of entries and categories
//!
//! A [`Backup`] holds owned copies of every live entry and category, so later
//! edits to the stores never show up in it. Labels are unique: capturing under
//! an existing label replaces that snapshot where it stands in the list.

use bincode::{Decode, Encode};
use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::store::{CategoryStore, EntryStore};
use crate::{ImageEntry, TagCategory};

pub mod error;

pub use error::BackupError;

/// Format of labels generated from the current time
pub const LABEL_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Snapshot of the whole dataset
#[derive(Encode, Decode, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Backup {
    pub label: String,
    pub images: Vec<ImageEntry>,
    pub categories: Vec<TagCategory>,
}

/// Label for a backup taken now
#[must_use]
pub fn timestamp_label() -> String {
    Local::now().format(LABEL_FORMAT).to_string()
}

/// Backups in capture order, oldest first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackupManager {
    backups: Vec<Backup>,
}

impl BackupManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_backups(backups: Vec<Backup>) -> Self {
        Self { backups }
    }

    /// Copy the current stores under `label`, replacing any backup with that label
    pub fn capture(&mut self, label: &str, entries: &EntryStore, categories: &CategoryStore) -> &Backup {
        let backup = Backup {
            label: label.to_string(),
            images: entries.entries().to_vec(),
            categories: categories.list().to_vec(),
        };
        info!(
            "captured backup '{label}' ({} entries, {} categories)",
            backup.images.len(),
            backup.categories.len()
        );
        let index = match self.backups.iter().position(|b| b.label == label) {
            Some(index) => {
                self.backups[index] = backup;
                index
            }
            None => {
                self.backups.push(backup);
                self.backups.len() - 1
            }
        };
        &self.backups[index]
    }

    /// Replace the live entries and all categories with the backup's contents
    ///
    /// Destructive: unsaved current state is discarded. The recycle bin is kept.
    ///
    /// # Errors
    ///
    /// Returns `BackupError::NotFound` if no backup has this label; the stores
    /// are left untouched.
    pub fn restore(&self, label: &str, entries: &mut EntryStore, categories: &mut CategoryStore) -> Result<(), BackupError> {
        let backup = self.get(label).ok_or_else(|| BackupError::NotFound(label.to_string()))?;

        entries.clear_live();
        for image in &backup.images {
            if let Err(e) = entries.add(image.clone()) {
                debug!("skipping backed up entry: {e}");
            }
        }

        categories.clear();
        for category in &backup.categories {
            categories.push_raw(category.clone());
        }
        info!("restored backup '{label}'");
        Ok(())
    }

    /// Remove a backup, returning whether it existed
    pub fn delete(&mut self, label: &str) -> bool {
        let before = self.backups.len();
        self.backups.retain(|b| b.label != label);
        self.backups.len() != before
    }

    /// Labels, oldest first
    #[must_use]
    pub fn list(&self) -> Vec<&str> {
        self.backups.iter().map(|b| b.label.as_str()).collect()
    }

    #[must_use]
    pub fn get(&self, label: &str) -> Option<&Backup> {
        self.backups.iter().find(|b| b.label == label)
    }

    #[must_use]
    pub fn backups(&self) -> &[Backup] {
        &self.backups
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.backups.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.backups.is_empty()
    }
}
