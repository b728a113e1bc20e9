//! Curatr - a curation engine for image/tag datasets
//!
//! This library manages a collection of image entries (an image reference plus
//! an ordered list of text tags), a user-defined taxonomy of tag categories,
//! a boolean query language over tags, labeled backups, and the import/export
//! of image + sidecar tag file pairs.

use std::fmt;

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

pub mod backup;
pub mod cli;
pub mod commands;
pub mod config;
pub mod mutate;
pub mod output;
pub mod persist;
pub mod query;
pub mod scrape;
pub mod session;
pub mod stats;
pub mod store;
pub mod tags;
pub mod transfer;

#[cfg(test)]
pub mod testing;

/// Error enum, contains all failure states of the program
#[derive(Debug, Error)]
pub enum CuratrError {
    /// Entry or category store error
    #[error("Store error: {0}")]
    StoreError(#[from] store::StoreError),
    /// Tag mutation rejected its arguments
    #[error("Tag mutation error: {0}")]
    MutateError(#[from] mutate::MutateError),
    /// Backup error
    #[error("Backup error: {0}")]
    BackupError(#[from] backup::BackupError),
    /// Import/export error
    #[error("Transfer error: {0}")]
    TransferError(#[from] transfer::TransferError),
    /// Persistence error
    #[error("Persistence error: {0}")]
    PersistError(#[from] persist::PersistError),
    /// Represents a configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ::config::ConfigError),
    /// Represents an I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Number of hex digits kept from the source reference digest
const ID_LEN: usize = 12;

/// Stable identifier of an entry, derived from its source reference
#[derive(Encode, Decode, Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(String);

impl EntryId {
    /// Derive the id for a source reference
    #[must_use]
    pub fn from_source(source_ref: &str) -> Self {
        let digest = Sha256::digest(source_ref.as_bytes());
        let mut id = hex::encode(digest);
        id.truncate(ID_LEN);
        Self(id)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One image plus its ordered tag list
#[derive(Encode, Decode, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ImageEntry {
    pub id: EntryId,
    pub source_ref: String,
    pub page_url: Option<String>,
    pub tags: Vec<String>,
    /// Local copy of the image (extracted from an imported archive), read
    /// when `source_ref` itself cannot be
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_path: Option<String>,
}

impl ImageEntry {
    /// Create a new entry, deriving its id from `source_ref`
    #[must_use]
    pub fn new(source_ref: impl Into<String>, page_url: Option<String>, tags: Vec<String>) -> Self {
        let source_ref = source_ref.into();
        Self {
            id: EntryId::from_source(&source_ref),
            source_ref,
            page_url: page_url.filter(|url| !url.is_empty()),
            tags,
            local_path: None,
        }
    }

    /// Record a local copy of the image; ignored when it is the source itself
    #[must_use]
    pub fn with_local_path(mut self, path: impl Into<String>) -> Self {
        let path = path.into();
        if !path.is_empty() && path != self.source_ref {
            self.local_path = Some(path);
        }
        self
    }
}

/// A named, emoji-tagged, ordered group of tags
#[derive(Encode, Decode, Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct TagCategory {
    pub name: String,
    pub emoji: String,
    pub tags: Vec<String>,
}

impl TagCategory {
    #[must_use]
    pub fn new(name: impl Into<String>, emoji: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            name: name.into(),
            emoji: emoji.into(),
            tags,
        }
    }
}
