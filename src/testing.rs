//! Testing utilities for curatr
//!
//! Fixtures shared by the unit tests: entry builders and a `TestSession`
//! wrapper around an in-memory persisted session.
//!
//! Only available when compiled with `cfg(test)`.

use std::fs;
use std::path::Path;

use crate::ImageEntry;
use crate::persist::MemoryStore;
use crate::session::Session;

/// Build an entry from a source reference and tag literals
#[must_use]
pub fn entry(source_ref: &str, tags: &[&str]) -> ImageEntry {
    ImageEntry::new(
        source_ref,
        None,
        tags.iter().map(|t| (*t).to_string()).collect(),
    )
}

/// Owned tag list from literals
#[must_use]
pub fn tags(items: &[&str]) -> Vec<String> {
    items.iter().map(|t| (*t).to_string()).collect()
}

/// Session backed by a [`MemoryStore`], opened fresh
///
/// # Examples
/// ```ignore
/// let mut session = TestSession::new();
/// session.add_entry(entry("a.png", &["x"])).unwrap();
/// assert_eq!(session.entries().count(), 1);
/// ```
pub struct TestSession;

impl TestSession {
    /// # Panics
    /// Panics if the in-memory session cannot be opened.
    #[must_use]
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> Session<MemoryStore> {
        Session::open(MemoryStore::new()).expect("Failed to open test session")
    }

    /// Session pre-populated with the given entries
    ///
    /// # Panics
    /// Panics if any entry is rejected.
    #[must_use]
    pub fn with_entries(entries: Vec<ImageEntry>) -> Session<MemoryStore> {
        let mut session = Self::new();
        for e in entries {
            session.add_entry(e).expect("Failed to add test entry");
        }
        session
    }
}

/// Write a file with the given content, creating parent directories
///
/// # Errors
/// Returns an `io::Error` if the file cannot be written.
pub fn write_file(path: impl AsRef<Path>, content: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.as_ref().parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)
}
