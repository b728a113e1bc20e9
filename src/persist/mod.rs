//! Key-value gateway for session state
//!
//! The session persists four values, each under a fixed key and bincode
//! encoded:
//! - [`IMAGES`]: live entries, in order
//! - [`RECYCLED`]: the recycle bin
//! - [`CATEGORIES`]: the tag taxonomy
//! - [`BACKUPS`]: labeled snapshots, oldest first
//!
//! [`SledStore`] writes to an on-disk sled tree; [`MemoryStore`] keeps
//! everything in a map and is used by tests.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use bincode::{Decode, Encode};
use sled::{Db, Tree};

pub mod error;

pub use error::PersistError;

type Result<T> = std::result::Result<T, PersistError>;

pub const IMAGES: &str = "images";
pub const CATEGORIES: &str = "categories";
pub const BACKUPS: &str = "backups";
pub const RECYCLED: &str = "recycled";

/// Byte-level storage for session values
pub trait KeyValueStore {
    /// Raw bytes stored under `key`, `None` if absent
    ///
    /// # Errors
    ///
    /// Returns `PersistError` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store `value` under `key`, replacing any previous value
    ///
    /// # Errors
    ///
    /// Returns `PersistError` if the backend cannot be written.
    fn set(&self, key: &str, value: &[u8]) -> Result<()>;
}

/// Decode the value under `key`
///
/// # Errors
///
/// Returns `PersistError` if the read or the decode fails.
pub fn load<S, T>(store: &S, key: &str) -> Result<Option<T>>
where
    S: KeyValueStore + ?Sized,
    T: Decode<()>,
{
    match store.get(key)? {
        Some(bytes) => {
            let (value, _): (T, usize) = bincode::decode_from_slice(&bytes, bincode::config::standard())?;
            Ok(Some(value))
        }
        None => Ok(None),
    }
}

/// Encode and store `value` under `key`
///
/// # Errors
///
/// Returns `PersistError` if the encode or the write fails.
pub fn save<S, T>(store: &S, key: &str, value: &T) -> Result<()>
where
    S: KeyValueStore + ?Sized,
    T: Encode,
{
    let bytes = bincode::encode_to_vec(value, bincode::config::standard())?;
    store.set(key, &bytes)
}

/// Session values in a sled database
pub struct SledStore {
    db: Db,
    session: Tree,
}

impl SledStore {
    /// Opens or creates a session database at the specified path
    ///
    /// # Examples
    /// ```no_run
    /// use curatr::persist::SledStore;
    /// let store = SledStore::open("my_session").unwrap();
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `PersistError` if the database or its tree cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db = sled::open(path)?;
        let session = db.open_tree("session")?;
        Ok(Self { db, session })
    }

    /// Flush pending writes to disk
    ///
    /// # Errors
    ///
    /// Returns `PersistError` if the flush fails.
    pub fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }
}

impl KeyValueStore for SledStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.session.get(key.as_bytes())?.map(|v| v.to_vec()))
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        self.session.insert(key.as_bytes(), value)?;
        self.session.flush()?;
        Ok(())
    }
}

/// Session values held in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let values = self.values.lock().map_err(|_| PersistError::Poisoned)?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let mut values = self.values.lock().map_err(|_| PersistError::Poisoned)?;
        values.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.get(IMAGES).unwrap(), None);
        store.set(IMAGES, b"abc").unwrap();
        assert_eq!(store.get(IMAGES).unwrap(), Some(b"abc".to_vec()));
    }

    #[test]
    fn test_typed_values_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let labels = vec!["a".to_string(), "b".to_string()];
        {
            let store = SledStore::open(dir.path()).unwrap();
            save(&store, BACKUPS, &labels).unwrap();
        }
        let store = SledStore::open(dir.path()).unwrap();
        let loaded: Option<Vec<String>> = load(&store, BACKUPS).unwrap();
        assert_eq!(loaded, Some(labels));
        let missing: Option<Vec<String>> = load(&store, CATEGORIES).unwrap();
        assert_eq!(missing, None);
    }

    #[test]
    fn test_corrupt_value_is_decode_error() {
        let store = MemoryStore::new();
        store.set(IMAGES, &[0xff, 0xff]).unwrap();
        let result: Result<Option<Vec<String>>> = load(&store, IMAGES);
        assert!(matches!(result, Err(PersistError::DecodeError(_))));
    }
}
