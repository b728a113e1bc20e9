//! Store-specific error types
//!
//! None of these are fatal: each one means the requested operation was a
//! no-op and the store is unchanged.
//!
//! # Error Types
//!
//! - **`Duplicate`**: a live entry already uses the source reference
//! - **`NotFound`**: no live (or recycled) entry has the given id
//! - **`CategoryNotFound`**: category position is out of range

use thiserror::Error;

use crate::EntryId;

/// Entry and category store errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// A live entry already has this source reference
    #[error("Entry already exists: {0}")]
    Duplicate(String),

    /// No entry with this id
    #[error("Entry not found: {0}")]
    NotFound(EntryId),

    /// No category at this position
    #[error("Category not found at position {0}")]
    CategoryNotFound(usize),
}
