//! Tag mutation errors
//!
//! Both variants are validation failures detected before any entry is
//! touched, so a failed mutation never leaves a partial change behind.

use thiserror::Error;

use crate::EntryId;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MutateError {
    /// Nothing left to add or remove after normalization
    #[error("No tags provided")]
    EmptyTags,

    /// The selection references an entry that is not live
    #[error("Selection contains unknown entry: {0}")]
    UnknownEntry(EntryId),
}
