//! Batch tag mutations over a selection of entries
//!
//! - [`apply_add_tags`] inserts tags using a [`Placement`] policy
//! - [`apply_remove_tags`] strips tags from every selected entry
//! - [`select_by_tags`] / [`deselect_by_tags`] build and narrow selections
//!
//! No mutation deduplicates: callers that need unique tags filter first.

use std::collections::HashSet;
use std::fmt;

use clap::ValueEnum;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::store::EntryStore;
use crate::tags;
use crate::{EntryId, ImageEntry};

pub mod error;

pub use error::MutateError;

type Result<T> = std::result::Result<T, MutateError>;

/// Where newly added tags land in an entry's tag list
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Placement {
    /// New tags before the existing ones
    Prepend,
    /// New tags after the existing ones
    #[default]
    Append,
    /// New and existing tags, fully shuffled
    PrependShuffled,
    /// New and existing tags, fully shuffled (same outcome space as `prepend-shuffled`)
    AppendShuffled,
    /// New tags as one block at a random index in `0..=len`
    InsertRandom,
}

impl Placement {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Prepend => "prepend",
            Self::Append => "append",
            Self::PrependShuffled => "prepend-shuffled",
            Self::AppendShuffled => "append-shuffled",
            Self::InsertRandom => "insert-random",
        }
    }

    /// Compute the new tag list for one entry
    pub fn apply<R: Rng + ?Sized>(self, existing: &[String], new_tags: &[String], rng: &mut R) -> Vec<String> {
        match self {
            Self::Prepend => new_tags.iter().chain(existing).cloned().collect(),
            Self::Append => existing.iter().chain(new_tags).cloned().collect(),
            Self::PrependShuffled | Self::AppendShuffled => {
                let mut all: Vec<String> = if self == Self::PrependShuffled {
                    new_tags.iter().chain(existing).cloned().collect()
                } else {
                    existing.iter().chain(new_tags).cloned().collect()
                };
                all.shuffle(rng);
                all
            }
            Self::InsertRandom => {
                let index = rng.gen_range(0..=existing.len());
                let mut out = Vec::with_capacity(existing.len() + new_tags.len());
                out.extend_from_slice(&existing[..index]);
                out.extend_from_slice(new_tags);
                out.extend_from_slice(&existing[index..]);
                out
            }
        }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Add tags to every selected entry using the thread-local RNG
///
/// Returns the number of entries changed.
///
/// # Errors
///
/// Returns `MutateError::EmptyTags` when `tags_to_add` normalizes to nothing,
/// or `MutateError::UnknownEntry` when the selection names a non-live entry.
/// Nothing is modified in either case.
pub fn apply_add_tags(
    store: &mut EntryStore,
    selection: &[EntryId],
    tags_to_add: &[String],
    placement: Placement,
) -> Result<usize> {
    apply_add_tags_with_rng(store, selection, tags_to_add, placement, &mut rand::thread_rng())
}

/// [`apply_add_tags`] with an explicit random source
///
/// # Errors
///
/// See [`apply_add_tags`].
pub fn apply_add_tags_with_rng<R: Rng + ?Sized>(
    store: &mut EntryStore,
    selection: &[EntryId],
    tags_to_add: &[String],
    placement: Placement,
    rng: &mut R,
) -> Result<usize> {
    let new_tags = normalized(tags_to_add)?;
    validate_selection(store, selection)?;

    let targets = unique(selection);
    for id in &targets {
        if let Some(entry) = store.get_mut(id) {
            entry.tags = placement.apply(&entry.tags, &new_tags, rng);
        }
    }
    Ok(targets.len())
}

/// Selection with repeated ids dropped, first occurrence kept
fn unique(selection: &[EntryId]) -> Vec<&EntryId> {
    let mut seen = HashSet::new();
    selection.iter().filter(|id| seen.insert(*id)).collect()
}

/// Remove tags (compared case-insensitively) from every selected entry
///
/// Returns the number of entries that lost at least one tag.
///
/// # Errors
///
/// Same validation as [`apply_add_tags`].
pub fn apply_remove_tags(store: &mut EntryStore, selection: &[EntryId], tags_to_remove: &[String]) -> Result<usize> {
    let keys: HashSet<String> = normalized(tags_to_remove)?
        .iter()
        .map(|t| tags::compare_key(t))
        .collect();
    validate_selection(store, selection)?;

    let mut changed = 0;
    for id in selection {
        if let Some(entry) = store.get_mut(id) {
            let before = entry.tags.len();
            entry.tags.retain(|t| !keys.contains(&tags::compare_key(t)));
            if entry.tags.len() != before {
                changed += 1;
            }
        }
    }
    Ok(changed)
}

/// Entries holding every tag of `with_all` and none of `without_any`
///
/// Empty lists impose no constraint, so two empty lists select everything.
pub fn select_by_tags<'a, I>(entries: I, with_all: &[String], without_any: &[String]) -> HashSet<EntryId>
where
    I: IntoIterator<Item = &'a ImageEntry>,
{
    let filter = TagFilter::new(with_all, without_any);
    entries
        .into_iter()
        .filter(|e| filter.matches(&e.tags))
        .map(|e| e.id.clone())
        .collect()
}

/// Remove from `selection` the entries that [`select_by_tags`] would match
pub fn deselect_by_tags(
    store: &EntryStore,
    selection: &mut HashSet<EntryId>,
    with_all: &[String],
    without_any: &[String],
) {
    let filter = TagFilter::new(with_all, without_any);
    selection.retain(|id| store.get(id).is_none_or(|e| !filter.matches(&e.tags)));
}

struct TagFilter {
    with_all: Vec<String>,
    without_any: Vec<String>,
}

impl TagFilter {
    fn new(with_all: &[String], without_any: &[String]) -> Self {
        let keys = |list: &[String]| -> Vec<String> {
            list.iter()
                .map(|t| tags::compare_key(t))
                .filter(|t| !t.is_empty())
                .collect()
        };
        Self {
            with_all: keys(with_all),
            without_any: keys(without_any),
        }
    }

    fn matches(&self, entry_tags: &[String]) -> bool {
        let present: HashSet<String> = entry_tags.iter().map(|t| tags::compare_key(t)).collect();
        self.with_all.iter().all(|t| present.contains(t))
            && !self.without_any.iter().any(|t| present.contains(t))
    }
}

fn normalized(list: &[String]) -> Result<Vec<String>> {
    let out: Vec<String> = list
        .iter()
        .map(|t| tags::normalize(t))
        .filter(|t| !t.is_empty())
        .collect();
    if out.is_empty() {
        return Err(MutateError::EmptyTags);
    }
    Ok(out)
}

fn validate_selection(store: &EntryStore, selection: &[EntryId]) -> Result<()> {
    match selection.iter().find(|id| store.get(id).is_none()) {
        Some(id) => Err(MutateError::UnknownEntry(id.clone())),
        None => Ok(()),
    }
}
