//! Ordered tag taxonomy
//!
//! Categories have no identity beyond their position: names are free text and
//! may repeat. Reordering swaps a category with its neighbor.

use rand::Rng;
use rand::seq::SliceRandom;

use super::error::StoreError;
use crate::TagCategory;
use crate::tags;

type Result<T> = std::result::Result<T, StoreError>;

/// Code point ranges a category icon is drawn from when none is given
const EMOJI_RANGES: &[(u32, u32)] = &[
    (0x1f600, 0x1f64f),
    (0x1f300, 0x1f5ff),
    (0x1f680, 0x1f6ff),
    (0x1f900, 0x1f9ff),
    (0x1fa70, 0x1faff),
    (0x2600, 0x26ff),
    (0x2700, 0x27bf),
];

/// Pick a random glyph from the emoji blocks
pub fn random_emoji<R: Rng + ?Sized>(rng: &mut R) -> String {
    let &(start, end) = EMOJI_RANGES.choose(rng).unwrap_or(&EMOJI_RANGES[0]);
    (0..8)
        .map(|_| rng.gen_range(start..=end))
        .find_map(char::from_u32)
        .map(String::from)
        .unwrap_or_default()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryStore {
    categories: Vec<TagCategory>,
}

impl CategoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_categories(categories: Vec<TagCategory>) -> Self {
        Self { categories }
    }

    /// Append a category, returning its position
    ///
    /// An empty emoji is replaced with a random one.
    pub fn add(&mut self, mut category: TagCategory) -> usize {
        if category.emoji.is_empty() {
            category.emoji = random_emoji(&mut rand::thread_rng());
        }
        category.tags = category.tags.iter().map(|t| tags::normalize(t)).filter(|t| !t.is_empty()).collect();
        self.categories.push(category);
        self.categories.len() - 1
    }

    /// Append a category exactly as given (used when rebuilding from a backup)
    pub fn push_raw(&mut self, category: TagCategory) {
        self.categories.push(category);
    }

    /// # Errors
    ///
    /// Returns `StoreError::CategoryNotFound` if `index` is out of range.
    pub fn remove(&mut self, index: usize) -> Result<TagCategory> {
        self.check(index)?;
        Ok(self.categories.remove(index))
    }

    /// # Errors
    ///
    /// Returns `StoreError::CategoryNotFound` if `index` is out of range.
    pub fn rename(&mut self, index: usize, name: &str) -> Result<()> {
        self.get_mut(index)?.name = name.trim().to_string();
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `StoreError::CategoryNotFound` if `index` is out of range.
    pub fn set_emoji(&mut self, index: usize, emoji: &str) -> Result<()> {
        self.get_mut(index)?.emoji = emoji.trim().to_string();
        Ok(())
    }

    /// Append tags to a category, skipping ones it already holds
    ///
    /// Returns the number of tags actually added.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::CategoryNotFound` if `index` is out of range.
    pub fn add_tags(&mut self, index: usize, new_tags: &[String]) -> Result<usize> {
        let category = self.get_mut(index)?;
        let mut added = 0;
        for tag in new_tags.iter().map(|t| tags::normalize(t)) {
            if !tag.is_empty() && !tags::contains_tag(&category.tags, &tag) {
                category.tags.push(tag);
                added += 1;
            }
        }
        Ok(added)
    }

    /// Remove a tag (compared case-insensitively), returning whether it was present
    ///
    /// # Errors
    ///
    /// Returns `StoreError::CategoryNotFound` if `index` is out of range.
    pub fn remove_tag(&mut self, index: usize, tag: &str) -> Result<bool> {
        let category = self.get_mut(index)?;
        let key = tags::compare_key(tag);
        let before = category.tags.len();
        category.tags.retain(|t| tags::compare_key(t) != key);
        Ok(category.tags.len() != before)
    }

    /// # Errors
    ///
    /// Returns `StoreError::CategoryNotFound` if `index` is out of range.
    pub fn clear_tags(&mut self, index: usize) -> Result<()> {
        self.get_mut(index)?.tags.clear();
        Ok(())
    }

    /// Swap with the previous category; no-op for the first one
    ///
    /// Returns the category's new position.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::CategoryNotFound` if `index` is out of range.
    pub fn move_up(&mut self, index: usize) -> Result<usize> {
        self.check(index)?;
        if index == 0 {
            return Ok(0);
        }
        self.categories.swap(index, index - 1);
        Ok(index - 1)
    }

    /// Swap with the next category; no-op for the last one
    ///
    /// Returns the category's new position.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::CategoryNotFound` if `index` is out of range.
    pub fn move_down(&mut self, index: usize) -> Result<usize> {
        self.check(index)?;
        if index + 1 == self.categories.len() {
            return Ok(index);
        }
        self.categories.swap(index, index + 1);
        Ok(index + 1)
    }

    #[must_use]
    pub fn list(&self) -> &[TagCategory] {
        &self.categories
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&TagCategory> {
        self.categories.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn clear(&mut self) {
        self.categories.clear();
    }

    fn check(&self, index: usize) -> Result<()> {
        if index < self.categories.len() {
            Ok(())
        } else {
            Err(StoreError::CategoryNotFound(index))
        }
    }

    fn get_mut(&mut self, index: usize) -> Result<&mut TagCategory> {
        self.categories
            .get_mut(index)
            .ok_or(StoreError::CategoryNotFound(index))
    }
}
