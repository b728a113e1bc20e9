//! Merging tags scraped from image board pages
//!
//! An external scraper produces a [`TagScrapeResult`]: tags grouped by board
//! category for one image. [`TagScrapeResult::flatten`] turns it into a single
//! ordered tag list according to [`ScrapeRules`], and [`merge_into`] folds that
//! list into the entry store.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::store::{EntryStore, StoreError};
use crate::tags;
use crate::{CuratrError, EntryId, ImageEntry};

/// Tag category used by image boards
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum ScrapeCategory {
    Character,
    Species,
    Meta,
    Artist,
    General,
    Copyright,
}

impl ScrapeCategory {
    pub const ALL: [Self; 6] = [
        Self::Character,
        Self::Species,
        Self::Meta,
        Self::Artist,
        Self::General,
        Self::Copyright,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Character => "character",
            Self::Species => "species",
            Self::Meta => "meta",
            Self::Artist => "artist",
            Self::General => "general",
            Self::Copyright => "copyright",
        }
    }

    /// Category named by a `{category}` placeholder
    #[must_use]
    pub fn from_placeholder(item: &str) -> Option<Self> {
        let name = item.trim().strip_prefix('{')?.strip_suffix('}')?;
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }
}

impl fmt::Display for ScrapeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which categories contribute tags
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct IncludeRules {
    pub character: bool,
    pub species: bool,
    pub meta: bool,
    pub artist: bool,
    pub general: bool,
    pub copyright: bool,
}

impl Default for IncludeRules {
    fn default() -> Self {
        Self {
            character: true,
            species: true,
            meta: false,
            artist: true,
            general: true,
            copyright: false,
        }
    }
}

impl IncludeRules {
    #[must_use]
    pub const fn includes(&self, category: ScrapeCategory) -> bool {
        match category {
            ScrapeCategory::Character => self.character,
            ScrapeCategory::Species => self.species,
            ScrapeCategory::Meta => self.meta,
            ScrapeCategory::Artist => self.artist,
            ScrapeCategory::General => self.general,
            ScrapeCategory::Copyright => self.copyright,
        }
    }
}

/// Filtering and ordering applied to scraped tags
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ScrapeRules {
    /// Tags never taken, compared case-insensitively
    pub blacklist: Vec<String>,
    pub include: IncludeRules,
    /// Handed to the scraper; boards that score tags drop those below it
    pub minimum_score: f64,
    /// Maximum tags taken per category
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    /// Output order: `{category}` placeholders and literal tags
    pub formatting_order: Vec<String>,
    /// Groups of interchangeable tags; only the first one present is kept
    pub redundancy_filter: Vec<Vec<String>>,
    /// Canonical tag to the synonyms folded into it
    pub translation_dictionary: BTreeMap<String, Vec<String>>,
}

impl Default for ScrapeRules {
    fn default() -> Self {
        let owned = |items: &[&str]| items.iter().map(|s| (*s).to_string()).collect::<Vec<_>>();
        Self {
            blacklist: Vec::new(),
            include: IncludeRules::default(),
            minimum_score: 0.0,
            limit: None,
            formatting_order: owned(&[
                "1boy",
                "1girl",
                "{copyright}",
                "{character}",
                "{species}",
                "{meta}",
                "{artist}",
                "{general}",
            ]),
            redundancy_filter: vec![owned(&["1girl", "solo", "1girls"]), owned(&["1boy", "solo", "1boys"])],
            translation_dictionary: BTreeMap::from([("big dom small sub".to_string(), owned(&["muscular uke"]))]),
        }
    }
}

/// Options passed to a scraper
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(default)]
pub struct ScrapeOptions {
    pub rules: ScrapeRules,
}

/// Tags scraped for one image
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct TagScrapeResult {
    #[serde(default, alias = "tags")]
    pub tags_by_category: BTreeMap<ScrapeCategory, Vec<String>>,
    #[serde(alias = "imageSrc")]
    pub source_ref: String,
    #[serde(default, alias = "pageUrl")]
    pub page_url: Option<String>,
}

impl TagScrapeResult {
    /// An unrecognized page yields a result with no tags and no source
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.source_ref.is_empty() && self.tags_by_category.values().all(Vec::is_empty)
    }

    /// # Errors
    ///
    /// Returns a `serde_json::Error` if `bytes` is not a scrape result.
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// # Errors
    ///
    /// Returns `CuratrError` if the file cannot be read or parsed.
    pub fn from_json_file(path: &Path) -> Result<Self, CuratrError> {
        let bytes = fs::read(path)?;
        Self::from_json(&bytes).map_err(|e| CuratrError::InvalidInput(format!("{}: {e}", path.display())))
    }

    /// One ordered, duplicate-free tag list filtered by `rules`
    #[must_use]
    pub fn flatten(&self, rules: &ScrapeRules) -> Vec<String> {
        let blacklist: HashSet<String> = rules.blacklist.iter().map(|t| tags::compare_key(t)).collect();
        let translations: HashMap<String, String> = rules
            .translation_dictionary
            .iter()
            .flat_map(|(canonical, synonyms)| {
                let canonical = tags::normalize(canonical);
                synonyms.iter().map(move |s| (tags::compare_key(s), canonical.clone()))
            })
            .collect();

        let mut by_category: Vec<(ScrapeCategory, Vec<String>)> = ScrapeCategory::ALL
            .into_iter()
            .filter(|c| rules.include.includes(*c))
            .map(|category| {
                let taken = self
                    .tags_by_category
                    .get(&category)
                    .into_iter()
                    .flatten()
                    .map(|t| tags::normalize(t))
                    .filter(|t| !t.is_empty())
                    .map(|t| translations.get(&tags::compare_key(&t)).cloned().unwrap_or(t))
                    .filter(|t| !blacklist.contains(&tags::compare_key(t)))
                    .take(rules.limit.unwrap_or(usize::MAX))
                    .collect();
                (category, taken)
            })
            .collect();

        let dropped = redundant_tags(&by_category, &rules.redundancy_filter);
        for (_, list) in &mut by_category {
            list.retain(|t| !dropped.contains(&tags::compare_key(t)));
        }

        let present: HashSet<String> = by_category
            .iter()
            .flat_map(|(_, list)| list.iter().map(|t| tags::compare_key(t)))
            .collect();

        let mut ordered = Vec::new();
        let mut emitted = HashSet::new();
        for item in &rules.formatting_order {
            match ScrapeCategory::from_placeholder(item) {
                Some(category) => {
                    if emitted.insert(category)
                        && let Some((_, list)) = by_category.iter().find(|(c, _)| *c == category)
                    {
                        ordered.extend(list.iter().cloned());
                    }
                }
                None => {
                    let literal = tags::normalize(item);
                    if present.contains(&tags::compare_key(&literal)) {
                        ordered.push(literal);
                    }
                }
            }
        }
        for (category, list) in &by_category {
            if !emitted.contains(category) {
                ordered.extend(list.iter().cloned());
            }
        }

        let mut seen = HashSet::new();
        ordered.retain(|t| seen.insert(tags::compare_key(t)));
        ordered
    }
}

/// Keys of tags removed by the redundancy groups
///
/// Group members may be given one per item or comma-joined in one item.
fn redundant_tags(by_category: &[(ScrapeCategory, Vec<String>)], groups: &[Vec<String>]) -> HashSet<String> {
    let present: HashSet<String> = by_category
        .iter()
        .flat_map(|(_, list)| list.iter().map(|t| tags::compare_key(t)))
        .collect();

    let mut dropped = HashSet::new();
    for group in groups {
        let members: Vec<String> = group
            .iter()
            .flat_map(|item| tags::split_list(item))
            .map(|t| tags::compare_key(&t))
            .collect();
        if let Some(keep) = members.iter().find(|m| present.contains(*m)) {
            dropped.extend(members.iter().filter(|m| *m != keep).cloned());
        }
    }
    dropped
}

/// Source of scraped tags for an image
pub trait TagScraper {
    /// Tags for `source_ref`, or an empty result if the page is not recognized
    fn scrape(&self, source_ref: &str, options: &ScrapeOptions) -> TagScrapeResult;
}

impl<F> TagScraper for F
where
    F: Fn(&str, &ScrapeOptions) -> TagScrapeResult,
{
    fn scrape(&self, source_ref: &str, options: &ScrapeOptions) -> TagScrapeResult {
        self(source_ref, options)
    }
}

/// What merging a scrape result did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// A new entry was created
    Added(EntryId),
    /// An existing entry gained `added` tags
    Extended { id: EntryId, added: usize },
    /// Nothing recognized, nothing changed
    Empty,
}

/// Fold a scrape result into `store`
///
/// A live entry with the same source gains the flattened tags it lacks, at
/// the end of its list. Otherwise a new entry is added with the flattened tags.
///
/// # Errors
///
/// Returns `StoreError` if the entry cannot be added.
pub fn merge_into(store: &mut EntryStore, result: &TagScrapeResult, rules: &ScrapeRules) -> Result<MergeOutcome, StoreError> {
    if result.is_empty() || result.source_ref.trim().is_empty() {
        return Ok(MergeOutcome::Empty);
    }
    let flattened = result.flatten(rules);
    debug!("merging {} scraped tags for {}", flattened.len(), result.source_ref);

    let existing = store.find_by_source(&result.source_ref).map(|e| e.id.clone());
    match existing {
        Some(id) => {
            let mut added = 0;
            if let Some(entry) = store.get_mut(&id) {
                for tag in flattened {
                    if !tags::contains_tag(&entry.tags, &tag) {
                        entry.tags.push(tag);
                        added += 1;
                    }
                }
                if entry.page_url.is_none() {
                    entry.page_url = result.page_url.clone().filter(|u| !u.is_empty());
                }
            }
            Ok(MergeOutcome::Extended { id, added })
        }
        None => {
            let entry = ImageEntry::new(result.source_ref.clone(), result.page_url.clone(), flattened);
            store.add(entry).map(MergeOutcome::Added)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{entry, tags as owned};

    /// Scrape result with each category's tags given comma-joined
    fn result(categories: &[(ScrapeCategory, &str)]) -> TagScrapeResult {
        TagScrapeResult {
            tags_by_category: categories.iter().map(|(c, t)| (*c, tags::split_list(t))).collect(),
            source_ref: "https://img.example/1.png".into(),
            page_url: Some("https://board.example/posts/1".into()),
        }
    }

    fn plain_rules() -> ScrapeRules {
        ScrapeRules {
            formatting_order: Vec::new(),
            redundancy_filter: Vec::new(),
            translation_dictionary: BTreeMap::new(),
            ..ScrapeRules::default()
        }
    }

    #[test]
    fn test_placeholder() {
        assert_eq!(ScrapeCategory::from_placeholder("{meta}"), Some(ScrapeCategory::Meta));
        assert_eq!(ScrapeCategory::from_placeholder("meta"), None);
        assert_eq!(ScrapeCategory::from_placeholder("{unknown}"), None);
    }

    #[test]
    fn test_include_and_blacklist() {
        let scraped = result(&[
            (ScrapeCategory::General, "smile, Lowres, solo"),
            (ScrapeCategory::Meta, "highres"),
        ]);
        let rules = ScrapeRules {
            blacklist: owned(&["lowres"]),
            ..plain_rules()
        };
        assert_eq!(scraped.flatten(&rules), vec!["smile", "solo"]);
    }

    #[test]
    fn test_limit_per_category() {
        let scraped = result(&[
            (ScrapeCategory::Character, "a, b, c"),
            (ScrapeCategory::General, "x, y"),
        ]);
        let rules = ScrapeRules {
            limit: Some(1),
            ..plain_rules()
        };
        assert_eq!(scraped.flatten(&rules), vec!["a", "x"]);
    }

    #[test]
    fn test_translation_folds_synonyms() {
        let scraped = result(&[(ScrapeCategory::General, "Muscular Uke, smile")]);
        let rules = ScrapeRules {
            translation_dictionary: BTreeMap::from([("big dom small sub".into(), owned(&["muscular uke"]))]),
            ..plain_rules()
        };
        assert_eq!(scraped.flatten(&rules), vec!["big dom small sub", "smile"]);
    }

    #[test]
    fn test_redundancy_keeps_first_present() {
        let scraped = result(&[(ScrapeCategory::General, "solo, 1girl, smile")]);
        let rules = ScrapeRules {
            redundancy_filter: vec![owned(&["1girl, solo, 1girls"])],
            ..plain_rules()
        };
        assert_eq!(scraped.flatten(&rules), vec!["1girl", "smile"]);
    }

    #[test]
    fn test_default_formatting_order() {
        let scraped = result(&[
            (ScrapeCategory::General, "smile, 1girl"),
            (ScrapeCategory::Artist, "someone"),
            (ScrapeCategory::Character, "hero"),
        ]);
        assert_eq!(
            scraped.flatten(&ScrapeRules::default()),
            vec!["1girl", "hero", "someone", "smile"]
        );
    }

    #[test]
    fn test_parses_scraper_json() {
        let json = br#"{
            "tags": {"general": ["smile"], "copyright": ["series"]},
            "imageSrc": "https://img.example/1.png",
            "pageUrl": "https://board.example/posts/1"
        }"#;
        let parsed = TagScrapeResult::from_json(json).unwrap();
        assert_eq!(parsed.tags_by_category[&ScrapeCategory::Copyright], vec!["series"]);
        assert_eq!(parsed.page_url.as_deref(), Some("https://board.example/posts/1"));
    }

    #[test]
    fn test_merge_adds_new_entry() {
        let mut store = EntryStore::new();
        let scraped = result(&[(ScrapeCategory::General, "smile")]);

        let outcome = merge_into(&mut store, &scraped, &plain_rules()).unwrap();
        let MergeOutcome::Added(id) = outcome else {
            panic!("expected a new entry, got {outcome:?}");
        };
        let added = store.get(&id).unwrap();
        assert_eq!(added.tags, vec!["smile"]);
        assert_eq!(added.page_url.as_deref(), Some("https://board.example/posts/1"));
    }

    #[test]
    fn test_merge_appends_only_missing_tags() {
        let mut store = EntryStore::new();
        let id = store
            .add(entry("https://img.example/1.png", &["Smile", "mine"]))
            .unwrap();
        let scraped = result(&[(ScrapeCategory::General, "smile, solo")]);

        let outcome = merge_into(&mut store, &scraped, &plain_rules()).unwrap();
        assert_eq!(outcome, MergeOutcome::Extended { id: id.clone(), added: 1 });
        assert_eq!(store.get(&id).unwrap().tags, vec!["Smile", "mine", "solo"]);
    }

    #[test]
    fn test_merge_ignores_empty_result() {
        let mut store = EntryStore::new();
        let outcome = merge_into(&mut store, &TagScrapeResult::default(), &plain_rules()).unwrap();
        assert_eq!(outcome, MergeOutcome::Empty);
        assert!(store.is_empty());
    }

    #[test]
    fn test_closure_scraper() {
        let scraper = |source_ref: &str, _: &ScrapeOptions| TagScrapeResult {
            source_ref: source_ref.to_string(),
            ..TagScrapeResult::default()
        };
        let out = scraper.scrape("a.png", &ScrapeOptions::default());
        assert_eq!(out.source_ref, "a.png");
    }
}
