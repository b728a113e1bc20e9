use std::collections::HashSet;

use super::parser::{Query, Term};
use crate::tags;
use crate::{EntryId, ImageEntry};

impl Term {
    /// Check the term against tags that are already comparison keys
    fn is_satisfied(&self, keys: &HashSet<String>) -> bool {
        match self {
            Self::AnyOf(parts) => parts.iter().any(|p| keys.contains(p)),
            Self::AllOf(parts) => !parts.is_empty() && parts.iter().all(|p| keys.contains(p)),
            Self::Partial(needle) => keys.iter().any(|k| k.contains(needle.as_str())),
        }
    }
}

impl Query {
    /// Check whether an entry with these tags is selected
    #[must_use]
    pub fn matches<S: AsRef<str>>(&self, entry_tags: &[S]) -> bool {
        if self.is_empty() {
            return true;
        }
        let keys: HashSet<String> = entry_tags
            .iter()
            .map(|t| tags::compare_key(t.as_ref()))
            .filter(|k| !k.is_empty())
            .collect();
        self.terms().iter().any(|term| term.is_satisfied(&keys))
    }
}

/// Ids of the entries a search string selects
///
/// Entries not in the result are meant to be hidden, not removed.
pub fn evaluate<'a, I>(query_text: &str, entries: I) -> HashSet<EntryId>
where
    I: IntoIterator<Item = &'a ImageEntry>,
{
    let query = Query::parse(query_text);
    entries
        .into_iter()
        .filter(|entry| query.matches(&entry.tags))
        .map(|entry| entry.id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::entry;

    fn selected(query: &str, entries: &[ImageEntry]) -> Vec<String> {
        let ids = evaluate(query, entries);
        entries
            .iter()
            .filter(|e| ids.contains(&e.id))
            .map(|e| e.source_ref.clone())
            .collect()
    }

    fn dataset() -> Vec<ImageEntry> {
        vec![
            entry("a.png", &["1girl", "solo", "smile"]),
            entry("b.png", &["1girls", "group"]),
            entry("c.png", &["1boy", "solo"]),
            entry("d.png", &[]),
        ]
    }

    #[test]
    fn test_empty_query_selects_all() {
        let entries = dataset();
        assert_eq!(selected("", &entries).len(), 4);
        assert_eq!(selected("  ,  ", &entries).len(), 4);
    }

    #[test]
    fn test_partial_terms_use_substring() {
        let entries = dataset();
        assert_eq!(selected("1girl", &entries), vec!["a.png", "b.png"]);
        assert_eq!(selected("GROU", &entries), vec!["b.png"]);
    }

    #[test]
    fn test_top_level_terms_are_ored() {
        let entries = dataset();
        assert_eq!(selected("1boy, group", &entries), vec!["b.png", "c.png"]);
    }

    #[test]
    fn test_and_group_requires_exact_tags() {
        let entries = dataset();
        assert_eq!(selected("1girl && solo", &entries), vec!["a.png"]);
        assert_eq!(selected("1girl AND Solo", &entries), vec!["a.png"]);
        assert!(selected("1gir && solo", &entries).is_empty());
    }

    #[test]
    fn test_or_group_requires_exact_tag() {
        let entries = dataset();
        assert_eq!(selected("1boy || group", &entries), vec!["b.png", "c.png"]);
        assert!(selected("1bo OR grou", &entries).is_empty());
    }

    #[test]
    fn test_group_without_parts_matches_nothing() {
        let entries = dataset();
        assert!(selected("&&", &entries).is_empty());
        assert!(selected("||", &entries).is_empty());
    }

    #[test]
    fn test_mixed_terms() {
        let entries = dataset();
        assert_eq!(
            selected("1boy && solo, smile", &entries),
            vec!["a.png", "c.png"]
        );
    }

    #[test]
    fn test_untagged_entry_only_matches_empty_query() {
        let entries = vec![entry("d.png", &[])];
        assert!(selected("a", &entries).is_empty());
        assert_eq!(selected("", &entries), vec!["d.png"]);
    }
}
