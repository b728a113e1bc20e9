//! Dataset statistics

use std::collections::HashMap;

use crate::ImageEntry;
use crate::tags;

/// Summary numbers for the live entries
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProjectStats {
    pub entries: usize,
    /// Distinct tags, compared case-insensitively
    pub unique_tags: usize,
    /// Mean tag count per entry, 0 when there are no entries
    pub tags_per_entry: f64,
}

impl ProjectStats {
    #[must_use]
    pub fn compute<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = &'a ImageEntry>,
    {
        let mut count = 0;
        let mut total_tags = 0;
        let mut unique = std::collections::HashSet::new();
        for entry in entries {
            count += 1;
            total_tags += entry.tags.len();
            unique.extend(entry.tags.iter().map(|t| tags::compare_key(t)));
        }
        #[allow(clippy::cast_precision_loss)]
        let tags_per_entry = if count == 0 { 0.0 } else { total_tags as f64 / count as f64 };
        Self {
            entries: count,
            unique_tags: unique.len(),
            tags_per_entry,
        }
    }
}

/// How often each tag occurs, most frequent first, ties by tag
///
/// Tags are grouped case-insensitively; the spelling shown is the first one
/// encountered.
#[must_use]
pub fn tag_counts<'a, I>(entries: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a ImageEntry>,
{
    let mut counts: HashMap<String, (String, usize)> = HashMap::new();
    for tag in entries.into_iter().flat_map(|e| e.tags.iter()) {
        counts
            .entry(tags::compare_key(tag))
            .or_insert_with(|| (tag.clone(), 0))
            .1 += 1;
    }
    let mut sorted: Vec<(String, usize)> = counts.into_values().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::entry;

    #[test]
    fn test_stats() {
        let entries = vec![
            entry("a.png", &["1girl", "solo"]),
            entry("b.png", &["1girl", "Solo", "smile", "outdoors"]),
        ];
        let stats = ProjectStats::compute(&entries);
        assert_eq!(stats.entries, 2);
        assert_eq!(stats.unique_tags, 4);
        assert!((stats.tags_per_entry - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_stats_empty() {
        let stats = ProjectStats::compute(&Vec::<ImageEntry>::new());
        assert_eq!(stats, ProjectStats::default());
    }

    #[test]
    fn test_tag_counts_order() {
        let entries = vec![
            entry("a.png", &["b", "a"]),
            entry("b.png", &["a", "c"]),
            entry("c.png", &["A"]),
        ];
        assert_eq!(
            tag_counts(&entries),
            vec![("a".to_string(), 3), ("b".to_string(), 1), ("c".to_string(), 1)]
        );
    }
}
