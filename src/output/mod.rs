//! Output formatting for CLI display
//!
//! Formats entries, categories, backups and stats. Quiet mode drops all
//! decoration so results can be piped.

use colored::Colorize;

use crate::stats::ProjectStats;
use crate::tags::join_list;
use crate::{ImageEntry, TagCategory};

/// Format an entry with its tags for display
#[must_use]
pub fn entry_with_tags(entry: &ImageEntry, quiet: bool) -> String {
    if quiet {
        return format!("{}\t{}", entry.source_ref, join_list(&entry.tags));
    }
    let tags = if entry.tags.is_empty() {
        "(no tags)".dimmed().to_string()
    } else {
        format!("[{}]", join_list(&entry.tags))
    };
    format!("  {} {} {tags}", entry.id.to_string().dimmed(), entry.source_ref)
}

/// Format a category with its 1-based position
#[must_use]
pub fn category_line(position: usize, category: &TagCategory, quiet: bool) -> String {
    if quiet {
        return format!("{}\t{}", category.name, join_list(&category.tags));
    }
    format!(
        "  {} {} {} ({} tag(s)) {}",
        format!("{position}.").dimmed(),
        category.emoji,
        category.name.bold(),
        category.tags.len(),
        join_list(&category.tags).cyan()
    )
}

/// Format a tag with usage count
#[must_use]
pub fn tag_with_count(tag: &str, count: usize, quiet: bool) -> String {
    if quiet {
        tag.to_string()
    } else {
        format!("  {tag} (used by {count} entr{})", if count == 1 { "y" } else { "ies" })
    }
}

/// Multi-line stats block
#[must_use]
pub fn stats_block(stats: &ProjectStats) -> String {
    format!(
        "{} {}\n{} {}\n{} {:.2}",
        "Entries:".bold(),
        stats.entries,
        "Unique tags:".bold(),
        stats.unique_tags,
        "Tags per entry:".bold(),
        stats.tags_per_entry
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::entry;

    #[test]
    fn test_quiet_entry_is_tab_separated() {
        let e = entry("a.png", &["x", "y"]);
        assert_eq!(entry_with_tags(&e, true), "a.png\tx, y");
    }

    #[test]
    fn test_entry_shows_id_and_tags() {
        colored::control::set_override(false);
        let e = entry("a.png", &["x"]);
        assert_eq!(entry_with_tags(&e, false), format!("  {} a.png [x]", e.id));
        let bare = entry("b.png", &[]);
        assert!(entry_with_tags(&bare, false).ends_with("(no tags)"));
    }

    #[test]
    fn test_tag_with_count() {
        assert_eq!(tag_with_count("x", 3, true), "x");
        assert_eq!(tag_with_count("x", 1, false), "  x (used by 1 entry)");
        assert_eq!(tag_with_count("x", 2, false), "  x (used by 2 entries)");
    }
}
