//! Tag text normalization
//!
//! Every component that parses a tag-bearing text field goes through these
//! functions, so trimming and splitting rules are identical everywhere:
//!
//! - [`normalize`] produces the display form of a tag
//! - [`compare_key`] produces the form used for equality and substring checks
//! - [`split_list`] / [`split_list_on`] turn a comma separated field into tags
//! - [`join_list`] is the inverse used for sidecar files and text fields

/// Separator used when tags are written out as a single line
pub const LIST_SEPARATOR: &str = ", ";

/// Canonicalize raw tag text for display.
///
/// Trims surrounding whitespace and trailing commas and collapses internal
/// whitespace runs to a single space. Case is preserved.
///
/// # Examples
/// ```
/// use curatr::tags::normalize;
///
/// assert_eq!(normalize("  long   hair, "), "long hair");
/// assert_eq!(normalize(&normalize(" a ,")), normalize(" a ,"));
/// ```
#[must_use]
pub fn normalize(raw: &str) -> String {
    let trimmed = raw
        .trim_start()
        .trim_end_matches(|c: char| c == ',' || c.is_whitespace());

    let mut out = String::with_capacity(trimmed.len());
    let mut pending_space = false;
    for c in trimmed.chars() {
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        out.push(c);
    }
    out
}

/// Comparison form of a tag: normalized and lowercased.
///
/// Only used for matching, never shown to the user.
#[must_use]
pub fn compare_key(raw: &str) -> String {
    normalize(raw).to_lowercase()
}

/// Split a comma separated field into normalized, non-empty tags.
///
/// Accepts both `a,b` and `a, b` forms.
#[must_use]
pub fn split_list(raw: &str) -> Vec<String> {
    split_list_on(raw, ",")
}

/// Split on an explicit separator, normalizing each part and dropping empties.
#[must_use]
pub fn split_list_on(raw: &str, separator: &str) -> Vec<String> {
    raw.split(separator)
        .map(normalize)
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// Join tags into the single-line sidecar form (no trailing separator).
#[must_use]
pub fn join_list<S: AsRef<str>>(tags: &[S]) -> String {
    tags.iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(LIST_SEPARATOR)
}

/// Check whether `tags` holds `tag`, comparing by [`compare_key`].
#[must_use]
pub fn contains_tag<S: AsRef<str>>(tags: &[S], tag: &str) -> bool {
    let key = compare_key(tag);
    tags.iter().any(|t| compare_key(t.as_ref()) == key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trims_and_strips_trailing_comma() {
        assert_eq!(normalize("  solo  "), "solo");
        assert_eq!(normalize("solo,"), "solo");
        assert_eq!(normalize("solo , ,"), "solo");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" , "), "");
    }

    #[test]
    fn test_normalize_collapses_whitespace_and_keeps_case() {
        assert_eq!(normalize("Looking \t at   Viewer"), "Looking at Viewer");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let samples = [
            "a", " a ", "a,", "a , ,", ",a", "  multi   word tag ,, ", "MiXeD", "\u{3000}wide\u{3000}",
        ];
        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "not idempotent for {sample:?}");
        }
    }

    #[test]
    fn test_compare_key_lowercases() {
        assert_eq!(compare_key(" Blue Eyes,"), "blue eyes");
        assert_eq!(compare_key("ÉTÉ"), "été");
    }

    #[test]
    fn test_split_list_accepts_both_forms() {
        assert_eq!(split_list("a,b, c ,, d,"), vec!["a", "b", "c", "d"]);
        assert!(split_list("").is_empty());
        assert!(split_list(" , ,").is_empty());
    }

    #[test]
    fn test_split_list_on_comma_space() {
        assert_eq!(split_list_on("1girl, solo, smile", ", "), vec!["1girl", "solo", "smile"]);
        assert_eq!(split_list_on("a,b, c", ", "), vec!["a,b", "c"]);
    }

    #[test]
    fn test_join_list_has_no_trailing_separator() {
        assert_eq!(join_list(&["a", "b"]), "a, b");
        assert_eq!(join_list::<&str>(&[]), "");
    }

    #[test]
    fn test_contains_tag_is_case_insensitive() {
        let tags = vec!["Blue Eyes".to_string(), "solo".to_string()];
        assert!(contains_tag(&tags, "blue eyes"));
        assert!(contains_tag(&tags, " SOLO,"));
        assert!(!contains_tag(&tags, "blue"));
    }
}
