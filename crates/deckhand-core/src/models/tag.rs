//! Tag list helpers
//!
//! Notes keep tags as a plain list in memory. Canonicalization (trimming,
//! case-insensitive de-duplication, ordering) happens when a note is
//! persisted.

use std::collections::HashSet;

/// Split a space-separated tag string into tags
pub fn split_tags(tags: &str) -> Vec<String> {
    tags.split_whitespace().map(str::to_string).collect()
}

/// Join tags into the stored form: space separated with a leading and
/// trailing space, or empty when there are no tags
pub fn join_tags(tags: &[String]) -> String {
    if tags.is_empty() {
        String::new()
    } else {
        format!(" {} ", tags.join(" "))
    }
}

/// Canonical tag list.
///
/// Tags are trimmed, entries that contain whitespace are split, duplicates
/// are removed ignoring case (the first spelling wins) and the result is
/// sorted case-insensitively.
///
/// # Examples
///
/// ```
/// use deckhand_core::models::canonify_tags;
///
/// let tags = vec!["verb".to_string(), "Noun".to_string(), "VERB".to_string()];
/// assert_eq!(canonify_tags(&tags), vec!["Noun", "verb"]);
/// ```
#[must_use]
pub fn canonify_tags(tags: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut canonical: Vec<String> = tags
        .iter()
        .flat_map(|tag| tag.split_whitespace())
        .filter(|tag| seen.insert(tag.to_lowercase()))
        .map(str::to_string)
        .collect();
    canonical.sort_by_key(|tag| tag.to_lowercase());
    canonical
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| (*value).to_string()).collect()
    }

    #[test]
    fn split_tags_ignores_extra_whitespace() {
        assert_eq!(split_tags("  one  two\tthree "), tags(&["one", "two", "three"]));
        assert!(split_tags("   ").is_empty());
    }

    #[test]
    fn join_tags_pads_with_spaces() {
        assert_eq!(join_tags(&tags(&["a", "b"])), " a b ");
        assert_eq!(join_tags(&[]), "");
    }

    #[test]
    fn canonify_collapses_case_duplicates() {
        let canonical = canonify_tags(&tags(&["Zeta", "alpha", "ALPHA", " beta ", "zeta"]));
        assert_eq!(canonical, tags(&["alpha", "beta", "Zeta"]));
    }

    #[test]
    fn canonify_splits_embedded_whitespace() {
        assert_eq!(canonify_tags(&tags(&["one two"])), tags(&["one", "two"]));
    }
}
