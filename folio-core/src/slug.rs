//! Slug conformance and derivation.

use regex::Regex;
use std::sync::OnceLock;

/// Pattern every public document slug must match
pub const SLUG_PATTERN: &str = r"^[a-z0-9-]+$";

static SLUG_REGEX: OnceLock<Regex> = OnceLock::new();

pub(crate) fn slug_regex() -> &'static Regex {
    SLUG_REGEX.get_or_init(|| Regex::new(SLUG_PATTERN).expect("slug pattern is a valid regex"))
}

/// Check whether a string is usable as a routing slug
///
/// # Examples
///
/// ```
/// use folio_core::is_valid_slug;
///
/// assert!(is_valid_slug("welcome-to-2024"));
/// assert!(!is_valid_slug("Hello World"));
/// assert!(!is_valid_slug(""));
/// ```
pub fn is_valid_slug(input: &str) -> bool {
    slug_regex().is_match(input)
}

/// Derive the slug of a tag from its display name
///
/// Lower-cases the name and replaces spaces with hyphens. Nothing else is
/// stripped, so the result is only guaranteed to be a valid slug for names
/// made of ASCII letters, digits and spaces (which all tag literals are).
///
/// ```
/// use folio_core::tag_slug;
///
/// assert_eq!(tag_slug("Development"), "development");
/// assert_eq!(tag_slug("Release Notes"), "release-notes");
/// ```
pub fn tag_slug(name: &str) -> String {
    name.to_lowercase().replace(' ', "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_slugs() {
        assert!(is_valid_slug("hello-world"));
        assert!(is_valid_slug("2024"));
        assert!(is_valid_slug("-"));
    }

    #[test]
    fn test_invalid_slugs() {
        assert!(!is_valid_slug("Hello"));
        assert!(!is_valid_slug("hello_world"));
        assert!(!is_valid_slug("hello world"));
        assert!(!is_valid_slug("café"));
        assert!(!is_valid_slug("trailing\n"));
    }

    #[test]
    fn test_tag_slug() {
        assert_eq!(tag_slug("Announcement"), "announcement");
        assert_eq!(tag_slug("Multiple  Spaces"), "multiple--spaces");
        assert_eq!(tag_slug("UPPER"), "upper");
    }
}
