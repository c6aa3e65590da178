//! Slug generation for mixes and catalog entries

use chrono::Utc;

/// Lowercase a name and collapse whitespace runs into single hyphens
pub fn slugify(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Slug with a millisecond-timestamp suffix to guarantee uniqueness
/// across mixes that share a name
pub fn unique_slug(name: &str) -> String {
    format!("{}-{}", slugify(name), Utc::now().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_lowercases_and_hyphenates() {
        assert_eq!(slugify("Summer Breeze"), "summer-breeze");
        assert_eq!(slugify("  Double  Apple  "), "double-apple");
        assert_eq!(slugify("MINT"), "mint");
    }

    #[test]
    fn unique_slug_keeps_name_prefix() {
        let slug = unique_slug("Summer Breeze");
        assert!(slug.starts_with("summer-breeze-"));
        let suffix = &slug["summer-breeze-".len()..];
        assert!(suffix.chars().all(|c| c.is_ascii_digit()));
    }
}
