//! Slug derivation from titles and filenames.
//!
//! Slugs must preserve non-Latin scripts: the site publishes Chinese and
//! Japanese notes, so transliteration is not an option. A title made of
//! pure punctuation slugifies to nothing; that case falls back to a short
//! deterministic hash of the filename so the same file always gets the
//! same slug.

use rustc_hash::FxHasher;
use std::hash::Hasher;

/// Prefix for hash-fallback slugs (title slugified to empty)
const HASH_SLUG_PREFIX: &str = "note-";

/// Derive the canonical slug for a note.
///
/// Priority:
/// 1. An explicit slug from the source metadata, lowercased verbatim.
/// 2. The slugified title, falling back to a filename hash when the
///    title contains no slug-safe characters.
/// 3. The slugified filename (extension and language suffix already
///    stripped by the caller).
pub fn derive_slug(file_stem: &str, explicit: Option<&str>, title: Option<&str>) -> String {
    if let Some(explicit) = explicit
        && !explicit.trim().is_empty()
    {
        return explicit.trim().to_lowercase();
    }

    if let Some(title) = title
        && !title.trim().is_empty()
    {
        let slug = slugify(title);
        if !slug.is_empty() {
            return slug;
        }
        return hash_slug(file_stem);
    }

    let slug = slugify(file_stem);
    if slug.is_empty() {
        return hash_slug(file_stem);
    }
    slug
}

/// Slugify a string, preserving Unicode letters and digits.
///
/// Lowercases, drops everything that is not alphanumeric, whitespace,
/// underscore or hyphen, then collapses whitespace/underscore runs into
/// single hyphens and trims leading/trailing hyphens.
pub fn slugify(input: &str) -> String {
    let cleaned: String = input
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '-' || *c == '_')
        .collect();

    let mut slug = String::with_capacity(cleaned.len());
    let mut pending_hyphen = false;
    for c in cleaned.chars() {
        if c.is_whitespace() || c == '_' || c == '-' {
            pending_hyphen = !slug.is_empty();
        } else {
            if pending_hyphen {
                slug.push('-');
                pending_hyphen = false;
            }
            slug.push(c);
        }
    }
    slug
}

/// Deterministic fallback slug: `note-` + base-36 FxHash of the filename.
fn hash_slug(file_stem: &str) -> String {
    let mut hasher = FxHasher::default();
    hasher.write(file_stem.as_bytes());
    format!("{HASH_SLUG_PREFIX}{}", to_base36(hasher.finish()))
}

/// Render a u64 in base-36 (lowercase).
fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut buf = [0u8; 13];
    let mut i = buf.len();
    while n > 0 {
        i -= 1;
        buf[i] = DIGITS[(n % 36) as usize];
        n /= 36;
    }
    String::from_utf8_lossy(&buf[i..]).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_slug_wins() {
        assert_eq!(
            derive_slug("some-file", Some("My-Slug"), Some("A Title")),
            "my-slug"
        );
    }

    #[test]
    fn test_blank_explicit_ignored() {
        assert_eq!(derive_slug("file", Some("  "), Some("A Title")), "a-title");
    }

    #[test]
    fn test_title_slugified() {
        assert_eq!(derive_slug("file", None, Some("Getting Started")), "getting-started");
        assert_eq!(derive_slug("file", None, Some("Hello, World!")), "hello-world");
    }

    #[test]
    fn test_unicode_titles_preserved() {
        assert_eq!(derive_slug("f", None, Some("产品思考")), "产品思考");
        assert_eq!(derive_slug("f", None, Some("製品思考")), "製品思考");
        assert_eq!(derive_slug("f", None, Some("产品 思考")), "产品-思考");
    }

    #[test]
    fn test_punctuation_title_falls_back_to_hash() {
        let slug = derive_slug("notes/2024.md", None, Some("!!!"));
        assert!(slug.starts_with("note-"));
        assert!(slug.len() > "note-".len());
        // Deterministic for the same filename
        assert_eq!(slug, derive_slug("notes/2024.md", None, Some("???")));
        // Different filename, different hash
        assert_ne!(slug, derive_slug("notes/2025.md", None, Some("!!!")));
    }

    #[test]
    fn test_filename_fallback() {
        assert_eq!(derive_slug("My Note_v2", None, None), "my-note-v2");
    }

    #[test]
    fn test_empty_filename_falls_back_to_hash() {
        let slug = derive_slug("", None, None);
        assert!(slug.starts_with("note-"));
    }

    #[test]
    fn test_slugify_collapses_runs() {
        assert_eq!(slugify("a  b__c - d"), "a-b-c-d");
        assert_eq!(slugify("--trimmed--"), "trimmed");
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("..."), "");
    }

    #[test]
    fn test_slug_deterministic() {
        for _ in 0..3 {
            assert_eq!(derive_slug("x", None, Some("产品思考")), "产品思考");
        }
    }

    #[test]
    fn test_to_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
    }
}
