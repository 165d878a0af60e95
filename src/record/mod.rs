//! The canonical content record.

pub mod header;

use crate::normalize::Language;

/// Default `type` classification for records without one.
pub const DEFAULT_KIND: &str = "note";

/// One normalized unit of content, keyed by (slug, language).
///
/// Materializing a record with the same key overwrites the previous file
/// entirely; records are never merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRecord {
    /// Canonical identifier, lowercase, unique per (slug, language).
    pub slug: String,
    pub language: Language,
    pub title: String,
    pub summary: String,
    /// Ordered, not deduplicated.
    pub tags: Vec<String>,
    /// Empty string means unclassified.
    pub category: String,
    /// Free-form classification, defaults to [`DEFAULT_KIND`].
    pub kind: String,
    /// Canonical timestamp of the source's last update. Compared verbatim
    /// against the previously materialized value to decide skip-vs-write.
    pub updated_at: String,
    /// Normalized Markdown body, source link syntax already rewritten.
    pub body: String,
}

impl ContentRecord {
    /// Store key: `slug.lang`.
    pub fn key(&self) -> String {
        format!("{}.{}", self.slug, self.language.tag())
    }

    /// Output file name in the content store: `slug.lang.md`.
    pub fn file_name(&self) -> String {
        format!("{}.md", self.key())
    }
}

/// Build the `slug.lang.md` file name for a key.
pub fn file_name_for(slug: &str, language: Language) -> String {
    format!("{slug}.{}.md", language.tag())
}
