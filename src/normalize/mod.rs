//! Canonicalization of raw source metadata.
//!
//! Source notes arrive with inconsistently-shaped metadata: filenames with
//! or without language suffixes, frontmatter fields in several spellings,
//! dates in several formats, tags as lists or delimited strings. Everything
//! downstream (the store, the reconciler) works on the canonical forms
//! produced here.

pub mod date;
pub mod lang;
pub mod slug;
pub mod tags;

pub use date::normalize_date;
pub use lang::Language;
pub use slug::{derive_slug, slugify};
pub use tags::normalize_tags;
