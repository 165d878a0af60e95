//! The materialized content store: one Markdown file per (slug, language).
//!
//! Files are named `slug.lang.md` inside a single flat directory. The
//! incremental-sync marker is the `updatedAt` field inside each file's own
//! header, not a side index, so the store stays self-describing.

use anyhow::{Context, Result};
use rustc_hash::FxHashMap;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::debug;
use crate::normalize::Language;
use crate::record::{ContentRecord, header};

/// Outcome of materializing one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Materialized {
    Created,
    Updated,
    /// Source marker matched the previously materialized one.
    Skipped,
}

/// Materialized content store rooted at one directory.
#[derive(Debug, Clone)]
pub struct ContentStore {
    dir: PathBuf,
}

impl ContentStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write (or update) the file for a record, skipping when the source
    /// modification marker is unchanged.
    ///
    /// The comparison is an exact string match on `updatedAt`: a source
    /// edit that does not bump the date is skipped, matching the
    /// reference behavior.
    pub fn materialize(&self, record: &ContentRecord) -> Result<Materialized> {
        let path = self.dir.join(record.file_name());

        let existing_marker = fs::read_to_string(&path)
            .ok()
            .and_then(|content| header::parse(&content).str_field("updatedAt").map(String::from));

        match existing_marker {
            Some(marker) if marker == record.updated_at => {
                debug!("store"; "unchanged: {}", record.key());
                return Ok(Materialized::Skipped);
            }
            Some(_) => {
                self.write_atomic(&path, &header::serialize(record))?;
                Ok(Materialized::Updated)
            }
            None => {
                self.write_atomic(&path, &header::serialize(record))?;
                Ok(Materialized::Created)
            }
        }
    }

    /// Existing store entries for one locale: slug -> file path.
    pub fn scan(&self, lang: Language) -> Result<FxHashMap<String, PathBuf>> {
        let suffix = format!(".{}.md", lang.tag());
        let mut entries = FxHashMap::default();

        let dir = match fs::read_dir(&self.dir) {
            Ok(dir) => dir,
            // Nothing materialized yet
            Err(_) => return Ok(entries),
        };

        for entry in dir {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if let Some(slug) = name.strip_suffix(&suffix)
                && !slug.is_empty()
            {
                entries.insert(slug.to_string(), entry.path());
            }
        }
        Ok(entries)
    }

    /// Delete the file for a (slug, language) key. Returns whether a file
    /// was actually removed.
    pub fn remove(&self, slug: &str, lang: Language) -> Result<bool> {
        let path = self.dir.join(crate::record::file_name_for(slug, lang));
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("failed to delete {}", path.display()))?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Whether the store holds any materialized content at all.
    pub fn has_content(&self) -> bool {
        fs::read_dir(&self.dir)
            .map(|mut dir| {
                dir.any(|e| {
                    e.map(|e| e.path().extension().is_some_and(|ext| ext == "md"))
                        .unwrap_or(false)
                })
            })
            .unwrap_or(false)
    }

    /// Write via temp file + rename so a concurrent reader never observes
    /// a half-written file.
    fn write_atomic(&self, path: &Path, content: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create {}", self.dir.display()))?;
        let tmp = path.with_extension("md.tmp");
        fs::write(&tmp, content).with_context(|| format!("failed to write {}", tmp.display()))?;
        fs::rename(&tmp, path)
            .with_context(|| format!("failed to replace {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::DEFAULT_KIND;
    use tempfile::TempDir;

    fn record(slug: &str, lang: Language, marker: &str) -> ContentRecord {
        ContentRecord {
            slug: slug.into(),
            language: lang,
            title: slug.to_uppercase(),
            summary: String::new(),
            tags: vec!["t".into()],
            category: String::new(),
            kind: DEFAULT_KIND.into(),
            updated_at: marker.into(),
            body: "body\n".into(),
        }
    }

    #[test]
    fn test_create_then_skip_then_update() {
        let dir = TempDir::new().unwrap();
        let store = ContentStore::new(dir.path().to_path_buf());
        let r = record("hello", Language::Zh, "2024-01-15T10:00:00Z");

        assert_eq!(store.materialize(&r).unwrap(), Materialized::Created);
        // Same marker twice: exactly one write, two no-op detections
        assert_eq!(store.materialize(&r).unwrap(), Materialized::Skipped);
        assert_eq!(store.materialize(&r).unwrap(), Materialized::Skipped);

        let bumped = record("hello", Language::Zh, "2024-02-01T00:00:00Z");
        assert_eq!(store.materialize(&bumped).unwrap(), Materialized::Updated);
    }

    #[test]
    fn test_overwrite_replaces_not_merges() {
        let dir = TempDir::new().unwrap();
        let store = ContentStore::new(dir.path().to_path_buf());

        let mut r = record("hello", Language::Zh, "2024-01-15T10:00:00Z");
        r.tags = vec!["old".into()];
        store.materialize(&r).unwrap();

        let mut r2 = record("hello", Language::Zh, "2024-02-01T00:00:00Z");
        r2.tags = vec![];
        store.materialize(&r2).unwrap();

        let content = fs::read_to_string(dir.path().join("hello.zh.md")).unwrap();
        assert!(!content.contains("old"));
    }

    #[test]
    fn test_scan_is_locale_scoped() {
        let dir = TempDir::new().unwrap();
        let store = ContentStore::new(dir.path().to_path_buf());
        store
            .materialize(&record("a", Language::Zh, "2024-01-01T00:00:00Z"))
            .unwrap();
        store
            .materialize(&record("a", Language::Ja, "2024-01-01T00:00:00Z"))
            .unwrap();
        store
            .materialize(&record("b", Language::Zh, "2024-01-01T00:00:00Z"))
            .unwrap();

        let zh = store.scan(Language::Zh).unwrap();
        assert_eq!(zh.len(), 2);
        assert!(zh.contains_key("a") && zh.contains_key("b"));

        let ja = store.scan(Language::Ja).unwrap();
        assert_eq!(ja.len(), 1);
    }

    #[test]
    fn test_scan_missing_dir_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = ContentStore::new(dir.path().join("nope"));
        assert!(store.scan(Language::Zh).unwrap().is_empty());
        assert!(!store.has_content());
    }

    #[test]
    fn test_remove() {
        let dir = TempDir::new().unwrap();
        let store = ContentStore::new(dir.path().to_path_buf());
        store
            .materialize(&record("a", Language::Zh, "2024-01-01T00:00:00Z"))
            .unwrap();
        assert!(store.remove("a", Language::Zh).unwrap());
        assert!(!store.remove("a", Language::Zh).unwrap());
    }

    #[test]
    fn test_no_tmp_files_left_behind() {
        let dir = TempDir::new().unwrap();
        let store = ContentStore::new(dir.path().to_path_buf());
        store
            .materialize(&record("a", Language::Zh, "2024-01-01T00:00:00Z"))
            .unwrap();
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().is_some_and(|x| x == "tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
