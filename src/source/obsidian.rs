//! Obsidian vault reader: recursive Markdown walk + frontmatter parse.
//!
//! Filename language suffixes (`note.ja.md`, `note.jp.md`) take priority
//! over the frontmatter `language` field. Files for other locales are
//! skipped, not failed; files that cannot be read are logged with their
//! path and counted as failures without stopping the walk.

use anyhow::Result;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::normalize::{Language, derive_slug, normalize_date, normalize_tags};
use crate::record::{ContentRecord, DEFAULT_KIND, header};
use crate::rewrite::rewrite_links;
use crate::source::{NoteSource, SourceBatch};
use crate::{debug, log};

/// Max length of a summary derived from the body.
const SUMMARY_MAX_CHARS: usize = 100;

/// Filesystem note source rooted at an Obsidian vault.
pub struct ObsidianSource {
    vault: PathBuf,
}

impl ObsidianSource {
    /// The vault path must already be resolved (see
    /// `SyncConfig::resolve_vault`, which reports every attempted path
    /// when nothing resolves).
    pub fn new(vault: PathBuf) -> Self {
        Self { vault }
    }

    fn read_note(&self, path: &Path, lang: Language) -> Result<Option<ContentRecord>> {
        let content = fs::read_to_string(path)?;
        let parsed = header::parse(&content);

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        let stem = file_name.strip_suffix(".md").unwrap_or(file_name);
        let (stem, suffix) = split_lang_suffix(stem);

        let language = Language::infer(suffix, parsed.str_field("language"));
        if language != lang {
            return Ok(None);
        }

        let title = parsed
            .str_field("title")
            .filter(|t| !t.trim().is_empty())
            .map(String::from)
            .unwrap_or_else(|| stem.to_string());
        let slug = derive_slug(stem, parsed.str_field("slug"), Some(&title));

        let updated_at = match parsed
            .str_field("updated")
            .or_else(|| parsed.str_field("updatedAt"))
            .or_else(|| parsed.str_field("date"))
        {
            Some(raw) => normalize_date(raw),
            None => normalize_date(&mtime_string(path)),
        };

        let body = rewrite_links(&parsed.body, language);
        let summary = parsed
            .str_field("summary")
            .or_else(|| parsed.str_field("description"))
            .map(String::from)
            .unwrap_or_else(|| summary_from_body(&body));

        Ok(Some(ContentRecord {
            slug,
            language,
            title,
            summary,
            tags: normalize_tags(parsed.fields.get("tags")),
            category: parsed.str_field("category").unwrap_or_default().to_string(),
            kind: parsed
                .str_field("type")
                .filter(|t| !t.trim().is_empty())
                .unwrap_or(DEFAULT_KIND)
                .to_string(),
            updated_at,
            body,
        }))
    }
}

impl NoteSource for ObsidianSource {
    fn name(&self) -> &'static str {
        "obsidian"
    }

    fn read(&self, lang: Language) -> Result<SourceBatch> {
        let mut batch = SourceBatch::default();

        for entry in jwalk::WalkDir::new(&self.vault).sort(true) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log!("obsidian"; "unreadable entry in vault: {e}");
                    batch.failed += 1;
                    continue;
                }
            };
            let path = entry.path();
            if !entry.file_type().is_file()
                || path.extension().is_none_or(|ext| ext != "md")
            {
                continue;
            }

            match self.read_note(&path, lang) {
                Ok(Some(record)) => {
                    debug!("obsidian"; "read {} ({})", record.slug, record.language);
                    batch.records.push(record);
                }
                Ok(None) => {} // other locale
                Err(e) => {
                    log!("obsidian"; "failed to read {}: {e}", path.display());
                    batch.failed += 1;
                }
            }
        }

        Ok(batch)
    }
}

/// Split a trailing language suffix off a file stem:
/// `note.ja` -> (`note`, Some("ja")).
fn split_lang_suffix(stem: &str) -> (&str, Option<&str>) {
    if let Some((base, suffix)) = stem.rsplit_once('.')
        && Language::from_suffix(suffix).is_some()
        && !base.is_empty()
    {
        return (base, Some(suffix));
    }
    (stem, None)
}

/// First non-heading body line, truncated to a char limit.
fn summary_from_body(body: &str) -> String {
    let line = body
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty() && !l.starts_with('#'))
        .unwrap_or_default();
    if line.chars().count() <= SUMMARY_MAX_CHARS {
        line.to_string()
    } else {
        line.chars().take(SUMMARY_MAX_CHARS).collect()
    }
}

/// File mtime as a parseable timestamp string (empty on failure, which
/// makes `normalize_date` fall back to now).
fn mtime_string(path: &Path) -> String {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
        .map(|d| crate::normalize::date::DateTimeUtc::from_unix(d.as_secs()).to_rfc3339())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_note(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_walk_collects_markdown_at_depth() {
        let dir = TempDir::new().unwrap();
        write_note(dir.path(), "a.md", "---\ntitle: A\n---\nbody");
        write_note(dir.path(), "sub/deep/b.md", "---\ntitle: B\n---\nbody");
        write_note(dir.path(), "sub/ignored.txt", "not markdown");

        let source = ObsidianSource::new(dir.path().to_path_buf());
        let batch = source.read(Language::Zh).unwrap();
        assert_eq!(batch.records.len(), 2);
        assert_eq!(batch.failed, 0);
    }

    #[test]
    fn test_filename_suffix_beats_frontmatter() {
        let dir = TempDir::new().unwrap();
        write_note(
            dir.path(),
            "note.ja.md",
            "---\ntitle: X\nlanguage: zh\n---\nbody",
        );

        let source = ObsidianSource::new(dir.path().to_path_buf());
        assert_eq!(source.read(Language::Zh).unwrap().records.len(), 0);
        let ja = source.read(Language::Ja).unwrap();
        assert_eq!(ja.records.len(), 1);
        assert_eq!(ja.records[0].language, Language::Ja);
    }

    #[test]
    fn test_jp_suffix_alias() {
        let dir = TempDir::new().unwrap();
        write_note(dir.path(), "note.jp.md", "---\ntitle: X\n---\nbody");
        let source = ObsidianSource::new(dir.path().to_path_buf());
        assert_eq!(source.read(Language::Ja).unwrap().records.len(), 1);
    }

    #[test]
    fn test_slug_priority_and_suffix_stripping() {
        let dir = TempDir::new().unwrap();
        write_note(dir.path(), "My Note.zh.md", "no frontmatter here");
        let source = ObsidianSource::new(dir.path().to_path_buf());
        let batch = source.read(Language::Zh).unwrap();
        // Title falls back to the stem with extension + suffix stripped
        assert_eq!(batch.records[0].slug, "my-note");
        assert_eq!(batch.records[0].title, "My Note");
    }

    #[test]
    fn test_explicit_slug_field() {
        let dir = TempDir::new().unwrap();
        write_note(
            dir.path(),
            "x.md",
            "---\ntitle: Some Title\nslug: Custom-Slug\n---\nbody",
        );
        let source = ObsidianSource::new(dir.path().to_path_buf());
        let batch = source.read(Language::Zh).unwrap();
        assert_eq!(batch.records[0].slug, "custom-slug");
    }

    #[test]
    fn test_body_rewritten_and_summary_derived() {
        let dir = TempDir::new().unwrap();
        write_note(
            dir.path(),
            "n.md",
            "---\ntitle: N\ndate: 2024-01-15\n---\n# Head\n\nSee [[Getting Started]]\n",
        );
        let source = ObsidianSource::new(dir.path().to_path_buf());
        let rec = &source.read(Language::Zh).unwrap().records[0];
        assert!(rec.body.contains("[Getting Started](/zh/notes/getting-started)"));
        assert_eq!(rec.summary, "See [Getting Started](/zh/notes/getting-started)");
        assert_eq!(rec.updated_at, "2024-01-15T00:00:00Z");
    }

    #[test]
    fn test_tags_and_category() {
        let dir = TempDir::new().unwrap();
        write_note(
            dir.path(),
            "t.md",
            "---\ntitle: T\ntags: a, b\ncategory: product\n---\nbody",
        );
        let source = ObsidianSource::new(dir.path().to_path_buf());
        let rec = &source.read(Language::Zh).unwrap().records[0];
        assert_eq!(rec.tags, vec!["a", "b"]);
        assert_eq!(rec.category, "product");
        assert_eq!(rec.kind, "note");
    }

    #[test]
    fn test_split_lang_suffix() {
        assert_eq!(split_lang_suffix("note.ja"), ("note", Some("ja")));
        assert_eq!(split_lang_suffix("note.en"), ("note.en", None));
        assert_eq!(split_lang_suffix("note"), ("note", None));
        assert_eq!(split_lang_suffix(".zh"), (".zh", None));
    }
}
