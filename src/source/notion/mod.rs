//! Notion database reader.
//!
//! Queries the configured database for published notes in one locale,
//! decodes properties through the typed decoder, fetches each page's
//! block tree and renders it to Markdown. Records missing a required
//! property (title, slug or language) or not marked published are
//! dropped with a log line; a failed block fetch fails that record only.

pub mod blocks;
pub mod client;
pub mod props;

use anyhow::Result;

pub use client::{NotionClient, NotionPage};

use crate::normalize::{Language, derive_slug, normalize_date};
use crate::record::{ContentRecord, DEFAULT_KIND};
use crate::source::{NoteSource, SourceBatch};
use crate::{debug, log};

/// Remote note source backed by a Notion database.
pub struct NotionSource {
    client: NotionClient,
}

impl NotionSource {
    pub fn new(client: NotionClient) -> Self {
        Self { client }
    }

    fn to_record(&self, page: &NotionPage, lang: Language) -> Result<Option<ContentRecord>> {
        let p = &page.properties;

        // Required fields; the query filter should guarantee these but a
        // half-filled row must not take down the pass.
        let (Some(title), Some(slug_raw), Some(lang_raw)) = (
            props::text(p, "Title").or_else(|| props::text(p, "Name")),
            props::text(p, "Slug"),
            props::text(p, "Language"),
        ) else {
            debug!("notion"; "skipping {}: missing title, slug or language", page.id);
            return Ok(None);
        };
        // Published is filtered server-side; drop anything that slips
        // through (a cached or hand-fed page set must not leak drafts).
        if !props::flag(p, "Published") {
            debug!("notion"; "skipping {}: not published", page.id);
            return Ok(None);
        }
        let Some(language) = Language::from_field(&lang_raw) else {
            debug!("notion"; "skipping {}: unknown language {lang_raw:?}", page.id);
            return Ok(None);
        };
        if language != lang {
            return Ok(None);
        }

        let updated_at = match props::text(p, "Date").or_else(|| page.last_edited.clone()) {
            Some(raw) => normalize_date(&raw),
            None => normalize_date(""),
        };

        let blocks = self.client.page_blocks(&page.id)?;
        let body = blocks::to_markdown(&blocks);

        let tags = props::list(p, "Tags");
        Ok(Some(ContentRecord {
            slug: derive_slug(&page.id, Some(&slug_raw), Some(&title)),
            language,
            title,
            summary: props::text(p, "Summary").unwrap_or_default(),
            tags,
            category: props::text(p, "Category").unwrap_or_default(),
            kind: props::text(p, "Type").unwrap_or_else(|| DEFAULT_KIND.to_string()),
            updated_at,
            body,
        }))
    }
}

impl NoteSource for NotionSource {
    fn name(&self) -> &'static str {
        "notion"
    }

    fn read(&self, lang: Language) -> Result<SourceBatch> {
        let pages = self.client.query_notes(lang)?;
        debug!("notion"; "query returned {} page(s) for {lang}", pages.len());

        let mut batch = SourceBatch::default();
        for page in &pages {
            match self.to_record(page, lang) {
                Ok(Some(record)) => batch.records.push(record),
                Ok(None) => {}
                Err(e) => {
                    log!("notion"; "failed to read page {}: {e}", page.id);
                    batch.failed += 1;
                }
            }
        }
        Ok(batch)
    }
}
