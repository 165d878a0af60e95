//! Note sources: where raw content comes from.
//!
//! Both sources implement the same contract: read everything for one
//! locale and return fully normalized records. Per-record problems are
//! logged and counted, never fatal; a failure to reach the source at all
//! surfaces as an `Err` and is isolated per locale by the caller.

pub mod notion;
pub mod obsidian;

use anyhow::Result;

use crate::normalize::Language;
use crate::record::ContentRecord;

/// One locale's worth of source reads.
#[derive(Debug, Default)]
pub struct SourceBatch {
    pub records: Vec<ContentRecord>,
    /// Records that could not be read or normalized (logged individually).
    pub failed: usize,
}

/// A source of notes for the content store.
pub trait NoteSource {
    /// Short name for log prefixes.
    fn name(&self) -> &'static str;

    /// Read all current records for a locale.
    fn read(&self, lang: Language) -> Result<SourceBatch>;
}
