//! Reconciliation: converge the materialized store on the source state.
//!
//! Split into a pure planner and a thin applier so the convergence
//! invariant is unit-testable without touching the filesystem:
//!
//! - [`plan`] takes the source batch, the ignore list and the set of
//!   currently materialized slugs, and returns explicit actions.
//! - [`apply`] performs the I/O with per-record failure isolation.
//! - [`sync_locale`] drives one read-plan-apply pass for one locale.
//! - [`sync_all`] loops the configured locales, isolating each locale's
//!   failures from the others.
//!
//! After a complete pass, the materialized slugs for a locale equal
//! exactly the non-ignored source slugs. Ignored slugs are removed from
//! the store even when they predate the ignore entry, and they are
//! excluded before the expected set is computed so the two delete steps
//! never overlap. A batch with unreadable records cannot tell a deleted
//! record from an unreadable one, so stale deletion is deferred until a
//! pass reads the source completely.

use anyhow::Result;
use rustc_hash::FxHashSet;
use std::fmt;

use crate::ignore::IgnoreList;
use crate::log;
use crate::normalize::Language;
use crate::record::ContentRecord;
use crate::source::{NoteSource, SourceBatch};
use crate::store::{ContentStore, Materialized};

/// Explicit actions for one locale's pass. Produced by [`plan`], pure.
#[derive(Debug, Default)]
pub struct SyncPlan {
    /// Records to materialize (create, update or skip decided later by
    /// the store's marker comparison).
    pub writes: Vec<ContentRecord>,
    /// Materialized slugs on the ignore list; their files are deleted.
    pub ignored: Vec<String>,
    /// Materialized slugs no longer present in the source. Empty when
    /// the batch had unreadable records: an absent record may be one of
    /// the failures, not a deletion.
    pub stale: Vec<String>,
}

/// Aggregate result of a pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncOutcome {
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    pub deleted: usize,
    pub failed: usize,
}

impl SyncOutcome {
    pub fn ok(&self) -> bool {
        self.failed == 0
    }

    pub fn absorb(&mut self, other: SyncOutcome) {
        self.created += other.created;
        self.updated += other.updated;
        self.skipped += other.skipped;
        self.deleted += other.deleted;
        self.failed += other.failed;
    }

    /// Total writes performed (for idempotence checks).
    pub fn writes(&self) -> usize {
        self.created + self.updated
    }
}

impl fmt::Display for SyncOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} created, {} updated, {} unchanged, {} deleted, {} failed",
            self.created, self.updated, self.skipped, self.deleted, self.failed
        )
    }
}

/// Compute the actions that converge the store on the source state.
///
/// Ignored slugs are dropped (and scheduled for deletion when currently
/// materialized) before the expected key set is computed, so `stale` and
/// `ignored` are disjoint. Stale deletion only happens when every source
/// record was read; ignore deletion is deliberate operator state and
/// runs either way.
pub fn plan(batch: SourceBatch, ignore: &IgnoreList, existing: &FxHashSet<String>) -> SyncPlan {
    let mut plan = SyncPlan::default();

    for slug in existing {
        if ignore.contains(slug) {
            plan.ignored.push(slug.clone());
        }
    }

    let complete = batch.failed == 0;
    let mut expected = FxHashSet::default();
    for record in batch.records {
        if ignore.contains(&record.slug) {
            continue;
        }
        expected.insert(record.slug.clone());
        plan.writes.push(record);
    }

    if complete {
        for slug in existing {
            if !expected.contains(slug) && !ignore.contains(slug) {
                plan.stale.push(slug.clone());
            }
        }
    }

    // Stable order for logs and tests
    plan.ignored.sort_unstable();
    plan.stale.sort_unstable();
    plan
}

/// Execute a plan against the store. All materializations happen before
/// any delete, so a renamed record is never dropped mid-pass. Failures
/// are logged with the offending slug and isolated per record.
pub fn apply(plan: SyncPlan, store: &ContentStore, lang: Language) -> SyncOutcome {
    let mut outcome = SyncOutcome::default();

    for record in &plan.writes {
        match store.materialize(record) {
            Ok(Materialized::Created) => outcome.created += 1,
            Ok(Materialized::Updated) => outcome.updated += 1,
            Ok(Materialized::Skipped) => outcome.skipped += 1,
            Err(e) => {
                log!("error"; "failed to materialize {}: {e}", record.key());
                outcome.failed += 1;
            }
        }
    }

    for slug in plan.ignored.iter().chain(plan.stale.iter()) {
        match store.remove(slug, lang) {
            Ok(true) => outcome.deleted += 1,
            Ok(false) => {}
            Err(e) => {
                log!("error"; "failed to delete {slug}.{lang}: {e}");
                outcome.failed += 1;
            }
        }
    }

    outcome
}

/// One full reconciliation pass for one locale.
pub fn sync_locale(
    source: &dyn NoteSource,
    lang: Language,
    ignore: &IgnoreList,
    store: &ContentStore,
) -> Result<SyncOutcome> {
    let batch = source.read(lang)?;
    let existing: FxHashSet<String> = store.scan(lang)?.into_keys().collect();

    let unreadable = batch.failed;
    if unreadable > 0 {
        log!(source.name(); "{lang}: {unreadable} unreadable record(s), stale cleanup deferred");
    }
    let plan = plan(batch, ignore, &existing);
    let mut outcome = apply(plan, store, lang);
    outcome.failed += unreadable;

    log!(source.name(); "{lang}: {outcome}");
    Ok(outcome)
}

/// Run a pass for every locale. A locale whose source read fails yields
/// an empty pass and one failure; the other locales still run.
pub fn sync_all(
    source: &dyn NoteSource,
    locales: &[Language],
    ignore: &IgnoreList,
    store: &ContentStore,
) -> SyncOutcome {
    let mut total = SyncOutcome::default();
    for &lang in locales {
        match sync_locale(source, lang, ignore, store) {
            Ok(outcome) => total.absorb(outcome),
            Err(e) => {
                log!("error"; "{}: sync for {lang} failed: {e}", source.name());
                total.failed += 1;
            }
        }
    }
    total
}
