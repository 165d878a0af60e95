//! CLI argument definitions and command drivers.

mod args;
pub mod convert;
pub mod ignore;
pub mod overrides;
pub mod prebuild;
pub mod sync;

pub use args::{Cli, Commands, IgnoreAction, OverrideAction};

use anyhow::{Result, bail};

use crate::config::SyncConfig;
use crate::ignore::IgnoreList;
use crate::log;
use crate::normalize::Language;
use crate::reconcile::sync_all;
use crate::source::NoteSource;
use crate::store::ContentStore;

/// Shared driver for `convert` and `sync`: run one reconciliation pass
/// per locale and fail the invocation when any locale or record failed.
pub fn run_passes(
    config: &SyncConfig,
    source: &dyn NoteSource,
    locale: Option<Language>,
) -> Result<()> {
    let ignore = IgnoreList::load(config.ignore_file());
    let store = ContentStore::new(config.content_dir());
    let locales = match locale {
        Some(locale) => vec![locale],
        None => config.site.locales.clone(),
    };

    let outcome = sync_all(source, &locales, &ignore, &store);
    log!(source.name(); "total: {outcome}");

    if !outcome.ok() {
        bail!("sync finished with {} failure(s)", outcome.failed);
    }
    Ok(())
}
