//! `convert` command: Obsidian vault -> content store.

use anyhow::Result;

use crate::config::SyncConfig;
use crate::log;
use crate::normalize::Language;
use crate::source::obsidian::ObsidianSource;

pub fn run(config: &SyncConfig, locale: Option<Language>) -> Result<()> {
    let vault = config.resolve_vault()?;
    log!("convert"; "vault: {}", vault.display());

    let source = ObsidianSource::new(vault);
    super::run_passes(config, &source, locale)
}
