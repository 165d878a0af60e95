//! `sync` command: Notion database -> content store.

use anyhow::Result;

use crate::config::SyncConfig;
use crate::normalize::Language;
use crate::source::notion::NotionSource;

pub fn run(config: &SyncConfig, locale: Option<Language>) -> Result<()> {
    let client = config.notion_client()?;
    let source = NotionSource::new(client);
    super::run_passes(config, &source, locale)
}
