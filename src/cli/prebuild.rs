//! `prebuild` command: source selection for the site build hook.
//!
//! Selection order: the `NOTES_SOURCE` environment flag when set, else
//! whichever source is actually configured (a resolvable vault first,
//! then Notion credentials). When neither is configured the build can
//! still proceed if the store already holds materialized content from an
//! earlier run; an empty store with no source is a hard failure.

use anyhow::{Result, bail};
use std::env;

use crate::config::SyncConfig;
use crate::log;
use crate::store::ContentStore;

pub fn run(config: &SyncConfig) -> Result<()> {
    match env::var("NOTES_SOURCE").as_deref() {
        Ok("obsidian") => return super::convert::run(config, None),
        Ok("notion") => return super::sync::run(config, None),
        Ok(other) if !other.is_empty() => {
            log!("prebuild"; "unknown NOTES_SOURCE {other:?}, falling back to auto-detection");
        }
        _ => {}
    }

    if config.resolve_vault().is_ok() {
        log!("prebuild"; "using obsidian source");
        return super::convert::run(config, None);
    }
    if config.has_notion_credentials() {
        log!("prebuild"; "using notion source");
        return super::sync::run(config, None);
    }

    let store = ContentStore::new(config.content_dir());
    if store.has_content() {
        log!("prebuild"; "no source configured, keeping existing content");
        return Ok(());
    }
    bail!(
        "no content source configured and {} is empty; \
         set NOTES_SOURCE, an Obsidian vault, or NOTION_TOKEN/NOTION_DATABASE_ID",
        config.content_dir().display()
    )
}
