//! `overrides` command: operate the metadata override table.
//!
//! The admin HTTP endpoint wraps the same operations; this surface exists
//! for local operation and scripting. Output goes to stdout as JSON so it
//! can be piped.

use anyhow::{Context, Result, bail};
use serde_json::{Map, Value, json};
use std::fs;

use crate::cli::OverrideAction;
use crate::config::SyncConfig;
use crate::log;
use crate::overrides::OverrideStore;

pub fn run(config: &SyncConfig, action: &OverrideAction) -> Result<()> {
    let mut store = OverrideStore::load(config.overrides_file());

    match action {
        OverrideAction::Get { slug } => {
            let value = store.get(slug);
            println!("{}", serde_json::to_string_pretty(&value)?);
            return Ok(());
        }
        OverrideAction::SetEnabled { slug, enabled } => {
            store.patch(slug, &single_field("enabled", json!(enabled)))?;
            log!("overrides"; "{slug}: enabled = {enabled}");
        }
        OverrideAction::SetCategory { slug, category } => {
            store.patch(slug, &single_field("category", json!(category)))?;
            log!("overrides"; "{slug}: category = {category}");
        }
        OverrideAction::Patch { slug, fields } => {
            let fields: Map<String, Value> = serde_json::from_str(fields)
                .context("patch fields must be a JSON object")?;
            store.patch(slug, &fields)?;
            log!("overrides"; "{slug}: patched {} field(s)", fields.len());
        }
        OverrideAction::Batch { file } => {
            let content = fs::read_to_string(file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let patches: Map<String, Value> = serde_json::from_str(&content)
                .context("batch file must be a JSON object of {slug: fields}")?;
            let all_ok = store.patch_many(&patches);
            store.save()?;
            if !all_ok {
                bail!("some patches failed, successful ones were saved");
            }
            log!("overrides"; "patched {} slug(s)", patches.len());
            return Ok(());
        }
    }

    store.save()?;
    Ok(())
}

fn single_field(key: &str, value: Value) -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert(key.to_string(), value);
    fields
}
