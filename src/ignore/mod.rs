//! Persisted ignore list: slugs that must never be published.
//!
//! Stored as a JSON array of lowercase slug strings. A corrupt or missing
//! file degrades to an empty set with a log line; the ignore list must
//! never block a sync pass.

use anyhow::{Context, Result};
use rustc_hash::FxHashSet;
use std::{fs, path::PathBuf};

use crate::log;

/// Persisted set of slugs excluded from publication regardless of
/// source state.
#[derive(Debug)]
pub struct IgnoreList {
    path: PathBuf,
    slugs: FxHashSet<String>,
}

impl IgnoreList {
    /// Load from disk. Missing file means an empty list; a corrupt file
    /// is logged and treated as empty rather than aborting the sync.
    pub fn load(path: PathBuf) -> Self {
        let slugs = match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<Vec<String>>(&content) {
                Ok(list) => list.into_iter().map(|s| s.to_lowercase()).collect(),
                Err(e) => {
                    log!("ignore"; "corrupt ignore list {}: {e}, proceeding with empty set", path.display());
                    FxHashSet::default()
                }
            },
            Err(_) => FxHashSet::default(),
        };
        Self { path, slugs }
    }

    #[cfg(test)]
    pub fn in_memory(slugs: impl IntoIterator<Item = &'static str>) -> Self {
        Self {
            path: PathBuf::new(),
            slugs: slugs.into_iter().map(String::from).collect(),
        }
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.slugs.contains(slug)
    }

    pub fn len(&self) -> usize {
        self.slugs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slugs.is_empty()
    }

    /// Slugs in sorted order (for listings and stable serialization).
    pub fn sorted(&self) -> Vec<&str> {
        let mut list: Vec<&str> = self.slugs.iter().map(String::as_str).collect();
        list.sort_unstable();
        list
    }

    /// Add a slug. Returns whether the list changed (adding an existing
    /// slug is a no-op).
    pub fn append(&mut self, slug: &str) -> bool {
        self.slugs.insert(slug.to_lowercase())
    }

    /// Persist the list as a sorted JSON array (sorted for stable diffs).
    pub fn save(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.sorted())?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, json)
            .with_context(|| format!("failed to write ignore list {}", self.path.display()))
    }
}
