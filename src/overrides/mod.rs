//! Operator metadata overrides: a side table merged onto content at read
//! time.
//!
//! Keyed by slug. An override never replaces a record, it patches named
//! fields (shallow merge); everything else keeps its derived default.
//! Batch patches apply independently per slug so one bad patch cannot
//! block the rest.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{fs, io, path::PathBuf};
use thiserror::Error;

use crate::log;

/// Classified persistence failure, surfaced to the operator-facing caller.
#[derive(Debug, Error)]
pub enum OverrideError {
    #[error("overrides file not found: {0}")]
    NotFound(PathBuf),
    #[error("permission denied writing {0}")]
    Permission(PathBuf),
    #[error("overrides file is corrupt: {0}")]
    Corrupt(String),
    #[error("unknown field shape for {slug}: patch must be a JSON object")]
    BadPatch { slug: String },
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Per-slug publish-state override.
///
/// `extra` captures any additional patched fields so the shallow-merge
/// contract covers operator-defined keys too.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetadataOverride {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(flatten, default)]
    pub extra: Map<String, Value>,
}

fn default_true() -> bool {
    true
}

impl Default for MetadataOverride {
    fn default() -> Self {
        Self {
            enabled: true,
            category: None,
            extra: Map::new(),
        }
    }
}

/// JSON-file-backed override store: `{ "<slug>": { ... }, ... }`.
#[derive(Debug)]
pub struct OverrideStore {
    path: PathBuf,
    entries: Map<String, Value>,
}

impl OverrideStore {
    /// Load from disk, degrading to an empty table when the file is
    /// missing or corrupt (logged; overrides must never block reads).
    pub fn load(path: PathBuf) -> Self {
        let entries = match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<Map<String, Value>>(&content) {
                Ok(map) => map,
                Err(e) => {
                    log!("overrides"; "corrupt overrides file {}: {e}, starting empty", path.display());
                    Map::new()
                }
            },
            Err(_) => Map::new(),
        };
        Self { path, entries }
    }

    /// Override for a slug, or the defaults when none was ever written.
    pub fn get(&self, slug: &str) -> MetadataOverride {
        self.entries
            .get(slug)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
            .unwrap_or_default()
    }

    /// Shallow-merge a patch onto one slug's override: only the named
    /// fields are replaced, all others are retained.
    pub fn patch(&mut self, slug: &str, fields: &Map<String, Value>) -> Result<(), OverrideError> {
        let entry = self
            .entries
            .entry(slug.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        let Some(obj) = entry.as_object_mut() else {
            return Err(OverrideError::BadPatch {
                slug: slug.to_string(),
            });
        };
        for (key, value) in fields {
            obj.insert(key.clone(), value.clone());
        }
        Ok(())
    }

    /// Apply patches independently per slug. Returns whether every patch
    /// succeeded; individual failures are logged and do not block others.
    pub fn patch_many(&mut self, patches: &Map<String, Value>) -> bool {
        let mut all_ok = true;
        for (slug, fields) in patches {
            match fields.as_object() {
                Some(fields) => {
                    if let Err(e) = self.patch(slug, fields) {
                        log!("overrides"; "patch failed for {slug}: {e}");
                        all_ok = false;
                    }
                }
                None => {
                    log!("overrides"; "patch failed for {slug}: not a JSON object");
                    all_ok = false;
                }
            }
        }
        all_ok
    }

    /// Persist the table, classifying low-level failures.
    pub fn save(&self) -> Result<(), OverrideError> {
        let json = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| OverrideError::Corrupt(e.to_string()))?;
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| self.classify(e))?;
        }
        fs::write(&self.path, json).map_err(|e| self.classify(e))
    }

    fn classify(&self, e: io::Error) -> OverrideError {
        match e.kind() {
            io::ErrorKind::NotFound => OverrideError::NotFound(self.path.clone()),
            io::ErrorKind::PermissionDenied => OverrideError::Permission(self.path.clone()),
            _ => OverrideError::Io(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn fields(v: Value) -> Map<String, Value> {
        v.as_object().unwrap().clone()
    }

    #[test]
    fn test_default_when_absent() {
        let dir = TempDir::new().unwrap();
        let store = OverrideStore::load(dir.path().join("o.json"));
        let o = store.get("nothing");
        assert!(o.enabled);
        assert!(o.category.is_none());
    }

    #[test]
    fn test_patch_is_shallow_merge() {
        let dir = TempDir::new().unwrap();
        let mut store = OverrideStore::load(dir.path().join("o.json"));

        store
            .patch("hello", &fields(json!({"enabled": false, "pinned": true})))
            .unwrap();
        // Second patch names only category; enabled and pinned survive
        store
            .patch("hello", &fields(json!({"category": "product"})))
            .unwrap();

        let o = store.get("hello");
        assert!(!o.enabled);
        assert_eq!(o.category.as_deref(), Some("product"));
        assert_eq!(o.extra.get("pinned"), Some(&json!(true)));
    }

    #[test]
    fn test_patch_many_isolation() {
        let dir = TempDir::new().unwrap();
        let mut store = OverrideStore::load(dir.path().join("o.json"));

        let patches = fields(json!({
            "good": {"enabled": false},
            "bad": "not an object",
            "also-good": {"category": "life"}
        }));
        let all_ok = store.patch_many(&patches);
        assert!(!all_ok);
        assert!(!store.get("good").enabled);
        assert_eq!(store.get("also-good").category.as_deref(), Some("life"));
    }

    #[test]
    fn test_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("o.json");
        let mut store = OverrideStore::load(path.clone());
        store
            .patch("hello", &fields(json!({"enabled": false})))
            .unwrap();
        store.save().unwrap();

        let reloaded = OverrideStore::load(path);
        assert!(!reloaded.get("hello").enabled);
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("o.json");
        fs::write(&path, "[not, an, object]").unwrap();
        let store = OverrideStore::load(path);
        assert!(store.get("x").enabled);
    }

    #[test]
    fn test_patch_order_preserved_on_disk() {
        // preserve_order keeps operator-entered field order stable
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("o.json");
        let mut store = OverrideStore::load(path.clone());
        store
            .patch("s", &fields(json!({"z": 1, "a": 2})))
            .unwrap();
        store.save().unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.find("\"z\"").unwrap() < content.find("\"a\"").unwrap());
    }
}
