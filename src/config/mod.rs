//! Pipeline configuration from `notesync.toml`, CLI flags and environment.
//!
//! # Sections
//!
//! | Section      | Purpose                                         |
//! |--------------|-------------------------------------------------|
//! | `[site]`     | Locales to sync and the default language        |
//! | `[paths]`    | Content store, ignore list, overrides table     |
//! | `[obsidian]` | Vault location (overridable via `OBSIDIAN_VAULT`) |
//! | `[notion]`   | Database id (`NOTION_DATABASE_ID` overrides; the token only ever comes from `NOTION_TOKEN`) |
//!
//! A missing config file means defaults; a malformed one is fatal. Source
//! resolution failures report every path that was attempted.

use serde::Deserialize;
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

use crate::cli::Cli;
use crate::normalize::Language;
use crate::source::notion::NotionClient;

/// Default vault directory names tried relative to the project root.
const VAULT_SUBMODULE: &str = "obsidian-notes";

/// Typed configuration failures. All fatal for the invocation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("no Obsidian vault found, attempted:{}", format_attempts(.attempted))]
    VaultNotFound { attempted: Vec<PathBuf> },
    #[error("NOTION_TOKEN is not set")]
    MissingNotionToken,
    #[error("no Notion database id (set [notion].database_id or NOTION_DATABASE_ID)")]
    MissingNotionDatabase,
    #[error("failed to initialize HTTP client: {0}")]
    Http(String),
}

fn format_attempts(attempted: &[PathBuf]) -> String {
    attempted
        .iter()
        .map(|p| format!("\n  - {}", p.display()))
        .collect()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteSection {
    pub locales: Vec<Language>,
    pub default_language: Language,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            locales: Language::ALL.to_vec(),
            default_language: Language::Zh,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsSection {
    pub content_dir: PathBuf,
    pub ignore_file: PathBuf,
    pub overrides_file: PathBuf,
}

impl Default for PathsSection {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("content/notes"),
            ignore_file: PathBuf::from("content/ignored-notes.json"),
            overrides_file: PathBuf::from("content/note-overrides.json"),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ObsidianSection {
    /// Explicit vault path; `~` is expanded.
    pub vault: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NotionSection {
    pub database_id: Option<String>,
}

/// Resolved pipeline configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyncConfig {
    pub site: SiteSection,
    pub paths: PathsSection,
    pub obsidian: ObsidianSection,
    pub notion: NotionSection,
    /// Project root (directory of the config file). Not part of the file.
    #[serde(skip)]
    root: PathBuf,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            site: SiteSection::default(),
            paths: PathsSection::default(),
            obsidian: ObsidianSection::default(),
            notion: NotionSection::default(),
            root: PathBuf::from("."),
        }
    }
}

impl SyncConfig {
    /// Load the config file named by the CLI (missing file = defaults),
    /// then apply CLI overrides.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(&cli.config)?;
        if let Some(content) = &cli.content {
            config.paths.content_dir = content.clone();
        }
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: SyncConfig =
            toml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.root = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Ok(config)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn content_dir(&self) -> PathBuf {
        self.root.join(&self.paths.content_dir)
    }

    pub fn ignore_file(&self) -> PathBuf {
        self.root.join(&self.paths.ignore_file)
    }

    pub fn overrides_file(&self) -> PathBuf {
        self.root.join(&self.paths.overrides_file)
    }

    /// Resolve the Obsidian vault root.
    ///
    /// Priority: `OBSIDIAN_VAULT` env var, the `[obsidian].vault` config
    /// path, the `obsidian-notes` submodule directory, then the same name
    /// as a parent-directory sibling. The first path that exists on disk
    /// wins; when none does the error lists every attempt, so the
    /// operator sees exactly what was tried instead of a silent empty
    /// sync.
    pub fn resolve_vault(&self) -> Result<PathBuf, ConfigError> {
        let mut attempted = Vec::new();

        let configured = env::var("OBSIDIAN_VAULT")
            .ok()
            .filter(|v| !v.is_empty())
            .or_else(|| self.obsidian.vault.clone());
        if let Some(raw) = configured {
            let path = PathBuf::from(shellexpand::tilde(&raw).into_owned());
            if path.is_dir() {
                return Ok(path);
            }
            attempted.push(path);
        }

        for candidate in [
            self.root.join(VAULT_SUBMODULE),
            self.root.join("..").join(VAULT_SUBMODULE),
        ] {
            if candidate.is_dir() {
                return Ok(candidate);
            }
            attempted.push(candidate);
        }

        Err(ConfigError::VaultNotFound { attempted })
    }

    /// Build a Notion client from config + environment credentials.
    pub fn notion_client(&self) -> Result<NotionClient, ConfigError> {
        let token = env::var("NOTION_TOKEN")
            .ok()
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingNotionToken)?;
        let database_id = env::var("NOTION_DATABASE_ID")
            .ok()
            .filter(|d| !d.is_empty())
            .or_else(|| self.notion.database_id.clone())
            .ok_or(ConfigError::MissingNotionDatabase)?;
        NotionClient::new(token, database_id).map_err(|e| ConfigError::Http(e.to_string()))
    }

    /// Whether Notion credentials are configured (without validating them).
    pub fn has_notion_credentials(&self) -> bool {
        env::var("NOTION_TOKEN").is_ok_and(|t| !t.is_empty())
            && (env::var("NOTION_DATABASE_ID").is_ok_and(|d| !d.is_empty())
                || self.notion.database_id.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_at(dir: &Path, content: &str) -> SyncConfig {
        let path = dir.join("notesync.toml");
        fs::write(&path, content).unwrap();
        SyncConfig::from_file(&path).unwrap()
    }

    #[test]
    fn test_defaults_when_file_missing() {
        let config = SyncConfig::from_file(Path::new("does/not/exist.toml")).unwrap();
        assert_eq!(config.site.locales, vec![Language::Zh, Language::Ja]);
        assert_eq!(config.paths.content_dir, PathBuf::from("content/notes"));
    }

    #[test]
    fn test_parse_sections() {
        let dir = TempDir::new().unwrap();
        let config = config_at(
            dir.path(),
            r#"
[site]
locales = ["ja"]
default_language = "ja"

[paths]
content_dir = "store"

[notion]
database_id = "abc123"
"#,
        );
        assert_eq!(config.site.locales, vec![Language::Ja]);
        assert_eq!(config.content_dir(), dir.path().join("store"));
        assert_eq!(config.notion.database_id.as_deref(), Some("abc123"));
    }

    #[test]
    fn test_malformed_config_is_fatal() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notesync.toml");
        fs::write(&path, "[site\nbroken").unwrap();
        assert!(matches!(
            SyncConfig::from_file(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notesync.toml");
        fs::write(&path, "[site]\nlocals = [\"zh\"]").unwrap();
        assert!(SyncConfig::from_file(&path).is_err());
    }

    #[test]
    fn test_vault_resolution_submodule() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join(VAULT_SUBMODULE)).unwrap();
        let config = config_at(dir.path(), "");
        assert_eq!(
            config.resolve_vault().unwrap(),
            dir.path().join(VAULT_SUBMODULE)
        );
    }

    #[test]
    fn test_vault_config_path_beats_submodule() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join(VAULT_SUBMODULE)).unwrap();
        fs::create_dir(dir.path().join("my-vault")).unwrap();
        let vault = dir.path().join("my-vault");
        let config = config_at(
            dir.path(),
            &format!("[obsidian]\nvault = {:?}", vault.to_str().unwrap()),
        );
        assert_eq!(config.resolve_vault().unwrap(), vault);
    }

    #[test]
    fn test_vault_not_found_lists_attempts() {
        let dir = TempDir::new().unwrap();
        let config = config_at(dir.path(), "[obsidian]\nvault = \"/definitely/missing\"");
        let err = config.resolve_vault().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("/definitely/missing"));
        assert!(message.contains(VAULT_SUBMODULE));
    }
}
