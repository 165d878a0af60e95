//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

use crate::normalize::Language;

/// notesync content pipeline CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: notesync.toml)
    #[arg(short = 'C', long, default_value = "notesync.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Content store directory (overrides [paths].content_dir)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub content: Option<PathBuf>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Convert the local Obsidian vault into the content store
    #[command(visible_alias = "c")]
    Convert {
        /// Sync a single locale instead of all configured ones
        #[arg(short, long)]
        locale: Option<Language>,
    },

    /// Sync the remote Notion database into the content store
    #[command(visible_alias = "s")]
    Sync {
        /// Sync a single locale instead of all configured ones
        #[arg(short, long)]
        locale: Option<Language>,
    },

    /// Pick a source from the environment and sync (build hook)
    Prebuild,

    /// Manage the ignore list
    Ignore {
        #[command(subcommand)]
        action: IgnoreAction,
    },

    /// Manage per-note metadata overrides
    #[command(visible_alias = "o")]
    Overrides {
        #[command(subcommand)]
        action: OverrideAction,
    },
}

/// Ignore list operations.
#[derive(Subcommand, Debug, Clone)]
pub enum IgnoreAction {
    /// Add a slug to the ignore list
    Add { slug: String },
    /// Print the ignore list
    List,
}

/// Metadata override operations (the admin API wraps these).
#[derive(Subcommand, Debug, Clone)]
pub enum OverrideAction {
    /// Print the effective override for a slug
    Get { slug: String },
    /// Toggle whether a note is published
    SetEnabled {
        slug: String,
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },
    /// Set a note's category
    SetCategory { slug: String, category: String },
    /// Shallow-merge a JSON object of fields onto a slug's override
    Patch {
        slug: String,
        /// JSON object, e.g. '{"enabled": false, "pinned": true}'
        fields: String,
    },
    /// Apply a batch of patches from a JSON file ({slug: {field: value}})
    Batch {
        #[arg(value_hint = clap::ValueHint::FilePath)]
        file: PathBuf,
    },
}
