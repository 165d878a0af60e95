//! notesync - content sync pipeline for a bilingual notes site.
//!
//! Pulls notes from an Obsidian vault or a Notion database, normalizes
//! their metadata and links, and reconciles a Markdown content store
//! against the source per locale.

#![allow(dead_code)]

mod cli;
mod config;
mod ignore;
mod logger;
mod normalize;
mod overrides;
mod reconcile;
mod record;
mod rewrite;
mod source;
mod store;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::SyncConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = SyncConfig::load(&cli)?;

    match &cli.command {
        Commands::Convert { locale } => cli::convert::run(&config, *locale),
        Commands::Sync { locale } => cli::sync::run(&config, *locale),
        Commands::Prebuild => cli::prebuild::run(&config),
        Commands::Ignore { action } => cli::ignore::run(&config, action),
        Commands::Overrides { action } => cli::overrides::run(&config, action),
    }
}
