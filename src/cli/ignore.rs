//! `ignore` command: manage the persisted ignore list.
//!
//! Adding a slug only records it; the next reconciliation pass deletes
//! any materialized output for it.

use anyhow::Result;

use crate::cli::IgnoreAction;
use crate::config::SyncConfig;
use crate::ignore::IgnoreList;
use crate::log;

pub fn run(config: &SyncConfig, action: &IgnoreAction) -> Result<()> {
    let path = config.ignore_file();
    match action {
        IgnoreAction::Add { slug } => {
            let mut list = IgnoreList::load(path);
            if list.append(slug) {
                list.save()?;
                log!("ignore"; "added {slug} ({} total)", list.len());
            } else {
                log!("ignore"; "{slug} already ignored");
            }
        }
        IgnoreAction::List => {
            let list = IgnoreList::load(path);
            log!("ignore"; "{} ignored slug(s)", list.len());
            for slug in list.sorted() {
                println!("{slug}");
            }
        }
    }
    Ok(())
}
