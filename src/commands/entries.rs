//! Entry commands: add, remove, set-tags and the recycle bin

use colored::Colorize;

use crate::cli::RecycleCommands;
use crate::commands::summary;
use crate::output;
use crate::persist::KeyValueStore;
use crate::session::Session;
use crate::tags;
use crate::{CuratrError, ImageEntry};

type Result<T> = std::result::Result<T, CuratrError>;

/// Add one entry
///
/// # Errors
///
/// Returns `StoreError::Duplicate` if the source is already live.
pub fn add<S: KeyValueStore>(
    session: &mut Session<S>,
    source: &str,
    tag_list: Option<&str>,
    page_url: Option<String>,
    quiet: bool,
) -> Result<()> {
    let source = source.trim();
    if source.is_empty() {
        return Err(CuratrError::InvalidInput("Source reference cannot be empty".into()));
    }
    let entry = ImageEntry::new(source, page_url, tag_list.map(tags::split_list).unwrap_or_default());
    let id = session.add_entry(entry)?;
    if quiet {
        println!("{id}");
    } else {
        println!("{} {source} ({id})", "Added".green());
    }
    Ok(())
}

/// Move entries to the recycle bin
///
/// # Errors
///
/// Returns `CuratrError::InvalidInput` if a key names no live entry. Entries
/// named before it are already recycled.
pub fn remove<S: KeyValueStore>(session: &mut Session<S>, keys: &[String], quiet: bool) -> Result<()> {
    for key in keys {
        let id = session.resolve(key)?;
        session.remove_entry(&id)?;
        if !quiet {
            println!("{} {key}", "Recycled".yellow());
        }
    }
    Ok(())
}

/// Replace an entry's tags
///
/// # Errors
///
/// Returns `CuratrError::InvalidInput` if the key names no live entry.
pub fn set_tags<S: KeyValueStore>(session: &mut Session<S>, key: &str, tag_list: &str, quiet: bool) -> Result<()> {
    let id = session.resolve(key)?;
    session.set_tags(&id, tags::split_list(tag_list))?;
    if !quiet
        && let Some(entry) = session.entries().get(&id)
    {
        println!("{}", output::entry_with_tags(entry, false));
    }
    Ok(())
}

/// Recycle bin subcommands
///
/// # Errors
///
/// Returns `CuratrError` if an entry cannot be resolved or restored.
pub fn recycle<S: KeyValueStore>(session: &mut Session<S>, command: RecycleCommands, quiet: bool) -> Result<()> {
    match command {
        RecycleCommands::List => {
            let recycled = session.entries().recycled();
            if recycled.is_empty() {
                if !quiet {
                    println!("Recycle bin is empty.");
                }
                return Ok(());
            }
            if !quiet {
                println!("Recycled entries:");
            }
            for entry in recycled {
                println!("{}", output::entry_with_tags(entry, quiet));
            }
        }
        RecycleCommands::Restore { entries } => {
            for key in &entries {
                let id = session.resolve_recycled(key)?;
                session.restore_entry(&id)?;
                if !quiet {
                    println!("{} {key}", "Restored".green());
                }
            }
        }
        RecycleCommands::RestoreAll => {
            let waiting = session.entries().recycled().len();
            let restored = session.restore_all_recycled()?;
            if !quiet {
                summary::BulkOpSummary {
                    success: restored.len(),
                    skipped: waiting - restored.len(),
                    error_messages: Vec::new(),
                }
                .print("Restore");
            }
        }
        RecycleCommands::Purge { yes } => {
            let waiting = session.entries().recycled().len();
            if waiting == 0 {
                if !quiet {
                    println!("Recycle bin is empty.");
                }
                return Ok(());
            }
            if !yes && !summary::confirm(&format!("Permanently delete {waiting} recycled entries?"))? {
                println!("Operation cancelled.");
                return Ok(());
            }
            let purged = session.purge_recycled()?;
            if !quiet {
                println!("{} {purged} entries", "Purged".red());
            }
        }
    }
    Ok(())
}
