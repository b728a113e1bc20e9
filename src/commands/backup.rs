//! Backup commands

use colored::Colorize;

use crate::cli::BackupCommands;
use crate::commands::summary;
use crate::persist::KeyValueStore;
use crate::session::Session;
use crate::CuratrError;

/// Execute a backup subcommand
///
/// # Errors
///
/// Returns `BackupError::NotFound` when restoring or deleting an unknown label.
pub fn execute<S: KeyValueStore>(session: &mut Session<S>, command: BackupCommands, quiet: bool) -> Result<(), CuratrError> {
    match command {
        BackupCommands::Create { label } => {
            let label = session.capture_backup(label.as_deref())?;
            if quiet {
                println!("{label}");
            } else {
                println!("{} '{label}'", "Backup created:".green());
            }
        }
        BackupCommands::Restore { label, yes } => {
            if session.backups().get(&label).is_none() {
                return Err(crate::backup::BackupError::NotFound(label).into());
            }
            let prompt = format!("Replace all entries and categories with backup '{label}'?");
            if !yes && !summary::confirm(&prompt)? {
                println!("Operation cancelled.");
                return Ok(());
            }
            session.restore_backup(&label)?;
            if !quiet {
                println!(
                    "{} '{label}' ({} entries, {} categories)",
                    "Restored backup".green(),
                    session.entries().count(),
                    session.categories().len()
                );
            }
        }
        BackupCommands::Delete { label } => {
            session.delete_backup(&label)?;
            if !quiet {
                println!("{} '{label}'", "Deleted backup".yellow());
            }
        }
        BackupCommands::List => {
            let backups = session.backups().backups();
            if backups.is_empty() {
                if !quiet {
                    println!("No backups.");
                }
                return Ok(());
            }
            for backup in backups {
                if quiet {
                    println!("{}", backup.label);
                } else {
                    println!(
                        "  {} ({} entries, {} categories)",
                        backup.label.bold(),
                        backup.images.len(),
                        backup.categories.len()
                    );
                }
            }
        }
    }
    Ok(())
}
