//! Import and export commands

use std::path::{Path, PathBuf};

use colored::Colorize;

use crate::commands::summary::BulkOpSummary;
use crate::persist::KeyValueStore;
use crate::session::Session;
use crate::transfer::{ExportTarget, ImportOptions, LocalFiles};
use crate::CuratrError;

type Result<T> = std::result::Result<T, CuratrError>;

/// Import image/tag pairs from files, directories and archives
///
/// # Errors
///
/// Returns `TransferError::NoInput` for an empty path list, or
/// `CuratrError::PersistError` if the session cannot be saved. Unreadable
/// files are reported, not returned.
pub fn import<S: KeyValueStore>(session: &mut Session<S>, paths: &[PathBuf], media_dir: PathBuf, quiet: bool) -> Result<()> {
    let report = session.import(paths, &ImportOptions { media_dir })?;
    if quiet {
        for id in &report.imported {
            println!("{id}");
        }
        return Ok(());
    }
    for source in &report.duplicates {
        println!("  {} {source}", "⊘ Already present:".yellow());
    }
    BulkOpSummary::with_failures(report.imported.len(), report.duplicates.len(), &report.failures).print("Import");
    Ok(())
}

/// Export every live entry to a directory or archive
///
/// # Errors
///
/// Returns `TransferError` if the target cannot be created.
pub fn export<S: KeyValueStore>(session: &Session<S>, target: &Path, quiet: bool) -> Result<()> {
    let target = ExportTarget::from_path(target);
    let report = session.export(&LocalFiles, &target)?;
    if quiet {
        println!("{}", report.exported);
        return Ok(());
    }
    println!("{} {}", "Exported to".green(), target.path().display());
    BulkOpSummary::with_failures(report.exported, 0, &report.failures).print("Export");
    Ok(())
}
