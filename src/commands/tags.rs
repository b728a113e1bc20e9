//! Bulk tag commands: add-tags and remove-tags

use crate::cli::{ConfirmArgs, SelectionArgs};
use crate::commands::select;
use crate::commands::summary::{self, BulkAction, BulkOpSummary};
use crate::mutate::Placement;
use crate::persist::KeyValueStore;
use crate::session::Session;
use crate::tags;
use crate::{CuratrError, EntryId, ImageEntry};

type Result<T> = std::result::Result<T, CuratrError>;

/// Add tags to every selected entry
///
/// # Errors
///
/// Returns `CuratrError` if the selection cannot be resolved or the tag list
/// is empty.
pub fn add<S: KeyValueStore>(
    session: &mut Session<S>,
    tag_list: &str,
    placement: Placement,
    selection: &SelectionArgs,
    confirm: ConfirmArgs,
    quiet: bool,
) -> Result<()> {
    let new_tags = tags::split_list(tag_list);
    let Some(ids) = prepare(session, &new_tags, selection, confirm, BulkAction::Add, quiet)? else {
        return Ok(());
    };
    let changed = session.add_tags(&ids, &new_tags, placement)?;
    if !quiet {
        BulkOpSummary {
            success: changed,
            ..BulkOpSummary::new()
        }
        .print("Add Tags");
    }
    Ok(())
}

/// Remove tags from every selected entry
///
/// # Errors
///
/// Returns `CuratrError` if the selection cannot be resolved or the tag list
/// is empty.
pub fn remove<S: KeyValueStore>(
    session: &mut Session<S>,
    tag_list: &str,
    selection: &SelectionArgs,
    confirm: ConfirmArgs,
    quiet: bool,
) -> Result<()> {
    let old_tags = tags::split_list(tag_list);
    let Some(ids) = prepare(session, &old_tags, selection, confirm, BulkAction::Remove, quiet)? else {
        return Ok(());
    };
    let changed = session.remove_tags(&ids, &old_tags)?;
    if !quiet {
        BulkOpSummary {
            success: changed,
            ..BulkOpSummary::new()
        }
        .print("Remove Tags");
    }
    Ok(())
}

/// Resolve the selection and run the dry-run/confirm step
///
/// `None` means nothing should be changed.
fn prepare<S: KeyValueStore>(
    session: &Session<S>,
    tag_list: &[String],
    selection: &SelectionArgs,
    confirm: ConfirmArgs,
    action: BulkAction,
    quiet: bool,
) -> Result<Option<Vec<EntryId>>> {
    if tag_list.is_empty() {
        return Err(CuratrError::InvalidInput("No tags given".into()));
    }
    let ids = select::resolve(session, selection)?;
    if ids.is_empty() {
        if !quiet {
            println!("No entries match the selection.");
        }
        return Ok(None);
    }

    if confirm.dry_run {
        let entries: Vec<&ImageEntry> = ids.iter().filter_map(|id| session.entries().get(id)).collect();
        summary::print_dry_run_preview(&entries, tag_list, action);
        return Ok(None);
    }
    if !confirm.yes && !summary::confirm_bulk_operation(ids.len(), tag_list, action)? {
        println!("Operation cancelled.");
        return Ok(None);
    }
    Ok(Some(ids))
}
