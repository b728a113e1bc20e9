//! Turning `SelectionArgs` into an ordered list of entry ids

use std::collections::HashSet;

use crate::cli::SelectionArgs;
use crate::mutate;
use crate::persist::KeyValueStore;
use crate::session::Session;
use crate::{CuratrError, EntryId};

type Result<T> = std::result::Result<T, CuratrError>;

/// Resolve the selection to live entry ids, in store order
///
/// # Errors
///
/// Returns `CuratrError::InvalidInput` if no criterion was given or an
/// `--entry` value names no live entry.
pub fn resolve<S: KeyValueStore>(session: &Session<S>, args: &SelectionArgs) -> Result<Vec<EntryId>> {
    if args.is_empty() {
        return Err(CuratrError::InvalidInput(
            "No entries selected (use --query, --entry, --with, --without or --all)".into(),
        ));
    }

    let mut selected: HashSet<EntryId> = if args.all {
        session.entries().entries().iter().map(|e| e.id.clone()).collect()
    } else {
        HashSet::new()
    };
    if let Some(query) = &args.query {
        selected.extend(session.query(query));
    }
    for key in &args.entries {
        selected.insert(session.resolve(key)?);
    }
    if !args.with_all.is_empty() || !args.without_any.is_empty() {
        selected.extend(session.select_by_tags(&args.with_all, &args.without_any));
    }
    if !args.skip_with.is_empty() {
        mutate::deselect_by_tags(session.entries(), &mut selected, &args.skip_with, &[]);
    }

    Ok(session.list(Some(&selected)).into_iter().map(|e| e.id.clone()).collect())
}
