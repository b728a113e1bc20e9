//! List and search commands

use crate::output;
use crate::persist::KeyValueStore;
use crate::session::Session;
use crate::CuratrError;

type Result<T> = std::result::Result<T, CuratrError>;

/// Execute the list command, optionally filtered by a query
///
/// # Errors
///
/// Currently infallible; kept fallible like the other commands.
pub fn execute<S: KeyValueStore>(session: &Session<S>, query: Option<&str>, quiet: bool) -> Result<()> {
    let hits = query.map(|q| session.query(q));
    let entries = session.list(hits.as_ref());

    if entries.is_empty() {
        if !quiet {
            println!("No entries found.");
        }
        return Ok(());
    }
    if !quiet {
        match query {
            Some(q) => println!("Entries matching '{q}' ({}):", entries.len()),
            None => println!("Entries ({}):", entries.len()),
        }
    }
    for entry in entries {
        println!("{}", output::entry_with_tags(entry, quiet));
    }
    Ok(())
}

/// Execute the search command
///
/// # Errors
///
/// See [`execute`].
pub fn search<S: KeyValueStore>(session: &Session<S>, query: &str, quiet: bool) -> Result<()> {
    execute(session, Some(query), quiet)
}
