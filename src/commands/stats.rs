//! Stats command

use colored::Colorize;

use crate::output;
use crate::persist::KeyValueStore;
use crate::session::Session;
use crate::CuratrError;

/// Print dataset numbers and the `top` most used tags
///
/// # Errors
///
/// Currently infallible; kept fallible like the other commands.
pub fn execute<S: KeyValueStore>(session: &Session<S>, top: usize, quiet: bool) -> Result<(), CuratrError> {
    let counts = session.tag_counts();
    if quiet {
        for (tag, count) in counts.iter().take(top) {
            println!("{tag}\t{count}");
        }
        return Ok(());
    }

    println!("{}", output::stats_block(&session.stats()));
    println!("{} {}", "Recycled:".bold(), session.entries().recycled().len());
    println!("{} {}", "Categories:".bold(), session.categories().len());
    println!("{} {}", "Backups:".bold(), session.backups().len());
    if top > 0 && !counts.is_empty() {
        println!("\n{}", "Most used tags:".bold());
        for (tag, count) in counts.iter().take(top) {
            println!("{}", output::tag_with_count(tag, *count, false));
        }
    }
    Ok(())
}
