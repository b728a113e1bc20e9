//! Merge scraper output files into the dataset

use std::path::PathBuf;

use tracing::warn;

use crate::commands::summary::BulkOpSummary;
use crate::persist::KeyValueStore;
use crate::scrape::{MergeOutcome, ScrapeRules, TagScrapeResult};
use crate::session::Session;
use crate::CuratrError;

/// Merge each JSON scrape result, reporting bad files instead of stopping
///
/// # Errors
///
/// Returns `CuratrError::PersistError` if the session cannot be saved.
pub fn merge<S: KeyValueStore>(
    session: &mut Session<S>,
    files: &[PathBuf],
    rules: &ScrapeRules,
    quiet: bool,
) -> Result<BulkOpSummary, CuratrError> {
    let mut summary = BulkOpSummary::new();
    for file in files {
        let outcome = TagScrapeResult::from_json_file(file).and_then(|result| session.merge_scraped(&result, rules));
        match outcome {
            Ok(MergeOutcome::Added(id) | MergeOutcome::Extended { id, .. }) => {
                if quiet {
                    println!("{id}");
                }
                summary.success += 1;
            }
            Ok(MergeOutcome::Empty) => summary.skipped += 1,
            Err(e @ CuratrError::PersistError(_)) => return Err(e),
            Err(e) => {
                warn!("skipping {}: {e}", file.display());
                summary.error_messages.push(format!("{}: {e}", file.display()));
            }
        }
    }
    if !quiet {
        summary.print("Merge");
    }
    Ok(summary)
}
