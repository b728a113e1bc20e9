//! Shared reporting and confirmation helpers for bulk commands

use colored::Colorize;
use dialoguer::Confirm;

use crate::transfer::TransferFailure;
use crate::{CuratrError, ImageEntry};

type Result<T> = std::result::Result<T, CuratrError>;

/// How many entries a dry run lists before eliding the rest
const PREVIEW_LIMIT: usize = 10;

/// Tag edit performed by a bulk command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkAction {
    Add,
    Remove,
}

impl BulkAction {
    #[must_use]
    pub const fn verb(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Remove => "remove",
        }
    }

    #[must_use]
    pub const fn preposition(self) -> &'static str {
        match self {
            Self::Add => "to",
            Self::Remove => "from",
        }
    }
}

/// Counts for a finished bulk operation
#[derive(Debug, Default)]
pub struct BulkOpSummary {
    pub success: usize,
    pub skipped: usize,
    pub error_messages: Vec<String>,
}

impl BulkOpSummary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_failures(success: usize, skipped: usize, failures: &[TransferFailure]) -> Self {
        Self {
            success,
            skipped,
            error_messages: failures.iter().map(ToString::to_string).collect(),
        }
    }

    #[must_use]
    pub fn errors(&self) -> usize {
        self.error_messages.len()
    }

    pub fn print(&self, operation: &str) {
        println!("\n{}", format!("=== {operation} Summary ===").bold());
        println!("  {} {}", "✓ Success:".green(), self.success);
        if self.skipped > 0 {
            println!("  {} {}", "⊘ Skipped:".yellow(), self.skipped);
        }
        if !self.error_messages.is_empty() {
            println!("  {} {}", "✗ Errors:".red(), self.errors());
            println!("\n{}", "Error details:".red().bold());
            for msg in &self.error_messages {
                println!("  - {msg}");
            }
        }
    }
}

/// Print what a bulk tag edit would do
pub fn print_dry_run_preview(entries: &[&ImageEntry], tags: &[String], action: BulkAction) {
    println!("{}", "=== Dry Run Mode ===".yellow().bold());
    println!(
        "Would {} tags [{}] {} {} entr{}",
        action.verb(),
        tags.join(", ").cyan(),
        action.preposition(),
        entries.len(),
        if entries.len() == 1 { "y" } else { "ies" }
    );
    println!("\n{}", "Affected entries:".bold());
    for (i, entry) in entries.iter().enumerate().take(PREVIEW_LIMIT) {
        println!("  {}. {}", i + 1, entry.source_ref);
    }
    if entries.len() > PREVIEW_LIMIT {
        println!("  ... and {} more", entries.len() - PREVIEW_LIMIT);
    }
    println!("\n{}", "Run without --dry-run to apply changes.".yellow());
}

/// Ask before a bulk tag edit
///
/// # Errors
///
/// Returns `CuratrError::InvalidInput` if the prompt cannot be shown.
pub fn confirm_bulk_operation(count: usize, tags: &[String], action: BulkAction) -> Result<bool> {
    confirm(&format!(
        "{} tags [{}] {} {count} entr{}?",
        action.verb().to_uppercase(),
        tags.join(", "),
        action.preposition(),
        if count == 1 { "y" } else { "ies" }
    ))
}

/// Yes/no prompt, defaulting to no
///
/// # Errors
///
/// Returns `CuratrError::InvalidInput` if the prompt cannot be shown.
pub fn confirm(prompt: &str) -> Result<bool> {
    Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| CuratrError::InvalidInput(format!("Failed to get confirmation: {e}")))
}
