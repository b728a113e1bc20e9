//! Command-line interface definitions and parsing
//!
//! This module defines the complete CLI structure for curatr using the `clap` crate.
//!
//! # Commands
//!
//! - **add / remove / set-tags**: manage single entries
//! - **recycle**: inspect, restore or purge removed entries
//! - **list / search**: show entries, optionally filtered by a query
//! - **add-tags / remove-tags**: bulk tag edits over a selection
//! - **backup**: labeled snapshots of the whole dataset
//! - **category**: the tag taxonomy
//! - **import / export**: image + tag file pairs, loose or in zip/tar archives
//! - **merge-scraped**: fold scraper output into the dataset
//! - **stats**: dataset numbers and the most used tags
//!
//! Entries are named by their id or by their full source reference.
//! Categories are named by their 1-based position in `category list`.
//!
//! # Examples
//!
//! ```
//! use clap::Parser;
//! use curatr::cli::{Cli, Commands};
//!
//! let cli = Cli::parse_from(["curatr", "add-tags", "smile", "--query", "1girl"]);
//! assert!(matches!(cli.command, Commands::AddTags { .. }));
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::mutate::Placement;

/// Which entries a bulk command applies to
///
/// The selection is the union of every given criterion, minus entries
/// matched by `--skip-with`.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionArgs {
    /// Entries matching a query (e.g. "1girl && solo, smil")
    #[arg(short = 'Q', long = "query", value_name = "QUERY")]
    pub query: Option<String>,

    /// Entry id or source reference (repeatable)
    #[arg(short = 'e', long = "entry", value_name = "ENTRY")]
    pub entries: Vec<String>,

    /// Entries holding all of these tags
    #[arg(long = "with", value_name = "TAG")]
    pub with_all: Vec<String>,

    /// Entries holding none of these tags (combined with --with)
    #[arg(long = "without", value_name = "TAG")]
    pub without_any: Vec<String>,

    /// Drop entries holding all of these tags from the selection
    #[arg(long = "skip-with", value_name = "TAG")]
    pub skip_with: Vec<String>,

    /// Every live entry
    #[arg(short = 'a', long = "all")]
    pub all: bool,
}

impl SelectionArgs {
    /// Whether any selection criterion was given
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.all
            && self.query.is_none()
            && self.entries.is_empty()
            && self.with_all.is_empty()
            && self.without_any.is_empty()
    }
}

/// Preview and confirmation flags for destructive bulk commands
#[derive(Args, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfirmArgs {
    /// Show what would change without changing anything
    #[arg(short = 'n', long = "dry-run")]
    pub dry_run: bool,

    /// Skip the confirmation prompt
    #[arg(short = 'y', long = "yes")]
    pub yes: bool,
}

/// Recycle bin subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum RecycleCommands {
    /// List recycled entries
    #[command(visible_alias = "ls")]
    List,

    /// Move recycled entries back to the live set
    Restore {
        /// Entry ids or source references
        #[arg(value_name = "ENTRY", required = true)]
        entries: Vec<String>,
    },

    /// Restore every recycled entry that does not clash with a live one
    #[command(name = "restore-all")]
    RestoreAll,

    /// Permanently drop all recycled entries
    Purge {
        /// Skip the confirmation prompt
        #[arg(short = 'y', long = "yes")]
        yes: bool,
    },
}

/// Backup subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum BackupCommands {
    /// Snapshot all entries and categories
    Create {
        /// Label (defaults to the current local time)
        label: Option<String>,
    },

    /// Replace all entries and categories with a snapshot
    Restore {
        label: String,

        /// Skip the confirmation prompt
        #[arg(short = 'y', long = "yes")]
        yes: bool,
    },

    /// Delete a snapshot
    #[command(visible_alias = "rm")]
    Delete { label: String },

    /// List snapshots, oldest first
    #[command(visible_alias = "ls")]
    List,
}

/// Category subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum CategoryCommands {
    /// Append a category
    Add {
        name: String,

        /// Emoji shown next to the name (random when omitted)
        #[arg(short = 'e', long = "emoji")]
        emoji: Option<String>,

        /// Initial tags, comma separated
        #[arg(short = 't', long = "tags", value_name = "TAGS")]
        tags: Option<String>,
    },

    /// Delete a category
    #[command(visible_alias = "rm")]
    Remove { position: usize },

    /// Rename a category
    Rename { position: usize, name: String },

    /// Change a category's emoji
    Emoji { position: usize, emoji: String },

    /// Add tags to a category, comma separated
    #[command(name = "add-tag")]
    AddTag { position: usize, tags: String },

    /// Remove one tag from a category
    #[command(name = "remove-tag")]
    RemoveTag { position: usize, tag: String },

    /// Remove every tag from a category
    Clear { position: usize },

    /// Swap a category with the one above it
    Up { position: usize },

    /// Swap a category with the one below it
    Down { position: usize },

    /// List categories with their tags
    #[command(visible_alias = "ls")]
    List,
}

/// Main CLI structure for parsing command-line arguments
#[derive(Parser, Debug)]
#[command(name = "curatr")]
#[command(about = "Curate image/tag datasets", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Suppress informational output (only print results)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,

    /// Session database directory (overrides config)
    #[arg(long = "session", value_name = "PATH", global = true)]
    pub session: Option<PathBuf>,
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Add an image entry
    Add {
        /// Image path or URL
        source: String,

        /// Tags, comma separated
        #[arg(short = 't', long = "tags", value_name = "TAGS")]
        tags: Option<String>,

        /// Page the image was found on
        #[arg(long = "page-url", value_name = "URL")]
        page_url: Option<String>,
    },

    /// Move entries to the recycle bin
    #[command(visible_alias = "rm")]
    Remove {
        /// Entry ids or source references
        #[arg(value_name = "ENTRY", required = true)]
        entries: Vec<String>,
    },

    /// Manage the recycle bin
    Recycle {
        #[command(subcommand)]
        command: RecycleCommands,
    },

    /// Replace an entry's tags
    #[command(name = "set-tags")]
    SetTags {
        /// Entry id or source reference
        entry: String,

        /// New tags, comma separated (empty clears)
        tags: String,
    },

    /// List live entries
    #[command(visible_alias = "ls")]
    List {
        /// Only entries matching this query
        #[arg(short = 'Q', long = "query", value_name = "QUERY")]
        query: Option<String>,
    },

    /// Show entries matching a query
    #[command(visible_alias = "s")]
    Search {
        /// Query: comma separated terms; `a && b`, `a || b` for exact groups
        query: String,
    },

    /// Add tags to the selected entries
    #[command(name = "add-tags")]
    AddTags {
        /// Tags to add, comma separated
        tags: String,

        /// Where the new tags go (config default when omitted)
        #[arg(short = 'p', long = "placement", value_enum)]
        placement: Option<Placement>,

        #[command(flatten)]
        selection: SelectionArgs,

        #[command(flatten)]
        confirm: ConfirmArgs,
    },

    /// Remove tags from the selected entries
    #[command(name = "remove-tags")]
    RemoveTags {
        /// Tags to remove, comma separated
        tags: String,

        #[command(flatten)]
        selection: SelectionArgs,

        #[command(flatten)]
        confirm: ConfirmArgs,
    },

    /// Manage backups
    Backup {
        #[command(subcommand)]
        command: BackupCommands,
    },

    /// Manage tag categories
    #[command(visible_alias = "cat")]
    Category {
        #[command(subcommand)]
        command: CategoryCommands,
    },

    /// Import images and tag files (files, directories, .zip/.tar/.tar.gz archives)
    Import {
        #[arg(value_name = "PATH", required = true)]
        paths: Vec<PathBuf>,

        /// Where images from archives are extracted (overrides config)
        #[arg(long = "media-dir", value_name = "DIR")]
        media_dir: Option<PathBuf>,
    },

    /// Export all entries as image + tag file pairs
    Export {
        /// Target directory, or a .zip/.tar/.tar.gz/.tgz archive
        target: PathBuf,
    },

    /// Merge tag scraper results (JSON files) into the dataset
    #[command(name = "merge-scraped")]
    MergeScraped {
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,
    },

    /// Show dataset statistics
    Stats {
        /// Number of most used tags to show
        #[arg(long = "top", default_value_t = 10)]
        top: usize,
    },
}

impl Cli {
    /// Parse command line arguments
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
