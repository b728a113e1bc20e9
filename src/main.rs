//! Curatr CLI application entry point
//!
//! Manages a dataset of image entries and their ordered tags from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Add an entry and tag it
//! curatr add ./images/001.png -t "1girl, solo"
//!
//! # Find entries (substring terms, `&&`/`||` for exact groups)
//! curatr search "1girl && solo, smil"
//!
//! # Add tags to everything a query matches, previewing first
//! curatr add-tags "smile" -Q "1girl" --dry-run
//!
//! # Snapshot, then export to a tarball
//! curatr backup create before-cleanup
//! curatr export dataset.tar.gz
//!
//! # Quiet mode (only output results)
//! curatr -q list
//! ```
//!
//! # Configuration
//!
//! On first run, curatr will prompt for initial setup. Configuration is stored in
//! the user's config directory (`~/.config/curatr/config.toml` on Linux).
//! Log verbosity follows `RUST_LOG`, then the `log_level` config key.

use std::process::ExitCode;

use colored::Colorize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use curatr::{
    CuratrError,
    cli::{Cli, Commands},
    commands,
    config::CuratrConfig,
    persist::SledStore,
    session::Session,
};

type Result<T> = std::result::Result<T, CuratrError>;

const DEFAULT_LOG_FILTER: &str = "curatr=warn";

fn init_logging(config: &CuratrConfig) {
    let fallback = config.log_level.clone().unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&fallback))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli, config: &CuratrConfig) -> Result<()> {
    let quiet = cli.quiet || config.quiet;

    let session_path = match cli.session {
        Some(path) => path,
        None => config.session_path()?,
    };
    debug!("opening session at {}", session_path.display());
    let mut session = Session::open(SledStore::open(&session_path)?)?;

    match cli.command {
        Commands::Add { source, tags, page_url } => {
            commands::entries::add(&mut session, &source, tags.as_deref(), page_url, quiet)?;
        }
        Commands::Remove { entries } => commands::entries::remove(&mut session, &entries, quiet)?,
        Commands::Recycle { command } => commands::entries::recycle(&mut session, command, quiet)?,
        Commands::SetTags { entry, tags } => commands::entries::set_tags(&mut session, &entry, &tags, quiet)?,
        Commands::List { query } => commands::list(&session, query.as_deref(), quiet)?,
        Commands::Search { query } => commands::search(&session, &query, quiet)?,
        Commands::AddTags {
            tags,
            placement,
            selection,
            confirm,
        } => {
            let placement = placement.unwrap_or(config.default_placement);
            commands::tags::add(&mut session, &tags, placement, &selection, confirm, quiet)?;
        }
        Commands::RemoveTags {
            tags,
            selection,
            confirm,
        } => commands::tags::remove(&mut session, &tags, &selection, confirm, quiet)?,
        Commands::Backup { command } => commands::backup(&mut session, command, quiet)?,
        Commands::Category { command } => commands::category(&mut session, command, quiet)?,
        Commands::Import { paths, media_dir } => {
            let media_dir = match media_dir {
                Some(dir) => dir,
                None => config.media_dir()?,
            };
            commands::transfer::import(&mut session, &paths, media_dir, quiet)?;
        }
        Commands::Export { target } => commands::transfer::export(&session, &target, quiet)?,
        Commands::MergeScraped { files } => {
            commands::scrape::merge(&mut session, &files, &config.scrape.rules, quiet)?;
        }
        Commands::Stats { top } => commands::stats(&session, top, quiet)?,
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    let config = match CuratrConfig::load_or_setup() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {e}", "Error:".red().bold());
            return ExitCode::FAILURE;
        }
    };
    init_logging(&config);

    match run(cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e}", "Error:".red().bold());
            ExitCode::FAILURE
        }
    }
}
