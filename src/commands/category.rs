//! Category commands
//!
//! Positions on the command line are 1-based, as shown by `category list`.

use colored::Colorize;

use crate::cli::CategoryCommands;
use crate::output;
use crate::persist::KeyValueStore;
use crate::session::Session;
use crate::tags;
use crate::{CuratrError, TagCategory};

type Result<T> = std::result::Result<T, CuratrError>;

fn index(position: usize) -> Result<usize> {
    position
        .checked_sub(1)
        .ok_or_else(|| CuratrError::InvalidInput("Category positions start at 1".into()))
}

/// Execute a category subcommand
///
/// # Errors
///
/// Returns `StoreError::CategoryNotFound` for a position past the end, or
/// `CuratrError::InvalidInput` for position 0.
pub fn execute<S: KeyValueStore>(session: &mut Session<S>, command: CategoryCommands, quiet: bool) -> Result<()> {
    let message = match command {
        CategoryCommands::Add { name, emoji, tags: tag_list } => {
            let initial = tag_list.as_deref().map(tags::split_list).unwrap_or_default();
            let category = TagCategory::new(name.trim(), emoji.unwrap_or_default(), Vec::new());
            let at = session.add_category(category)?;
            if !initial.is_empty() {
                session.add_category_tags(at, &initial)?;
            }
            format!("Added category {}", at + 1)
        }
        CategoryCommands::Remove { position } => {
            let removed = session.remove_category(index(position)?)?;
            format!("Removed category '{}'", removed.name)
        }
        CategoryCommands::Rename { position, name } => {
            session.rename_category(index(position)?, name.trim())?;
            format!("Renamed category {position}")
        }
        CategoryCommands::Emoji { position, emoji } => {
            session.set_category_emoji(index(position)?, &emoji)?;
            format!("Updated emoji of category {position}")
        }
        CategoryCommands::AddTag { position, tags: tag_list } => {
            let added = session.add_category_tags(index(position)?, &tags::split_list(&tag_list))?;
            format!("Added {added} tag(s) to category {position}")
        }
        CategoryCommands::RemoveTag { position, tag } => {
            if session.remove_category_tag(index(position)?, &tag)? {
                format!("Removed '{tag}' from category {position}")
            } else {
                format!("Category {position} has no tag '{tag}'")
            }
        }
        CategoryCommands::Clear { position } => {
            session.clear_category_tags(index(position)?)?;
            format!("Cleared category {position}")
        }
        CategoryCommands::Up { position } => {
            let now = session.move_category_up(index(position)?)?;
            format!("Category is now at position {}", now + 1)
        }
        CategoryCommands::Down { position } => {
            let now = session.move_category_down(index(position)?)?;
            format!("Category is now at position {}", now + 1)
        }
        CategoryCommands::List => {
            list(session, quiet);
            return Ok(());
        }
    };
    if !quiet {
        println!("{}", message.green());
    }
    Ok(())
}

fn list<S: KeyValueStore>(session: &Session<S>, quiet: bool) {
    let categories = session.categories().list();
    if categories.is_empty() {
        if !quiet {
            println!("No categories.");
        }
        return;
    }
    for (i, category) in categories.iter().enumerate() {
        println!("{}", output::category_line(i + 1, category, quiet));
    }
}
