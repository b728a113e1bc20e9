//! Command implementations
//!
//! Each command is a module with functions that take parsed CLI args and run
//! the operation against the open session.

pub mod backup;
pub mod category;
pub mod entries;
pub mod list;
pub mod scrape;
pub mod select;
pub mod stats;
pub mod summary;
pub mod tags;
pub mod transfer;

// Re-export execute functions for convenience
pub use backup::execute as backup;
pub use category::execute as category;
pub use list::execute as list;
pub use list::search;
pub use stats::execute as stats;
