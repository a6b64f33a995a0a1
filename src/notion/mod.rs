//! Notion export module
//!
//! Handles reading Notion workspace exports (ZIP archives or extracted folders).
//! Supports:
//! - Removing the 32 character ids Notion appends to filenames
//! - Rewriting markdown links that point at id-suffixed pages
//! - Database CSVs (converted to Obsidian Kanban boards)
//! - Images and other assets

mod hash;
mod import;
mod links;
mod table;

pub use hash::*;
pub use import::*;
pub use links::*;
pub use table::*;
