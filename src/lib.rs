//! Convert Notion workspace exports into Obsidian vaults.
//!
//! Filenames and links lose their Notion ids, and database tables become
//! Kanban boards.

pub mod config;
pub mod error;
pub mod notion;
pub mod obsidian;

pub use config::{BoardOptions, ConvertOptions};
pub use error::{ConvertError, Result};
