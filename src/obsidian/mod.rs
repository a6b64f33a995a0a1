//! Obsidian vault output module
//!
//! Writes converted files into an Obsidian vault folder and renders Notion
//! databases as boards for the Kanban community plugin.

mod kanban;
mod vault;

pub use kanban::*;
pub use vault::*;
