use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Options for a whole export conversion
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "snake_case")]
pub struct ConvertOptions {
    /// How database tables are turned into kanban boards
    pub board: BoardOptions,
    /// Entries with any path component starting with one of these are ignored
    pub skip_prefixes: Vec<String>,
    /// Copy non-markdown, non-CSV files to their cleaned path
    pub copy_assets: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            board: BoardOptions::default(),
            // Apple provenance files, some of them with a .md extension
            skip_prefixes: vec!["__MACOSX".to_string()],
            copy_assets: true,
        }
    }
}

impl ConvertOptions {
    /// Load options from a TOML file. Missing keys fall back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Whether an entry should be left out of the conversion entirely
    pub fn is_skipped(&self, logical_path: &str) -> bool {
        logical_path
            .split(['/', '\\'])
            .any(|component| {
                self.skip_prefixes
                    .iter()
                    .any(|prefix| component.starts_with(prefix.as_str()))
            })
    }
}

/// Reserved column names and defaults used when building a board
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "snake_case")]
pub struct BoardOptions {
    /// Column whose cards are rendered checked
    pub done_status: String,
    pub status_column: String,
    pub tags_column: String,
    /// Status for rows without a status cell, also the name of the only
    /// column when no row has one
    pub default_status: String,
    /// Title column used when the table declares no headers
    pub fallback_title_column: String,
}

impl Default for BoardOptions {
    fn default() -> Self {
        Self {
            done_status: "Done".to_string(),
            status_column: "Status".to_string(),
            tags_column: "Tags".to_string(),
            default_status: String::new(),
            fallback_title_column: "Name".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ConvertOptions::default();
        assert_eq!(options.board.done_status, "Done");
        assert_eq!(options.board.status_column, "Status");
        assert_eq!(options.board.tags_column, "Tags");
        assert_eq!(options.board.default_status, "");
        assert!(options.copy_assets);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let options = ConvertOptions::from_toml(
            r#"
copy_assets = false

[board]
done_status = "Complete"
"#,
        )
        .unwrap();

        assert!(!options.copy_assets);
        assert_eq!(options.board.done_status, "Complete");
        assert_eq!(options.board.status_column, "Status");
        assert_eq!(options.skip_prefixes, vec!["__MACOSX".to_string()]);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(ConvertOptions::from_toml("copy_assets = \"maybe\"").is_err());
    }

    #[test]
    fn test_is_skipped() {
        let options = ConvertOptions::default();
        assert!(options.is_skipped("__MACOSX/Export/._Page.md"));
        assert!(options.is_skipped("Export/__MACOSX/Page.md"));
        assert!(!options.is_skipped("Export/Page.md"));
    }
}
