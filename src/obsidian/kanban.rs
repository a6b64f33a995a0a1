//! Obsidian Kanban board generation
//!
//! Turns the rows of a Notion database into a board document for the
//! Obsidian Kanban plugin: one `##` lane per status, one checklist item per
//! row.

use serde::{Deserialize, Serialize};

use crate::config::BoardOptions;
use crate::notion::Row;

/// Front matter the Kanban plugin looks for
const KANBAN_HEADER: &str = "---\n\nkanban-plugin: basic\n\n---\n\n";

/// A single card (one database row)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub title: String,
    pub done: bool,
    pub tags: Vec<String>,
    /// Remaining columns in header order, empty values left out
    pub fields: Vec<(String, String)>,
}

impl Card {
    /// Render as a checklist line, without the line break
    ///
    /// "- [x] Write doctests unknown:param #notion"
    pub fn to_markdown(&self) -> String {
        let mut line = String::from(if self.done { "- [x] " } else { "- [ ] " });
        line.push_str(&self.title);

        for (name, value) in &self.fields {
            line.push_str(&format!(" {}:{}", name, value));
        }

        for tag in &self.tags {
            line.push_str(&format!(" #{}", tag));
        }

        line
    }
}

/// A lane of cards sharing one status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub name: String,
    pub cards: Vec<Card>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub columns: Vec<Column>,
}

impl Board {
    /// Build a board from database rows.
    ///
    /// Returns `None` for an empty table: no board is written at all, which is
    /// not the same as a board holding a single unnamed lane.
    pub fn from_rows(rows: &[Row], options: &BoardOptions) -> Option<Self> {
        let first = rows.first()?;

        let title_key = first
            .columns()
            .next()
            .unwrap_or(options.fallback_title_column.as_str());

        let extra_fields: Vec<&str> = first
            .columns()
            .filter(|&column| {
                column != title_key
                    && column != options.status_column
                    && column != options.tags_column
            })
            .collect();

        let mut columns: Vec<Column> = Vec::new();

        for row in rows {
            let status = row
                .get(&options.status_column)
                .unwrap_or(options.default_status.as_str());

            let card = Card {
                title: row.get(title_key).unwrap_or_default().to_string(),
                done: status == options.done_status,
                tags: row
                    .get(&options.tags_column)
                    .filter(|tag| !tag.is_empty())
                    .map(|tag| vec![tag.to_string()])
                    .unwrap_or_default(),
                fields: extra_fields
                    .iter()
                    .filter_map(|&field| {
                        row.get(field)
                            .filter(|value| !value.is_empty())
                            .map(|value| (field.to_string(), value.to_string()))
                    })
                    .collect(),
            };

            // Lanes appear in the order their status is first seen
            match columns.iter_mut().find(|column| column.name == status) {
                Some(column) => column.cards.push(card),
                None => columns.push(Column {
                    name: status.to_string(),
                    cards: vec![card],
                }),
            }
        }

        Some(Self { columns })
    }

    pub fn card_count(&self) -> usize {
        self.columns.iter().map(|column| column.cards.len()).sum()
    }

    /// Render the board document
    pub fn to_markdown(&self) -> String {
        let mut output = String::from(KANBAN_HEADER);

        for column in &self.columns {
            output.push_str(&format!("## {}\n\n", column.name));
            for card in &column.cards {
                output.push_str(&card.to_markdown());
                output.push('\n');
            }
            output.push_str("\n\n");
        }

        output
    }
}
