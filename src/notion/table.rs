//! Notion database exports
//!
//! A database is exported as a CSV file with a header line. Rows are kept
//! as ordered (column, value) pairs so that header order, which decides the
//! title column, survives.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One database record: cells in header order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    cells: Vec<(String, String)>,
}

impl Row {
    /// Build a row from cells; a repeated column keeps its first position
    /// and its last value
    pub fn new(cells: Vec<(String, String)>) -> Self {
        let mut row = Self::default();
        for (column, value) in cells {
            row.set(column, value);
        }
        row
    }

    /// Value of a column, `None` when this row has no such cell
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    /// Set a cell, replacing the value of an existing column in place
    fn set(&mut self, column: String, value: String) {
        match self.cells.iter_mut().find(|(name, _)| *name == column) {
            Some((_, existing)) => *existing = value,
            None => self.cells.push((column, value)),
        }
    }

    /// Column names in header order
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// A parsed database export
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    /// Parse CSV text. A leading byte order mark is dropped.
    ///
    /// Every row gets a cell for every header: short rows are padded with
    /// empty values and cells beyond the header are ignored.
    pub fn parse(content: &str) -> Result<Self> {
        let content = strip_bom(content);
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(content.as_bytes());

        let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            let row: Row = headers
                .iter()
                .enumerate()
                .map(|(i, header)| (header.clone(), record.get(i).unwrap_or_default().to_string()))
                .collect();
            rows.push(row);
        }

        Ok(Self { headers, rows })
    }
}

/// Drop a UTF-8 byte order mark, as Notion writes one in front of CSV exports
pub fn strip_bom(content: &str) -> &str {
    content.strip_prefix('\u{feff}').unwrap_or(content)
}
