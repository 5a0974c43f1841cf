//! vsop-table
//!
//! Raw table boundary for the live-history tools.
//!
//! This crate owns the in-memory table shape every source produces, the
//! missing-cell sentinel, and the concrete sources (CSV files, in-memory
//! tables, published-spreadsheet CSV export). It does **not** resolve column
//! names or interpret cells; that is `vsop-schema` and `vsop-reconcile`.

pub mod ingest_csv;
pub mod sheet;
pub mod source;

pub use ingest_csv::{parse_csv_file, parse_csv_str, CsvFileSource};
pub use sheet::SheetExportClient;
pub use source::{MemorySource, SourceError, TableSource};

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Reserved cell value standing in for an empty or missing cell.
pub const MISSING_CELL: &str = "-";

/// Spellings of "no value" that spreadsheet exports and dataframe dumps leave behind.
const NULL_SPELLINGS: &[&str] = &["nan", "none", "null", "<na>", "n/a"];

/// `true` when a cell carries no value: empty, the sentinel, or a null spelling.
pub fn is_missing(cell: &str) -> bool {
    let t = cell.trim();
    if t.is_empty() || t == MISSING_CELL {
        return true;
    }
    let lower = t.to_ascii_lowercase();
    NULL_SPELLINGS.contains(&lower.as_str())
}

/// `Some(trimmed)` for a present cell, `None` for a missing one.
pub fn present(cell: &str) -> Option<&str> {
    if is_missing(cell) {
        None
    } else {
        Some(cell.trim())
    }
}

/// The two tables a load cycle reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    Performances,
    Events,
}

impl TableKind {
    pub const ALL: [TableKind; 2] = [TableKind::Performances, TableKind::Events];

    pub fn as_str(&self) -> &'static str {
        match self {
            TableKind::Performances => "performances",
            TableKind::Events => "events",
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An ordered table of named string cells.
///
/// Construction normalizes the input: column names are trimmed (and a UTF-8
/// BOM dropped), cells are trimmed, empty cells become [`MISSING_CELL`], and
/// every row is padded or truncated to the header width.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
    /// Columns added by [`RawTable::add_constant_column`], with their value.
    added: BTreeMap<String, String>,
}

impl RawTable {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let columns: Vec<String> = columns
            .into_iter()
            .map(|c| c.trim().trim_start_matches('\u{feff}').trim().to_string())
            .collect();
        let width = columns.len();

        let rows = rows
            .into_iter()
            .map(|row| {
                let mut cells: Vec<String> = row
                    .into_iter()
                    .take(width)
                    .map(|c| {
                        let t = c.trim();
                        if t.is_empty() {
                            MISSING_CELL.to_string()
                        } else {
                            t.to_string()
                        }
                    })
                    .collect();
                cells.resize(width, MISSING_CELL.to_string());
                cells
            })
            .collect();

        Self {
            columns,
            rows,
            added: BTreeMap::new(),
        }
    }

    /// Convenience constructor from string slices (tests, fixtures).
    pub fn from_rows(columns: &[&str], rows: &[&[&str]]) -> Self {
        Self::new(
            columns.iter().map(|c| c.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the first column named exactly `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cell at (`row`, `column`); [`MISSING_CELL`] when either does not exist.
    pub fn cell(&self, row: usize, column: &str) -> &str {
        match (self.rows.get(row), self.column_index(column)) {
            (Some(cells), Some(i)) => cells[i].as_str(),
            _ => MISSING_CELL,
        }
    }

    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        (index < self.rows.len()).then_some(Row { table: self, index })
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> + '_ {
        (0..self.rows.len()).map(move |index| Row { table: self, index })
    }

    /// Append a column holding `value` in every row.
    ///
    /// Returns `false` (and changes nothing) if a column with that name exists.
    pub fn add_constant_column(&mut self, name: &str, value: &str) -> bool {
        if self.has_column(name) {
            return false;
        }
        self.columns.push(name.to_string());
        for row in self.rows.iter_mut() {
            row.push(value.to_string());
        }
        self.added.insert(name.to_string(), value.to_string());
        true
    }

    /// The constant of a column added by [`RawTable::add_constant_column`];
    /// `None` for columns that came from the source.
    pub fn added_column_value(&self, name: &str) -> Option<&str> {
        self.added.get(name).map(String::as_str)
    }
}

/// Borrowed view of one table row.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    table: &'a RawTable,
    index: usize,
}

impl<'a> Row<'a> {
    /// Zero-based position of the row in source order.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn get(&self, column: &str) -> &'a str {
        self.table.cell(self.index, column)
    }
}

/// The performances and events tables of one load cycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TablePair {
    pub performances: RawTable,
    pub events: RawTable,
}
