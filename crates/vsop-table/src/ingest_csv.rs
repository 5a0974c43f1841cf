//! CSV ingestion for raw tables.
//!
//! The header row names the columns; nothing about the header is required
//! here. Column meaning is decided later by the schema resolver, so this
//! module accepts any header set, including one that is missing every
//! expected column.
//!
//! Tolerated input drift:
//! - UTF-8 BOM before the header
//! - short or long rows (padded with the missing sentinel / truncated)
//! - rows whose cells are all blank (skipped; spreadsheet exports pad with these)

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::source::{SourceError, TableSource};
use crate::{RawTable, TableKind};

/// Parse CSV text into a [`RawTable`].
///
/// Empty input yields an empty table with no columns.
pub fn parse_csv_str(src: &str) -> Result<RawTable, SourceError> {
    let src = src.trim_start_matches('\u{feff}');
    if src.trim().is_empty() {
        return Ok(RawTable::default());
    }

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(src.as_bytes());

    let columns: Vec<String> = rdr
        .headers()
        .map_err(|e| SourceError::Csv(format!("header: {e}")))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut skipped_blank = 0usize;
    for (i, rec) in rdr.records().enumerate() {
        // Header is line 1.
        let rec = rec.map_err(|e| SourceError::Csv(format!("row {}: {e}", i + 2)))?;
        if rec.iter().all(|c| c.trim().is_empty()) {
            skipped_blank += 1;
            continue;
        }
        rows.push(rec.iter().map(str::to_string).collect());
    }

    debug!(
        columns = columns.len(),
        rows = rows.len(),
        skipped_blank,
        "parsed csv table"
    );
    Ok(RawTable::new(columns, rows))
}

/// Read and parse a CSV file.
pub fn parse_csv_file(path: &Path) -> Result<RawTable, SourceError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| SourceError::Io(format!("read '{}': {e}", path.display())))?;
    parse_csv_str(&raw)
}

/// Two local CSV files, one per table.
#[derive(Debug, Clone)]
pub struct CsvFileSource {
    performances: PathBuf,
    events: PathBuf,
}

impl CsvFileSource {
    pub fn new(performances: impl Into<PathBuf>, events: impl Into<PathBuf>) -> Self {
        Self {
            performances: performances.into(),
            events: events.into(),
        }
    }

    pub fn path(&self, kind: TableKind) -> &Path {
        match kind {
            TableKind::Performances => &self.performances,
            TableKind::Events => &self.events,
        }
    }
}

impl TableSource for CsvFileSource {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn load(&self, kind: TableKind) -> Result<RawTable, SourceError> {
        parse_csv_file(self.path(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MISSING_CELL;

    #[test]
    fn empty_input_returns_empty_table() {
        let t = parse_csv_str("").unwrap();
        assert!(t.is_empty());
        assert!(t.columns().is_empty());
    }

    #[test]
    fn header_only_returns_columns_without_rows() {
        let t = parse_csv_str("楽曲名,演奏順\n").unwrap();
        assert_eq!(t.columns().len(), 2);
        assert!(t.is_empty());
    }

    #[test]
    fn bom_and_header_whitespace_are_stripped() {
        let t = parse_csv_str("\u{feff} 楽曲名 , STARTTIME \nSong A,75\n").unwrap();
        assert_eq!(t.columns(), &["楽曲名".to_string(), "STARTTIME".to_string()]);
        assert_eq!(t.cell(0, "STARTTIME"), "75");
    }

    #[test]
    fn short_rows_are_padded_with_sentinel() {
        let t = parse_csv_str("a,b,c\n1,2\n").unwrap();
        assert_eq!(t.cell(0, "c"), MISSING_CELL);
    }

    #[test]
    fn empty_cells_become_sentinel() {
        let t = parse_csv_str("a,b\n1,\n").unwrap();
        assert_eq!(t.cell(0, "b"), MISSING_CELL);
    }

    #[test]
    fn blank_rows_are_skipped() {
        let t = parse_csv_str("a,b\n1,2\n,\n , \n3,4\n").unwrap();
        assert_eq!(t.len(), 2);
        assert_eq!(t.cell(1, "a"), "3");
    }

    #[test]
    fn quoted_cells_keep_commas() {
        let t = parse_csv_str("title,venue\n\"Live, Vol.1\",Hall\n").unwrap();
        assert_eq!(t.cell(0, "title"), "Live, Vol.1");
    }

    #[test]
    fn float_formatted_ids_are_preserved_verbatim() {
        // Interpreting "42.0" is the reconciliation engine's job, not ingestion's.
        let t = parse_csv_str("ライブID\n42.0\n").unwrap();
        assert_eq!(t.cell(0, "ライブID"), "42.0");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = parse_csv_file(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, SourceError::Io(_)));
        assert!(err.to_string().contains("not/here.csv"));
    }
}
