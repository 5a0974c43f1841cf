//! Source boundary: where raw tables come from.
//!
//! A source either yields a whole table or fails; there is no partial table.
//! Callers treat any [`SourceError`] as fatal for the current load cycle.

use std::collections::BTreeMap;
use std::fmt;

use crate::{RawTable, TableKind, TablePair};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors a [`TableSource`] may return.
#[derive(Debug)]
pub enum SourceError {
    /// File-system failure reading a local table.
    Io(String),
    /// The payload could not be decoded as CSV.
    Csv(String),
    /// Network or transport failure.
    Transport(String),
    /// The remote endpoint answered with a non-success status.
    Http { status: u16, message: String },
    /// The source does not hold the requested table.
    Missing(TableKind),
    /// The source is misconfigured (e.g. no URL or path given).
    Config(String),
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::Io(msg) => write!(f, "io error: {msg}"),
            SourceError::Csv(msg) => write!(f, "csv error: {msg}"),
            SourceError::Transport(msg) => write!(f, "transport error: {msg}"),
            SourceError::Http { status, message } => {
                write!(f, "http error status={status}: {message}")
            }
            SourceError::Missing(kind) => write!(f, "source has no '{kind}' table"),
            SourceError::Config(msg) => write!(f, "source config error: {msg}"),
        }
    }
}

impl std::error::Error for SourceError {}

// ---------------------------------------------------------------------------
// Source trait
// ---------------------------------------------------------------------------

/// Anything that can produce the raw performances and events tables.
///
/// Object safe so callers can hold a `Box<dyn TableSource>` chosen from config.
pub trait TableSource: Send + Sync {
    /// Short name identifying this source kind (e.g. `"csv"`).
    fn name(&self) -> &'static str;

    /// Read one table in full.
    fn load(&self, kind: TableKind) -> Result<RawTable, SourceError>;

    /// Read both tables; the first failure aborts the pair.
    fn load_pair(&self) -> Result<TablePair, SourceError> {
        Ok(TablePair {
            performances: self.load(TableKind::Performances)?,
            events: self.load(TableKind::Events)?,
        })
    }
}

// ---------------------------------------------------------------------------
// In-memory source
// ---------------------------------------------------------------------------

/// Tables already held in memory: fixtures, or a remote fetch kept for the cycle.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    tables: BTreeMap<TableKind, RawTable>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pair(pair: TablePair) -> Self {
        Self::new()
            .with(TableKind::Performances, pair.performances)
            .with(TableKind::Events, pair.events)
    }

    pub fn with(mut self, kind: TableKind, table: RawTable) -> Self {
        self.tables.insert(kind, table);
        self
    }
}

impl TableSource for MemorySource {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn load(&self, kind: TableKind) -> Result<RawTable, SourceError> {
        self.tables
            .get(&kind)
            .cloned()
            .ok_or(SourceError::Missing(kind))
    }
}
