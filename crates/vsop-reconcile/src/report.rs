use std::collections::BTreeMap;

use serde::Serialize;
use vsop_schema::LogicalField;
use vsop_table::TableKind;

/// Join statistics for one load cycle.
///
/// Informational only. Nothing here is an error: unmatched rows and
/// virtual columns are the expected result of drifting sheets.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct JoinReport {
    pub performances: usize,
    pub events: usize,
    pub matched: usize,
    pub unmatched: usize,
    /// Parent ids that named no event (sorted, unique).
    pub unmatched_keys: Vec<String>,
    /// Performances whose position did not parse.
    pub unordered: usize,
    /// Event ids with no performance rows (table order).
    pub events_without_setlist: Vec<String>,
    pub virtual_columns: BTreeMap<TableKind, Vec<LogicalField>>,
}

impl JoinReport {
    /// `true` when every performance matched and no column was invented.
    pub fn is_clean(&self) -> bool {
        self.unmatched == 0 && self.virtual_columns.values().all(Vec::is_empty)
    }
}
