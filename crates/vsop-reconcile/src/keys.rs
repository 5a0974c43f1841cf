//! Key normalization: join identifiers and setlist positions.
//!
//! Spreadsheet exports lose type information. The same event id can arrive
//! as `42`, `"42"` or `"42.0"` depending on which tool touched the sheet
//! last; positions can be blank, placeholders or free text. Everything here
//! is total: bad input degrades to "no key" or [`OrderKey::Unordered`].

use std::cmp::Ordering;

use serde::Serialize;
use vsop_table::present;

/// String form of a join identifier, or `None` when the cell is missing.
///
/// Trims, then drops a float-formatting artifact from integral numbers
/// (`"42.0"`, `"42.000"` → `"42"`). Other values pass through unchanged.
pub fn normalize_join_key(cell: &str) -> Option<String> {
    let t = present(cell)?;
    Some(strip_float_artifact(t).to_string())
}

fn strip_float_artifact(s: &str) -> &str {
    let Some((int, frac)) = s.split_once('.') else {
        return s;
    };
    let digits = int.strip_prefix(['-', '+']).unwrap_or(int);
    let integral = !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit());
    let zero_frac = !frac.is_empty() && frac.bytes().all(|b| b == b'0');
    if integral && zero_frac {
        int
    } else {
        s
    }
}

/// `true` when two cells name the same key after normalization.
pub fn same_key(a: &str, b: &str) -> bool {
    match (normalize_join_key(a), normalize_join_key(b)) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

/// `true` when two order cells name the same setlist position.
///
/// Numeric cells compare by value (`5`, `05`, `5.0`); anything else falls
/// back to [`same_key`].
pub fn same_position(a: &str, b: &str) -> bool {
    match (OrderKey::parse(a), OrderKey::parse(b)) {
        (OrderKey::Position(x), OrderKey::Position(y)) => x == y,
        _ => same_key(a, b),
    }
}

/// `true` for cells that parse to the number zero (`0`, `0.0`, `-0`).
pub fn is_zero_like(cell: &str) -> bool {
    present(cell)
        .and_then(|t| t.parse::<f64>().ok())
        .is_some_and(|v| v == 0.0)
}

// ---------------------------------------------------------------------------
// Ordering key
// ---------------------------------------------------------------------------

/// Numeric setlist position. Unparseable positions sort after all numeric ones.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderKey {
    Position(f64),
    Unordered,
}

impl OrderKey {
    pub fn parse(cell: &str) -> Self {
        match present(cell).and_then(|t| t.parse::<f64>().ok()) {
            Some(v) if v.is_finite() => OrderKey::Position(v),
            _ => OrderKey::Unordered,
        }
    }

    pub fn is_unordered(&self) -> bool {
        matches!(self, OrderKey::Unordered)
    }
}

impl Ord for OrderKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (OrderKey::Position(a), OrderKey::Position(b)) => a.total_cmp(b),
            (OrderKey::Position(_), OrderKey::Unordered) => Ordering::Less,
            (OrderKey::Unordered, OrderKey::Position(_)) => Ordering::Greater,
            (OrderKey::Unordered, OrderKey::Unordered) => Ordering::Equal,
        }
    }
}

impl PartialOrd for OrderKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for OrderKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OrderKey {}
