use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, warn};
use vsop_table::{RawTable, Row, TableKind, MISSING_CELL};

use crate::config::SchemaConfig;
use crate::field::LogicalField;
use crate::rules::{MatchRule, DEFAULT_CHAIN};

// ---------------------------------------------------------------------------
// Resolution result
// ---------------------------------------------------------------------------

/// Where a logical field's values live in one table instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolvedColumn {
    /// A column that was present in the source.
    Actual { name: String, rule: MatchRule },
    /// A placeholder column added to the table, every cell `fallback`.
    Virtual { name: String, fallback: String },
}

impl ResolvedColumn {
    pub fn name(&self) -> &str {
        match self {
            ResolvedColumn::Actual { name, .. } | ResolvedColumn::Virtual { name, .. } => name,
        }
    }

    pub fn is_virtual(&self) -> bool {
        matches!(self, ResolvedColumn::Virtual { .. })
    }
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Resolves logical fields against ONE table instance.
///
/// Results are cached by field name, so repeated calls return the same
/// column and synthesize at most once per field.
#[derive(Debug, Clone)]
pub struct Resolver {
    markers: Vec<String>,
    virtual_suffix: String,
    cache: BTreeMap<String, ResolvedColumn>,
}

impl Resolver {
    pub fn new(markers: Vec<String>, virtual_suffix: impl Into<String>) -> Self {
        Self {
            markers,
            virtual_suffix: virtual_suffix.into(),
            cache: BTreeMap::new(),
        }
    }

    pub fn from_config(cfg: &SchemaConfig) -> Self {
        Self::new(cfg.do_not_match_markers.clone(), cfg.virtual_suffix.clone())
    }

    /// Resolve with the default rule chain.
    pub fn resolve(
        &mut self,
        table: &mut RawTable,
        field_name: &str,
        aliases: &[String],
        fallback: &str,
    ) -> ResolvedColumn {
        self.resolve_with(table, field_name, aliases, fallback, &DEFAULT_CHAIN)
    }

    /// Resolve with an explicit rule chain. Synthesis runs after the chain
    /// whether or not the chain names it, so this never fails.
    pub fn resolve_with(
        &mut self,
        table: &mut RawTable,
        field_name: &str,
        aliases: &[String],
        fallback: &str,
        rules: &[MatchRule],
    ) -> ResolvedColumn {
        if let Some(hit) = self.cache.get(field_name) {
            return hit.clone();
        }

        let found = {
            let candidates: Vec<&str> = table
                .columns()
                .iter()
                .map(String::as_str)
                .filter(|c| !c.is_empty() && table.added_column_value(c).is_none())
                .collect();

            rules
                .iter()
                .take_while(|r| **r != MatchRule::Synthesize)
                .find_map(|rule| {
                    rule.find(&candidates, aliases, &self.markers)
                        .map(|name| (name.to_string(), *rule))
                })
        };

        let resolved = match found {
            Some((name, rule)) => {
                debug!(field = field_name, column = %name, rule = %rule, "column resolved");
                ResolvedColumn::Actual { name, rule }
            }
            None => self.synthesize(table, field_name, aliases, fallback),
        };

        self.cache.insert(field_name.to_string(), resolved.clone());
        resolved
    }

    fn synthesize(
        &self,
        table: &mut RawTable,
        field_name: &str,
        aliases: &[String],
        fallback: &str,
    ) -> ResolvedColumn {
        let base = aliases
            .iter()
            .map(|a| a.trim())
            .find(|a| !a.is_empty())
            .unwrap_or(field_name);
        let name = virtual_name(table, &format!("{base}{}", self.virtual_suffix), field_name, fallback);

        if table.add_constant_column(&name, fallback) {
            warn!(
                field = field_name,
                column = %name,
                fallback,
                "no matching column; added virtual column"
            );
        } else {
            debug!(field = field_name, column = %name, "reusing virtual column with the same fallback");
        }

        ResolvedColumn::Virtual {
            name,
            fallback: fallback.to_string(),
        }
    }
}

/// First free name for a virtual column, starting at `preferred`.
///
/// A name is usable when no column has it, or when it is an added column that
/// already holds `fallback` in every row. Source columns and added columns
/// with another value are skipped: `<preferred>_<field>`, then
/// `<preferred>_<field>_2`, `_3`, ...
fn virtual_name(table: &RawTable, preferred: &str, field_name: &str, fallback: &str) -> String {
    let usable =
        |name: &str| !table.has_column(name) || table.added_column_value(name) == Some(fallback);

    if usable(preferred) {
        return preferred.to_string();
    }
    let keyed = format!("{preferred}_{field_name}");
    if usable(&keyed) {
        return keyed;
    }
    let mut n = 2usize;
    loop {
        let candidate = format!("{keyed}_{n}");
        if usable(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

// ---------------------------------------------------------------------------
// Per-table map
// ---------------------------------------------------------------------------

/// Logical field → column for one table. Every field of the table has an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedColumns {
    pub table: TableKind,
    pub columns: BTreeMap<LogicalField, ResolvedColumn>,
}

impl ResolvedColumns {
    pub fn get(&self, field: LogicalField) -> Option<&ResolvedColumn> {
        self.columns.get(&field)
    }

    pub fn column_name(&self, field: LogicalField) -> Option<&str> {
        self.get(field).map(ResolvedColumn::name)
    }

    /// The row's value for `field`; the missing sentinel if the field is not of this table.
    pub fn cell<'t>(&self, row: &Row<'t>, field: LogicalField) -> &'t str {
        match self.column_name(field) {
            Some(name) => row.get(name),
            None => MISSING_CELL,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (LogicalField, &ResolvedColumn)> + '_ {
        self.columns.iter().map(|(f, c)| (*f, c))
    }

    pub fn virtual_fields(&self) -> Vec<LogicalField> {
        self.iter()
            .filter(|(_, c)| c.is_virtual())
            .map(|(f, _)| f)
            .collect()
    }
}

/// Resolve every logical field of `kind` against `table`, adding virtual
/// columns to it where needed.
pub fn resolve_table(cfg: &SchemaConfig, kind: TableKind, table: &mut RawTable) -> ResolvedColumns {
    let mut resolver = Resolver::from_config(cfg);
    let mut columns = BTreeMap::new();

    for spec in cfg.specs_for(kind) {
        let resolved = resolver.resolve_with(
            table,
            spec.field.key(),
            &spec.aliases,
            &spec.fallback,
            &spec.rules,
        );
        columns.insert(spec.field, resolved);
    }

    ResolvedColumns {
        table: kind,
        columns,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &[&str]) -> Vec<String> {
        v.iter().map(|x| x.to_string()).collect()
    }

    fn resolver() -> Resolver {
        Resolver::new(s(&["translated"]), "_virtual")
    }

    #[test]
    fn exact_match_beats_substring() {
        let mut t = RawTable::from_rows(&["Song Name", "song"], &[&["a", "b"]]);
        let hit = resolver().resolve(&mut t, "song_title", &s(&["Song"]), "-");
        assert_eq!(
            hit,
            ResolvedColumn::Actual {
                name: "song".to_string(),
                rule: MatchRule::Exact
            }
        );
    }

    #[test]
    fn substring_used_when_no_exact() {
        let mut t = RawTable::from_rows(&["Song Name"], &[&["a"]]);
        let hit = resolver().resolve(&mut t, "song_title", &s(&["Song"]), "-");
        assert_eq!(hit.name(), "Song Name");
        assert_eq!(
            hit,
            ResolvedColumn::Actual {
                name: "Song Name".to_string(),
                rule: MatchRule::MarkerExcludingSubstring
            }
        );
    }

    #[test]
    fn missing_field_synthesizes_once() {
        let mut t = RawTable::from_rows(&["楽曲名"], &[&["a"], &["b"]]);
        let mut r = resolver();
        let first = r.resolve(&mut t, "start_offset", &s(&["STARTTIME", "Start"]), "0");
        let second = r.resolve(&mut t, "start_offset", &s(&["STARTTIME", "Start"]), "0");

        assert_eq!(first, second);
        assert_eq!(first.name(), "STARTTIME_virtual");
        assert!(first.is_virtual());
        assert_eq!(t.columns().len(), 2);
        assert!(t.rows().all(|row| row.get("STARTTIME_virtual") == "0"));
    }

    #[test]
    fn fresh_resolver_does_not_match_virtual_columns() {
        let mut t = RawTable::from_rows(&["楽曲名"], &[&["a"]]);
        resolver().resolve(&mut t, "vocalist", &s(&["Vocal"]), "-");
        // A second resolver over the same table must not treat Vocal_virtual as real.
        let again = resolver().resolve(&mut t, "vocalist", &s(&["Vocal"]), "-");
        assert!(again.is_virtual());
        assert_eq!(t.columns().len(), 2);
    }

    #[test]
    fn shared_first_alias_gets_a_column_per_fallback() {
        let mut t = RawTable::from_rows(&["x"], &[&["1"], &["2"]]);
        let mut r = resolver();
        let a = r.resolve(&mut t, "f1", &s(&["Same"]), "A");
        let b = r.resolve(&mut t, "f2", &s(&["Same"]), "B");

        assert_eq!(a.name(), "Same_virtual");
        assert_eq!(b.name(), "Same_virtual_f2");
        assert!(t.rows().all(|row| row.get(a.name()) == "A"));
        assert!(t.rows().all(|row| row.get(b.name()) == "B"));
    }

    #[test]
    fn shared_first_alias_with_same_fallback_shares_the_column() {
        let mut t = RawTable::from_rows(&["x"], &[&["1"]]);
        let mut r = resolver();
        let a = r.resolve(&mut t, "f1", &s(&["Same"]), "-");
        let b = r.resolve(&mut t, "f2", &s(&["Same"]), "-");
        assert_eq!(a.name(), b.name());
        assert_eq!(t.columns().len(), 2);
    }

    #[test]
    fn source_column_with_suffix_is_matched_as_real() {
        let mut t = RawTable::from_rows(&["STARTTIME_virtual"], &[&["99"]]);
        let hit = resolver().resolve(&mut t, "start_offset", &s(&["STARTTIME"]), "0");
        assert_eq!(
            hit,
            ResolvedColumn::Actual {
                name: "STARTTIME_virtual".to_string(),
                rule: MatchRule::MarkerExcludingSubstring
            }
        );
        assert_eq!(t.columns().len(), 1);
    }

    #[test]
    fn synthesis_skips_a_source_column_holding_the_virtual_name() {
        let mut t = RawTable::from_rows(&["Order_virtual"], &[&["99"]]);
        let hit = resolver().resolve_with(&mut t, "order", &s(&["Order"]), "-", &[MatchRule::Synthesize]);
        assert_eq!(
            hit,
            ResolvedColumn::Virtual {
                name: "Order_virtual_order".to_string(),
                fallback: "-".to_string()
            }
        );
        let row = t.row(0).unwrap();
        assert_eq!(row.get("Order_virtual"), "99");
        assert_eq!(row.get("Order_virtual_order"), "-");
    }

    #[test]
    fn chain_without_synthesize_still_resolves() {
        let mut t = RawTable::from_rows(&["x"], &[&["1"]]);
        let hit = resolver().resolve_with(&mut t, "order", &s(&["Order"]), "-", &[MatchRule::Exact]);
        assert_eq!(hit.name(), "Order_virtual");
    }

    #[test]
    fn synthesize_first_skips_matching() {
        let mut t = RawTable::from_rows(&["Order"], &[&["1"]]);
        let hit = resolver().resolve_with(
            &mut t,
            "order",
            &s(&["Order"]),
            "-",
            &[MatchRule::Synthesize, MatchRule::Exact],
        );
        assert!(hit.is_virtual());
    }

    #[test]
    fn no_aliases_names_virtual_after_field() {
        let mut t = RawTable::from_rows(&["x"], &[]);
        let hit = resolver().resolve(&mut t, "venue", &[], "-");
        assert_eq!(hit.name(), "venue_virtual");
    }

    #[test]
    fn resolve_table_covers_every_field() {
        let cfg = SchemaConfig::default();
        let mut t = RawTable::from_rows(&["日付", "会場名", "ライブ名"], &[&["2024-01-01", "Hall", "Live A"]]);
        let map = resolve_table(&cfg, TableKind::Events, &mut t);

        assert_eq!(map.columns.len(), LogicalField::EVENTS.len());
        assert_eq!(map.column_name(LogicalField::Date), Some("日付"));
        assert_eq!(map.column_name(LogicalField::Venue), Some("会場名"));
        assert_eq!(map.column_name(LogicalField::EventId), Some("ライブ名"));
        assert_eq!(map.column_name(LogicalField::Title), Some("ライブ名"));
        assert_eq!(
            map.virtual_fields(),
            vec![LogicalField::Status, LogicalField::VideoBaseLink]
        );

        let row = t.row(0).unwrap();
        assert_eq!(map.cell(&row, LogicalField::Venue), "Hall");
        assert_eq!(map.cell(&row, LogicalField::Status), MISSING_CELL);
        assert_eq!(map.cell(&row, LogicalField::SongTitle), MISSING_CELL);
    }
}
