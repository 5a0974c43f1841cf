//! One load cycle's immutable result.
//!
//! `Catalog::build` runs resolve → record construction → join once; every
//! later question (setlists, repeats, rankings, searches) is answered from
//! the snapshot without touching the tables again.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info};
use vsop_config::EventsSection;
use vsop_schema::{resolve_table, ResolvedColumns, SchemaConfig};
use vsop_table::{SourceError, TableKind, TablePair, TableSource};

use crate::engine::{find_repeat, join, setlist, EnrichedPerformance};
use crate::keys::{normalize_join_key, same_key};
use crate::records::{EventRecord, PerformanceRecord};
use crate::report::JoinReport;
use crate::stats::{search_events, song_stats, sort_by_date, upcoming_events, SongStat};

pub const DEFAULT_SCHEDULED_STATUS: &[&str] = &["未", "予定", "scheduled", "upcoming"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileConfig {
    /// Status values marking an event as not yet performed.
    pub scheduled_status: Vec<String>,
    /// Expose events sorted by date instead of table order.
    pub sort_by_date: bool,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            scheduled_status: DEFAULT_SCHEDULED_STATUS.iter().map(|s| s.to_string()).collect(),
            sort_by_date: false,
        }
    }
}

impl ReconcileConfig {
    pub fn from_section(section: &EventsSection) -> Self {
        let mut cfg = Self::default();
        if let Some(markers) = &section.scheduled_status {
            cfg.scheduled_status = markers.clone();
        }
        cfg.sort_by_date = section.sort_by_date;
        cfg
    }
}

#[derive(Debug, Clone)]
pub struct Catalog {
    performance_columns: ResolvedColumns,
    event_columns: ResolvedColumns,
    /// Performance table order.
    performances: Vec<EnrichedPerformance>,
    /// Event table order.
    events: Vec<EventRecord>,
    sort_by_date: bool,
}

impl Catalog {
    pub fn build(pair: TablePair, schema: &SchemaConfig, cfg: &ReconcileConfig) -> Self {
        let TablePair {
            mut performances,
            mut events,
        } = pair;

        let performance_columns = resolve_table(schema, TableKind::Performances, &mut performances);
        let event_columns = resolve_table(schema, TableKind::Events, &mut events);

        let perf_records: Vec<PerformanceRecord> = performances
            .rows()
            .map(|row| PerformanceRecord::from_row(&row, &performance_columns))
            .collect();
        let event_records: Vec<EventRecord> = events
            .rows()
            .map(|row| EventRecord::from_row(&row, &event_columns, &cfg.scheduled_status))
            .collect();

        let enriched = join(&perf_records, &event_records);

        let catalog = Self {
            performance_columns,
            event_columns,
            performances: enriched,
            events: event_records,
            sort_by_date: cfg.sort_by_date,
        };

        let report = catalog.report();
        info!(
            performances = report.performances,
            events = report.events,
            matched = report.matched,
            unmatched = report.unmatched,
            unordered = report.unordered,
            "catalog built"
        );
        if !report.unmatched_keys.is_empty() {
            debug!(keys = ?report.unmatched_keys, "performances reference unknown events");
        }
        catalog
    }

    /// Read both tables from `source` and build. A table that cannot be read
    /// fails the whole cycle.
    pub fn load(
        source: &dyn TableSource,
        schema: &SchemaConfig,
        cfg: &ReconcileConfig,
    ) -> Result<Self, SourceError> {
        debug!(source = source.name(), "loading tables");
        let pair = source.load_pair()?;
        Ok(Self::build(pair, schema, cfg))
    }

    pub fn columns(&self, kind: TableKind) -> &ResolvedColumns {
        match kind {
            TableKind::Performances => &self.performance_columns,
            TableKind::Events => &self.event_columns,
        }
    }

    /// Enriched performances in table order.
    pub fn performances(&self) -> &[EnrichedPerformance] {
        &self.performances
    }

    /// Events in table order, or by date when configured.
    pub fn events(&self) -> Vec<&EventRecord> {
        if self.sort_by_date {
            self.events_by_date()
        } else {
            self.events.iter().collect()
        }
    }

    pub fn events_by_date(&self) -> Vec<&EventRecord> {
        let mut out: Vec<&EventRecord> = self.events.iter().collect();
        sort_by_date(&mut out);
        out
    }

    /// First event whose id matches `id` after normalization.
    pub fn event(&self, id: &str) -> Option<&EventRecord> {
        let key = normalize_join_key(id)?;
        self.events
            .iter()
            .find(|ev| ev.key.as_deref().is_some_and(|k| same_key(k, &key)))
    }

    /// Performances of one event in setlist order; empty for unknown ids.
    pub fn setlist(&self, event_id: &str) -> Vec<&EnrichedPerformance> {
        match normalize_join_key(event_id) {
            Some(key) => setlist(&self.performances, &key),
            None => Vec::new(),
        }
    }

    /// The earlier performance `current`'s repeat key points at, if any.
    pub fn previous_performance(&self, current: &EnrichedPerformance) -> Option<&EnrichedPerformance> {
        find_repeat(&self.performances, &current.record)
    }

    pub fn song_stats(&self) -> Vec<SongStat> {
        song_stats(&self.performances)
    }

    pub fn search_events(&self, query: &str) -> Vec<&EventRecord> {
        search_events(&self.events(), query)
    }

    pub fn upcoming_events(&self) -> Vec<&EventRecord> {
        upcoming_events(&self.events.iter().collect::<Vec<_>>())
    }

    pub fn report(&self) -> JoinReport {
        let matched = self.performances.iter().filter(|p| p.matched).count();
        let unmatched_keys: BTreeSet<String> = self
            .performances
            .iter()
            .filter(|p| !p.matched)
            .filter_map(|p| p.record.event_key.clone())
            .collect();

        let with_setlist: BTreeSet<&str> = self
            .performances
            .iter()
            .filter(|p| p.matched)
            .filter_map(|p| p.record.event_key.as_deref())
            .collect();
        let mut seen = BTreeSet::new();
        let events_without_setlist = self
            .events
            .iter()
            .filter_map(|ev| ev.key.as_deref())
            .filter(|k| seen.insert(*k) && !with_setlist.contains(k))
            .map(str::to_string)
            .collect();

        let mut virtual_columns = BTreeMap::new();
        for kind in TableKind::ALL {
            virtual_columns.insert(kind, self.columns(kind).virtual_fields());
        }

        JoinReport {
            performances: self.performances.len(),
            events: self.events.len(),
            matched,
            unmatched: self.performances.len() - matched,
            unmatched_keys: unmatched_keys.into_iter().collect(),
            unordered: self
                .performances
                .iter()
                .filter(|p| p.record.order.is_unordered())
                .count(),
            events_without_setlist,
            virtual_columns,
        }
    }
}
