//! vsop-reconcile
//!
//! Cross-table reconciliation for the live-history tools.
//!
//! - Performances join to events by normalized id (`42` == `"42.0"`)
//! - Left join: a performance without a parent event is kept, unmatched
//! - Setlists are stable-sorted by numeric position, unparseable last
//! - Repeat lookup: first other-event performance at the keyed position
//!
//! Deterministic, pure logic over resolved tables. The only IO is the
//! caller-supplied [`vsop_table::TableSource`] in [`Catalog::load`].

mod catalog;
mod engine;
mod keys;
mod records;
mod report;
mod stats;

pub use catalog::{Catalog, ReconcileConfig, DEFAULT_SCHEDULED_STATUS};
pub use engine::{find_repeat, join, setlist, EnrichedPerformance};
pub use keys::{is_zero_like, normalize_join_key, same_key, same_position, OrderKey};
pub use records::{parse_event_date, EventRecord, EventStatus, PerformanceRecord, DATE_FORMATS};
pub use report::JoinReport;
pub use stats::{search_events, song_stats, sort_by_date, upcoming_events, SongStat};
