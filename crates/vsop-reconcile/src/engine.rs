use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;
use vsop_table::{present, MISSING_CELL};

use crate::keys::{is_zero_like, same_key, same_position};
use crate::records::{EventRecord, PerformanceRecord};

/// A performance with its parent event's video base link copied in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedPerformance {
    #[serde(flatten)]
    pub record: PerformanceRecord,
    /// Parent event's base link; empty when unmatched or the event has none.
    pub event_video_base_link: String,
    pub matched: bool,
}

impl EnrichedPerformance {
    /// Own video reference, else the event's base link, else the sentinel.
    pub fn effective_video_reference(&self) -> &str {
        if let Some(own) = present(&self.record.video_reference) {
            return own;
        }
        present(&self.event_video_base_link).unwrap_or(MISSING_CELL)
    }
}

/// Left join of performances onto events by normalized event id.
///
/// Output keeps performance table order. When several events share an id
/// the first one in table order is the parent.
pub fn join(performances: &[PerformanceRecord], events: &[EventRecord]) -> Vec<EnrichedPerformance> {
    let mut by_key: BTreeMap<&str, &EventRecord> = BTreeMap::new();
    for ev in events {
        if let Some(key) = ev.key.as_deref() {
            if by_key.contains_key(key) {
                debug!(key, row = ev.row, "duplicate event id; keeping first");
                continue;
            }
            by_key.insert(key, ev);
        }
    }

    let out: Vec<EnrichedPerformance> = performances
        .iter()
        .map(|p| {
            let parent = p.event_key.as_deref().and_then(|k| by_key.get(k));
            EnrichedPerformance {
                record: p.clone(),
                event_video_base_link: parent
                    .and_then(|ev| present(&ev.video_base_link))
                    .unwrap_or("")
                    .to_string(),
                matched: parent.is_some(),
            }
        })
        .collect();

    debug!(
        performances = out.len(),
        matched = out.iter().filter(|p| p.matched).count(),
        events = events.len(),
        "join complete"
    );
    out
}

/// Performances of one event, by position. Stable: equal positions keep table order.
pub fn setlist<'a>(performances: &'a [EnrichedPerformance], event_key: &str) -> Vec<&'a EnrichedPerformance> {
    let mut out: Vec<&EnrichedPerformance> = performances
        .iter()
        .filter(|p| p.record.event_key.as_deref().is_some_and(|k| same_key(k, event_key)))
        .collect();
    out.sort_by(|a, b| a.record.order.cmp(&b.record.order));
    out
}

/// The earlier performance `current` links back to through its repeat key.
///
/// First record in table order whose position equals the key and whose event
/// differs from `current`'s. Missing or zero keys have no link.
pub fn find_repeat<'a>(
    performances: &'a [EnrichedPerformance],
    current: &PerformanceRecord,
) -> Option<&'a EnrichedPerformance> {
    let key = current.repeat_key.as_deref()?;
    if is_zero_like(key) {
        return None;
    }

    performances.iter().find(|p| {
        same_position(&p.record.order_raw, key) && p.record.event_key != current.event_key
    })
}
