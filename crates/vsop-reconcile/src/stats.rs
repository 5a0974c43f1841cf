//! Read-side views over a catalog: song ranking, event search, upcoming events.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;
use vsop_table::present;

use crate::engine::EnrichedPerformance;
use crate::records::EventRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SongStat {
    pub title: String,
    pub play_count: usize,
    /// Vocalist of the first performance in table order.
    pub first_vocalist: String,
    pub first_duration: String,
    /// Row of the first performance.
    pub first_row: usize,
}

/// Play counts per song title, most played first; ties by first appearance.
/// Rows without a title are not counted.
pub fn song_stats(performances: &[EnrichedPerformance]) -> Vec<SongStat> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut out: Vec<SongStat> = Vec::new();

    for p in performances {
        let Some(title) = present(&p.record.song_title) else {
            continue;
        };
        match index.get(title) {
            Some(&i) => out[i].play_count += 1,
            None => {
                index.insert(title, out.len());
                out.push(SongStat {
                    title: title.to_string(),
                    play_count: 1,
                    first_vocalist: p.record.vocalist.clone(),
                    first_duration: p.record.duration.clone(),
                    first_row: p.record.row,
                });
            }
        }
    }

    out.sort_by(|a, b| {
        b.play_count
            .cmp(&a.play_count)
            .then(a.first_row.cmp(&b.first_row))
    });
    out
}

/// Events whose `"<date> <venue> <title>"` contains `query`, case-insensitively.
/// A blank query matches everything.
pub fn search_events<'a>(events: &[&'a EventRecord], query: &str) -> Vec<&'a EventRecord> {
    let q = query.trim().to_lowercase();
    events
        .iter()
        .copied()
        .filter(|ev| q.is_empty() || ev.search_text().to_lowercase().contains(&q))
        .collect()
}

/// Scheduled events, soonest first; undated ones last in table order.
pub fn upcoming_events<'a>(events: &[&'a EventRecord]) -> Vec<&'a EventRecord> {
    let mut out: Vec<&EventRecord> = events.iter().copied().filter(|ev| ev.is_scheduled()).collect();
    sort_by_date(&mut out);
    out
}

/// Stable sort by parsed date ascending; unparseable dates last.
pub fn sort_by_date(events: &mut [&EventRecord]) {
    events.sort_by(|a, b| match (a.date, b.date) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}
