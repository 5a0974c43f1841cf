//! Read-only views over a loaded catalog, printed as `key=value` lines.

use anyhow::{Context, Result};
use serde::Serialize;
use vsop_link::LinkSynthesizer;
use vsop_reconcile::{Catalog, EnrichedPerformance, EventRecord, EventStatus, JoinReport};
use vsop_schema::{ResolvedColumn, ResolvedColumns};
use vsop_table::TableKind;

#[derive(Serialize)]
struct ColumnsDump<'a> {
    performances: &'a ResolvedColumns,
    events: &'a ResolvedColumns,
    report: JoinReport,
}

pub fn print_columns(catalog: &Catalog, json: bool) -> Result<()> {
    if json {
        let dump = ColumnsDump {
            performances: catalog.columns(TableKind::Performances),
            events: catalog.columns(TableKind::Events),
            report: catalog.report(),
        };
        let s = serde_json::to_string_pretty(&dump).context("serialize columns")?;
        println!("{s}");
        return Ok(());
    }

    for kind in TableKind::ALL {
        for (field, col) in catalog.columns(kind).iter() {
            match col {
                ResolvedColumn::Actual { name, rule } => println!(
                    "table={kind} field={field} column={name} kind=actual rule={rule}"
                ),
                ResolvedColumn::Virtual { name, fallback } => println!(
                    "table={kind} field={field} column={name} kind=virtual fallback={fallback}"
                ),
            }
        }
    }

    let r = catalog.report();
    println!(
        "performances={} events={} matched={} unmatched={} unordered={}",
        r.performances, r.events, r.matched, r.unmatched, r.unordered
    );
    Ok(())
}

pub fn print_songs(catalog: &Catalog, limit: Option<usize>) {
    let stats = catalog.song_stats();
    let n = limit.unwrap_or(stats.len());
    for (i, s) in stats.iter().take(n).enumerate() {
        println!(
            "rank={} title={} plays={} vocalist={} duration={}",
            i + 1,
            s.title,
            s.play_count,
            s.first_vocalist,
            s.first_duration
        );
    }
}

pub fn print_events(catalog: &Catalog, search: Option<&str>, upcoming: bool, by_date: bool) {
    let mut events: Vec<&EventRecord> = if upcoming {
        catalog.upcoming_events()
    } else if by_date {
        catalog.events_by_date()
    } else {
        catalog.events()
    };
    if let Some(q) = search {
        events = vsop_reconcile::search_events(&events, q);
    }

    for ev in events {
        print_event_line(ev);
    }
}

fn print_event_line(ev: &EventRecord) {
    println!(
        "id={} date={} venue={} title={} status={}",
        ev.raw_id,
        ev.date_raw,
        ev.venue,
        ev.title,
        status_str(ev.status)
    );
}

fn status_str(s: EventStatus) -> &'static str {
    match s {
        EventStatus::Scheduled => "scheduled",
        EventStatus::Completed => "completed",
    }
}

pub fn print_setlist(catalog: &Catalog, links: &LinkSynthesizer, event_id: &str) -> Result<()> {
    let ev = catalog
        .event(event_id)
        .with_context(|| format!("no event with id '{event_id}'"))?;
    let setlist = catalog.setlist(event_id);

    println!(
        "event={} title={} date={} venue={} songs={}",
        ev.raw_id,
        ev.label(),
        ev.date_raw,
        ev.venue,
        setlist.len()
    );

    for p in setlist {
        let link = links.build_link(p.effective_video_reference(), &p.record.start_offset);
        let previous = match catalog.previous_performance(p) {
            Some(prev) => previous_fields(catalog, links, prev),
            None => "previous=none".to_string(),
        };
        println!(
            "order={} title={} vocalist={} link={} {}",
            p.record.order_raw, p.record.song_title, p.record.vocalist, link, previous
        );
    }
    Ok(())
}

fn previous_fields(catalog: &Catalog, links: &LinkSynthesizer, prev: &EnrichedPerformance) -> String {
    let event = prev.record.event_key.as_deref().unwrap_or("-");
    let label = catalog.event(event).map(EventRecord::label).unwrap_or(event);
    let link = links.build_link(prev.effective_video_reference(), &prev.record.start_offset);
    format!("previous={label} previous_order={} previous_link={link}", prev.record.order_raw)
}
