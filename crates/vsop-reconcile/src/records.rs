//! Typed records built from resolved rows.
//!
//! Every field has a defined value at construction: missing cells keep the
//! sentinel, keys become `None`, positions become [`OrderKey::Unordered`],
//! dates that do not parse become `None`. No row is ever rejected.

use chrono::NaiveDate;
use serde::Serialize;
use vsop_schema::{LogicalField, ResolvedColumns};
use vsop_table::{present, Row};

use crate::keys::{normalize_join_key, OrderKey};

/// Date layouts seen in the events sheet, tried in order.
pub const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d", "%Y年%m月%d日"];

pub fn parse_event_date(cell: &str) -> Option<NaiveDate> {
    let t = present(cell)?;
    // Exports sometimes carry a time part: "2024-05-01 00:00:00".
    let date_part = t.split_whitespace().next().unwrap_or(t);
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}

// ---------------------------------------------------------------------------
// Performances
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceRecord {
    /// Zero-based row in the performances table.
    pub row: usize,
    pub song_title: String,
    pub vocalist: String,
    pub order: OrderKey,
    pub order_raw: String,
    /// Normalized parent event id; `None` when the cell is missing.
    pub event_key: Option<String>,
    pub video_reference: String,
    pub start_offset: String,
    pub repeat_key: Option<String>,
    pub duration: String,
}

impl PerformanceRecord {
    pub fn from_row(row: &Row<'_>, cols: &ResolvedColumns) -> Self {
        let cell = |f: LogicalField| cols.cell(row, f).to_string();
        let order_raw = cell(LogicalField::Order);

        Self {
            row: row.index(),
            song_title: cell(LogicalField::SongTitle),
            vocalist: cell(LogicalField::Vocalist),
            order: OrderKey::parse(&order_raw),
            order_raw,
            event_key: normalize_join_key(cols.cell(row, LogicalField::ParentEvent)),
            video_reference: cell(LogicalField::VideoReference),
            start_offset: cell(LogicalField::StartOffset),
            repeat_key: present(cols.cell(row, LogicalField::RepeatKey)).map(str::to_string),
            duration: cell(LogicalField::Duration),
        }
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    /// Announced, not yet performed.
    Scheduled,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventRecord {
    /// Zero-based row in the events table.
    pub row: usize,
    /// Normalized id used for the join; `None` when the cell is missing.
    pub key: Option<String>,
    pub raw_id: String,
    pub title: String,
    pub date_raw: String,
    pub date: Option<NaiveDate>,
    pub venue: String,
    pub status: EventStatus,
    pub status_raw: String,
    pub video_base_link: String,
}

impl EventRecord {
    /// `scheduled_markers` are compared case-insensitively against the trimmed status cell.
    pub fn from_row(row: &Row<'_>, cols: &ResolvedColumns, scheduled_markers: &[String]) -> Self {
        let cell = |f: LogicalField| cols.cell(row, f).to_string();
        let raw_id = cell(LogicalField::EventId);
        let date_raw = cell(LogicalField::Date);
        let status_raw = cell(LogicalField::Status);

        let status = match present(&status_raw) {
            Some(s) if scheduled_markers.iter().any(|m| m.trim().to_lowercase() == s.to_lowercase()) => {
                EventStatus::Scheduled
            }
            _ => EventStatus::Completed,
        };

        Self {
            row: row.index(),
            key: normalize_join_key(&raw_id),
            raw_id,
            title: cell(LogicalField::Title),
            date: parse_event_date(&date_raw),
            date_raw,
            venue: cell(LogicalField::Venue),
            status,
            status_raw,
            video_base_link: cell(LogicalField::VideoBaseLink),
        }
    }

    pub fn is_scheduled(&self) -> bool {
        self.status == EventStatus::Scheduled
    }

    /// `"<date> <venue> <title>"`, the text event search runs over.
    pub fn search_text(&self) -> String {
        format!("{} {} {}", self.date_raw, self.venue, self.title)
    }

    /// Title if present, else the raw id.
    pub fn label(&self) -> &str {
        present(&self.title).unwrap_or(&self.raw_id)
    }
}
