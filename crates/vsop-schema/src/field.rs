//! Logical fields: the stable names downstream code reads by.

use std::fmt;

use serde::Serialize;
use vsop_table::TableKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalField {
    // performances
    SongTitle,
    Vocalist,
    Order,
    /// Identifier of the parent event, as written in the performances table.
    ParentEvent,
    VideoReference,
    StartOffset,
    RepeatKey,
    Duration,

    // events
    EventId,
    Title,
    Date,
    Venue,
    Status,
    VideoBaseLink,
}

impl LogicalField {
    pub const PERFORMANCES: [LogicalField; 8] = [
        LogicalField::SongTitle,
        LogicalField::Vocalist,
        LogicalField::Order,
        LogicalField::ParentEvent,
        LogicalField::VideoReference,
        LogicalField::StartOffset,
        LogicalField::RepeatKey,
        LogicalField::Duration,
    ];

    pub const EVENTS: [LogicalField; 6] = [
        LogicalField::EventId,
        LogicalField::Title,
        LogicalField::Date,
        LogicalField::Venue,
        LogicalField::Status,
        LogicalField::VideoBaseLink,
    ];

    /// Stable key used in config files and diagnostics.
    pub fn key(&self) -> &'static str {
        match self {
            LogicalField::SongTitle => "song_title",
            LogicalField::Vocalist => "vocalist",
            LogicalField::Order => "order",
            LogicalField::ParentEvent => "parent_event",
            LogicalField::VideoReference => "video_reference",
            LogicalField::StartOffset => "start_offset",
            LogicalField::RepeatKey => "repeat_key",
            LogicalField::Duration => "duration",
            LogicalField::EventId => "event_id",
            LogicalField::Title => "title",
            LogicalField::Date => "date",
            LogicalField::Venue => "venue",
            LogicalField::Status => "status",
            LogicalField::VideoBaseLink => "video_base_link",
        }
    }

    pub fn parse(key: &str) -> Option<Self> {
        Self::PERFORMANCES
            .iter()
            .chain(Self::EVENTS.iter())
            .copied()
            .find(|f| f.key() == key.trim())
    }

    /// The table this field is read from.
    pub fn table(&self) -> TableKind {
        if Self::PERFORMANCES.contains(self) {
            TableKind::Performances
        } else {
            TableKind::Events
        }
    }

    pub fn for_table(kind: TableKind) -> &'static [LogicalField] {
        match kind {
            TableKind::Performances => &Self::PERFORMANCES,
            TableKind::Events => &Self::EVENTS,
        }
    }
}

impl fmt::Display for LogicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
