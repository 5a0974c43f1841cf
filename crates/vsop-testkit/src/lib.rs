//! Shared fixtures for cross-crate scenarios.
//!
//! Each [`Fixture`] is the same small live history written the way a
//! different sheet author would write it. Scenarios load several of them and
//! assert that the answers do not depend on the header spelling.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use vsop_reconcile::{Catalog, ReconcileConfig};
use vsop_schema::SchemaConfig;
use vsop_table::{parse_csv_str, MemorySource, TableKind, TablePair};

const JAPANESE_PERFORMANCES: &str = "\
楽曲名,ボーカル,演奏順,ライブ名,YOUTUBE_ID,STARTTIME,ラスト,演奏時間
星の歌,Aki,1,春の宴,yt_spring,0,-,4:10
夜明け,Mina,2,春の宴,yt_spring,250,-,5:02
星の歌,Mina,1,夏の祭,https://youtu.be/yt_summer,15,-,4:05
雨上がり,Aki,2,夏の祭,,300.0,2,3:58
夜明け,Aki,3,夏の祭,https://www.youtube.com/watch?v=yt_summer,610,,5:10
";

const JAPANESE_EVENTS: &str = "\
ライブ名,日付,会場名,YOUTUBE_URL,STATUS
春の宴,2024年04月20日,渋谷ホール,https://www.youtube.com/watch?v=yt_spring,済
夏の祭,2024/08/10,大阪ドーム,https://youtu.be/yt_summer,済
冬の灯,2025-01-12,名古屋アリーナ,,未
";

const ENGLISH_PERFORMANCES: &str = "\
Song,Vocalist,Order,Event,Video,Start,Last,Duration
星の歌,Aki,1,春の宴,yt_spring,0,,4:10
夜明け,Mina,2,春の宴,yt_spring,250,,5:02
星の歌,Mina,1,夏の祭,https://youtu.be/yt_summer,15,,4:05
雨上がり,Aki,2,夏の祭,,300,2.0,3:58
夜明け,Aki,3,夏の祭,https://www.youtube.com/watch?v=yt_summer,610,nan,5:10
";

const ENGLISH_EVENTS: &str = "\
Event,Date,Venue,Archive,Status
春の宴,2024-04-20,渋谷ホール,https://www.youtube.com/watch?v=yt_spring,done
夏の祭,2024.08.10,大阪ドーム,https://youtu.be/yt_summer,done
冬の灯,2025/01/12,名古屋アリーナ,,scheduled
";

/// Bare-minimum export: numeric ids with float artifacts, almost no columns.
const SPARSE_PERFORMANCES: &str = "\
曲名,ライブID
星の歌,1.0
夜明け,1
雨上がり,3
";

const SPARSE_EVENTS: &str = "\
ライブID
1
2
";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fixture {
    /// Headers as the published sheet has them.
    JapaneseSheet,
    /// Same data, English headers and different null spellings.
    EnglishSheet,
    SparseSheet,
}

impl Fixture {
    /// Fixtures carrying the full spring/summer/winter history.
    pub const FULL_HISTORY: [Fixture; 2] = [Fixture::JapaneseSheet, Fixture::EnglishSheet];

    pub fn csv(&self, kind: TableKind) -> &'static str {
        match (self, kind) {
            (Fixture::JapaneseSheet, TableKind::Performances) => JAPANESE_PERFORMANCES,
            (Fixture::JapaneseSheet, TableKind::Events) => JAPANESE_EVENTS,
            (Fixture::EnglishSheet, TableKind::Performances) => ENGLISH_PERFORMANCES,
            (Fixture::EnglishSheet, TableKind::Events) => ENGLISH_EVENTS,
            (Fixture::SparseSheet, TableKind::Performances) => SPARSE_PERFORMANCES,
            (Fixture::SparseSheet, TableKind::Events) => SPARSE_EVENTS,
        }
    }

    pub fn table_pair(&self) -> Result<TablePair> {
        Ok(TablePair {
            performances: parse_csv_str(self.csv(TableKind::Performances))
                .with_context(|| format!("parse {self:?} performances"))?,
            events: parse_csv_str(self.csv(TableKind::Events))
                .with_context(|| format!("parse {self:?} events"))?,
        })
    }

    pub fn memory_source(&self) -> Result<MemorySource> {
        Ok(MemorySource::from_pair(self.table_pair()?))
    }

    /// Catalog built with default schema and reconcile settings.
    pub fn catalog(&self) -> Result<Catalog> {
        Ok(Catalog::build(
            self.table_pair()?,
            &SchemaConfig::default(),
            &ReconcileConfig::default(),
        ))
    }

    /// Write both tables as `<dir>/performances.csv` and `<dir>/events.csv`.
    pub fn write_csvs(&self, dir: &Path) -> Result<(PathBuf, PathBuf)> {
        let perf = dir.join("performances.csv");
        let events = dir.join("events.csv");
        std::fs::write(&perf, self.csv(TableKind::Performances))
            .with_context(|| format!("write {}", perf.display()))?;
        std::fs::write(&events, self.csv(TableKind::Events))
            .with_context(|| format!("write {}", events.display()))?;
        Ok((perf, events))
    }
}

/// Song titles of one event's setlist, in order.
pub fn setlist_titles(catalog: &Catalog, event_id: &str) -> Vec<String> {
    catalog
        .setlist(event_id)
        .iter()
        .map(|p| p.record.song_title.clone())
        .collect()
}

/// Playback links of one event's setlist, in order.
pub fn setlist_links(catalog: &Catalog, event_id: &str) -> Vec<String> {
    let links = vsop_link::LinkSynthesizer::default();
    catalog
        .setlist(event_id)
        .iter()
        .map(|p| {
            links
                .build_link(p.effective_video_reference(), &p.record.start_offset)
                .to_string()
        })
        .collect()
}
