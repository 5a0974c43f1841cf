use vsop_config::{FieldOverride, SchemaSection};
use vsop_schema::{
    resolve_table, LogicalField, MatchRule, ResolvedColumn, Resolver, SchemaConfig,
};
use vsop_table::{RawTable, TableKind};

fn s(v: &[&str]) -> Vec<String> {
    v.iter().map(|x| x.to_string()).collect()
}

#[test]
fn marker_column_is_skipped_while_an_unmarked_one_exists() {
    let mut t = RawTable::from_rows(
        &["Song Name (translated)", "Song Name"],
        &[&["Kimi no Uta", "君の歌"]],
    );
    let mut r = Resolver::new(s(&["translated"]), "_virtual");
    let hit = r.resolve(&mut t, "song_title", &s(&["Song"]), "-");
    assert_eq!(hit.name(), "Song Name");
}

#[test]
fn marker_column_is_used_when_it_is_the_only_match() {
    let mut t = RawTable::from_rows(&["Song Name (translated)"], &[&["Kimi no Uta"]]);
    let mut r = Resolver::new(s(&["translated"]), "_virtual");
    let hit = r.resolve(&mut t, "song_title", &s(&["Song"]), "-");
    assert_eq!(
        hit,
        ResolvedColumn::Actual {
            name: "Song Name (translated)".to_string(),
            rule: MatchRule::Substring,
        }
    );
}

#[test]
fn missing_field_gets_one_deterministic_zero_column() {
    let mut t = RawTable::from_rows(&["楽曲名", "演奏順"], &[&["A", "1"], &["B", "2"], &["C", "3"]]);
    let cfg = SchemaConfig::default();

    let first = resolve_table(&cfg, TableKind::Performances, &mut t);
    let width_after_first = t.columns().len();
    let second = resolve_table(&cfg, TableKind::Performances, &mut t);

    assert_eq!(first, second);
    assert_eq!(t.columns().len(), width_after_first);
    assert_eq!(
        first.get(LogicalField::StartOffset),
        Some(&ResolvedColumn::Virtual {
            name: "STARTTIME_virtual".to_string(),
            fallback: "0".to_string(),
        })
    );
    assert!(t.rows().all(|row| row.get("STARTTIME_virtual") == "0"));
}

#[test]
fn english_headers_resolve_through_default_aliases() {
    let mut t = RawTable::from_rows(
        &["Song Title", "Vocalist", "Order", "Event", "YouTube", "Start (sec)"],
        &[&["A", "Aki", "1", "Live 1", "abc123", "75"]],
    );
    let map = resolve_table(&SchemaConfig::default(), TableKind::Performances, &mut t);

    assert_eq!(map.column_name(LogicalField::SongTitle), Some("Song Title"));
    assert_eq!(map.column_name(LogicalField::Vocalist), Some("Vocalist"));
    assert_eq!(map.column_name(LogicalField::Order), Some("Order"));
    assert_eq!(map.column_name(LogicalField::ParentEvent), Some("Event"));
    assert_eq!(map.column_name(LogicalField::VideoReference), Some("YouTube"));
    assert_eq!(map.column_name(LogicalField::StartOffset), Some("Start (sec)"));
    assert!(map.get(LogicalField::RepeatKey).unwrap().is_virtual());
}

#[test]
fn configured_override_changes_resolution() {
    let mut section = SchemaSection::default();
    section.fields.insert(
        "vocalist".to_string(),
        FieldOverride {
            aliases: Some(s(&["歌"])),
            ..FieldOverride::default()
        },
    );
    let cfg = SchemaConfig::from_section(&section).unwrap();

    let mut t = RawTable::from_rows(&["楽曲名", "歌", "ボーカル"], &[&["A", "Aki", "Mina"]]);
    let map = resolve_table(&cfg, TableKind::Performances, &mut t);
    assert_eq!(map.column_name(LogicalField::Vocalist), Some("歌"));
}

#[test]
fn diagnostics_serialize_to_json() {
    let mut t = RawTable::from_rows(&["日付"], &[]);
    let map = resolve_table(&SchemaConfig::default(), TableKind::Events, &mut t);
    let v = serde_json::to_value(&map).unwrap();

    assert_eq!(v["table"], "events");
    assert_eq!(v["columns"]["date"]["kind"], "actual");
    assert_eq!(v["columns"]["date"]["rule"], "exact");
    assert_eq!(v["columns"]["venue"]["kind"], "virtual");
    assert_eq!(v["columns"]["venue"]["name"], "会場名_virtual");
}

#[test]
fn source_column_named_like_a_virtual_one_keeps_its_data() {
    let mut t = RawTable::from_rows(&["楽曲名", "STARTTIME_virtual"], &[&["A", "99"]]);
    let map = resolve_table(&SchemaConfig::default(), TableKind::Performances, &mut t);

    let col = map.get(LogicalField::StartOffset).unwrap();
    assert!(!col.is_virtual());
    assert_eq!(col.name(), "STARTTIME_virtual");
    assert_eq!(map.cell(&t.row(0).unwrap(), LogicalField::StartOffset), "99");
}

#[test]
fn overrides_sharing_a_first_alias_keep_their_own_fallbacks() {
    let mut section = SchemaSection::default();
    for (key, fallback) in [("vocalist", "unknown"), ("duration", "0:00")] {
        section.fields.insert(
            key.to_string(),
            FieldOverride {
                aliases: Some(s(&["Extra"])),
                fallback: Some(fallback.to_string()),
                ..FieldOverride::default()
            },
        );
    }
    let cfg = SchemaConfig::from_section(&section).unwrap();

    let mut t = RawTable::from_rows(&["楽曲名"], &[&["A"], &["B"]]);
    let map = resolve_table(&cfg, TableKind::Performances, &mut t);

    let vocalist = map.get(LogicalField::Vocalist).unwrap();
    let duration = map.get(LogicalField::Duration).unwrap();
    assert_ne!(vocalist.name(), duration.name());
    for row in t.rows() {
        assert_eq!(map.cell(&row, LogicalField::Vocalist), "unknown");
        assert_eq!(map.cell(&row, LogicalField::Duration), "0:00");
    }

    // A second pass over the same table reuses both columns.
    let width = t.columns().len();
    let again = resolve_table(&cfg, TableKind::Performances, &mut t);
    assert_eq!(again, map);
    assert_eq!(t.columns().len(), width);
}
