use vsop_config::{load_layered_yaml_from_strings, report_unused_keys, UnusedKeyPolicy};

/// Validates:
/// 1) Unused keys are detected in WARN mode but do not error.
/// 2) Unused keys cause failure in FAIL mode.
/// 3) Keys under consumed prefixes are not flagged.

#[test]
fn warn_mode_reports_unused_keys_without_error() {
    let yaml = r##"
source:
  kind: csv
  performances: p.csv
theme:
  accent: "#ff4b4b"
  card_radius: 15
"##;

    let loaded = load_layered_yaml_from_strings(&[yaml]).expect("config load must succeed");
    let report = report_unused_keys(&loaded.config_json, UnusedKeyPolicy::Warn)
        .expect("warn mode must not error");

    assert!(!report.is_clean());
    assert_eq!(
        report.unused_leaf_pointers,
        vec!["/theme/accent".to_string(), "/theme/card_radius".to_string()]
    );
}

#[test]
fn fail_mode_errors_on_unused_keys() {
    let yaml = r#"
link:
  watch_url: "https://www.youtube.com/watch"
  embed: true
"#;

    let loaded = load_layered_yaml_from_strings(&[yaml]).unwrap();
    let result = report_unused_keys(&loaded.config_json, UnusedKeyPolicy::Fail);

    let msg = format!("{:?}", result.expect_err("fail policy must error"));
    assert!(msg.contains("CONFIG_UNUSED_KEYS"));
    assert!(msg.contains("/link/embed"));
}

#[test]
fn consumed_prefix_covers_nested_field_overrides() {
    let yaml = r#"
schema:
  fields:
    song_title:
      aliases: ["楽曲名", "Song"]
      rules: ["exact", "substring"]
    start_offset:
      fallback: "0"
events:
  scheduled_status: ["未"]
  sort_by_date: true
"#;

    let loaded = load_layered_yaml_from_strings(&[yaml]).unwrap();
    let report = report_unused_keys(&loaded.config_json, UnusedKeyPolicy::Fail)
        .expect("fully consumed config must pass FAIL policy");
    assert!(report.is_clean());
}
