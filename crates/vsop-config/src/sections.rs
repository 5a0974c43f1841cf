//! Typed sections of the merged configuration document.
//!
//! Every field is optional: an absent key means "use the built-in default of
//! the crate that consumes it". This crate does not know those defaults; it
//! only carries what the operator wrote.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ENV_SHEET_BASE_URL;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub source: SourceSection,
    pub schema: SchemaSection,
    pub events: EventsSection,
    pub link: LinkSection,
}

/// Where the two raw tables come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Two local CSV files.
    #[default]
    Csv,
    /// A published spreadsheet, fetched through its CSV export endpoint.
    Sheet,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSection {
    pub kind: SourceKind,
    /// CSV path (`csv`) or worksheet name (`sheet`) of the performances table.
    pub performances: Option<String>,
    /// CSV path (`csv`) or worksheet name (`sheet`) of the events table.
    pub events: Option<String>,
    /// Spreadsheet document URL, e.g. `https://docs.google.com/spreadsheets/d/<id>`.
    pub sheet_base_url: Option<String>,
}

impl SourceSection {
    /// `sheet_base_url`, with `VSOP_SHEET_BASE_URL` taking precedence when set.
    pub fn effective_sheet_base_url(&self) -> Option<String> {
        std::env::var(ENV_SHEET_BASE_URL)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .or_else(|| self.sheet_base_url.clone())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaSection {
    pub virtual_suffix: Option<String>,
    pub do_not_match_markers: Option<Vec<String>>,
    /// Per logical field overrides, keyed by the field's stable key (e.g. `song_title`).
    pub fields: BTreeMap<String, FieldOverride>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldOverride {
    /// Replaces the built-in alias list (order matters).
    pub aliases: Option<Vec<String>>,
    /// Value written into a synthesized column.
    pub fallback: Option<String>,
    /// Ordered rule names: `exact`, `marker_excluding_substring`, `substring`, `synthesize`.
    pub rules: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventsSection {
    /// Status cell values that mark an event as not yet performed.
    pub scheduled_status: Option<Vec<String>>,
    /// Expose events sorted by date instead of source order.
    pub sort_by_date: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkSection {
    /// Canonical watch URL without query, e.g. `https://www.youtube.com/watch`.
    pub watch_url: Option<String>,
    /// Substrings that identify a reference as a hosted-video URL.
    pub host_markers: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_sections_take_defaults() {
        let cfg: AppConfig = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(cfg, AppConfig::default());
        assert_eq!(cfg.source.kind, SourceKind::Csv);
        assert!(!cfg.events.sort_by_date);
    }

    #[test]
    fn source_kind_is_snake_case() {
        let cfg: AppConfig =
            serde_json::from_value(serde_json::json!({"source": {"kind": "sheet"}})).unwrap();
        assert_eq!(cfg.source.kind, SourceKind::Sheet);
    }

    #[test]
    fn field_overrides_keep_rule_order() {
        let cfg: AppConfig = serde_json::from_value(serde_json::json!({
            "schema": {"fields": {"song_title": {"rules": ["substring", "exact"]}}}
        }))
        .unwrap();
        let rules = cfg.schema.fields["song_title"].rules.clone().unwrap();
        assert_eq!(rules, vec!["substring".to_string(), "exact".to_string()]);
    }
}
