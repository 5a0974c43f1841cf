//! Resolver configuration: alias sets, fallbacks, rule chains, markers.
//!
//! Built-in defaults describe the sheet layout the tools were written
//! against (Japanese headers) plus English synonyms. Operators override per
//! field from the `schema` config section.

use std::fmt;

use vsop_config::SchemaSection;
use vsop_table::{TableKind, MISSING_CELL};

use crate::field::LogicalField;
use crate::rules::{MatchRule, DEFAULT_CHAIN};

pub const DEFAULT_VIRTUAL_SUFFIX: &str = "_virtual";

/// Columns carrying one of these are auxiliary (machine-translated or generated)
/// and must not shadow the data column they were derived from.
pub const DEFAULT_DO_NOT_MATCH_MARKERS: &[&str] = &["翻訳", "translated", "(auto)"];

/// How one logical field is looked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub field: LogicalField,
    pub aliases: Vec<String>,
    pub fallback: String,
    pub rules: Vec<MatchRule>,
}

impl FieldSpec {
    pub fn new(field: LogicalField, aliases: &[&str], fallback: &str) -> Self {
        Self {
            field,
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
            fallback: fallback.to_string(),
            rules: DEFAULT_CHAIN.to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaConfig {
    pub fields: Vec<FieldSpec>,
    pub do_not_match_markers: Vec<String>,
    pub virtual_suffix: String,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        use LogicalField::*;

        let m = MISSING_CELL;
        let fields = vec![
            FieldSpec::new(SongTitle, &["楽曲名", "曲名", "Song", "Title"], m),
            FieldSpec::new(Vocalist, &["ボーカル", "Vocal", "Vocalist", "Singer"], m),
            FieldSpec::new(Order, &["演奏順", "曲順", "Order", "Position"], m),
            FieldSpec::new(
                ParentEvent,
                &["ライブID", "ライブ名", "LiveID", "Event ID", "Live", "Event"],
                m,
            ),
            FieldSpec::new(VideoReference, &["YOUTUBE_ID", "YouTube", "Video", "動画"], m),
            FieldSpec::new(StartOffset, &["STARTTIME", "開始秒", "Start", "Offset"], "0"),
            FieldSpec::new(RepeatKey, &["ラスト", "Last", "Repeat"], m),
            FieldSpec::new(Duration, &["演奏時間", "Duration", "Length"], m),
            FieldSpec::new(EventId, &["ライブID", "ライブ名", "LiveID", "Event ID", "Live"], m),
            FieldSpec::new(Title, &["ライブ名", "タイトル", "Title", "Event"], m),
            FieldSpec::new(Date, &["日付", "開催日", "Date"], m),
            FieldSpec::new(Venue, &["会場名", "会場", "Venue", "Place"], m),
            FieldSpec::new(Status, &["STATUS", "状態", "ステータス"], m),
            FieldSpec::new(
                VideoBaseLink,
                &["YOUTUBE_URL", "動画URL", "VideoURL", "Archive", "YouTube"],
                m,
            ),
        ];

        Self {
            fields,
            do_not_match_markers: DEFAULT_DO_NOT_MATCH_MARKERS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            virtual_suffix: DEFAULT_VIRTUAL_SUFFIX.to_string(),
        }
    }
}

impl SchemaConfig {
    /// Built-in defaults with the operator's `schema` section applied on top.
    pub fn from_section(section: &SchemaSection) -> Result<Self, SchemaConfigError> {
        let mut cfg = Self::default();

        if let Some(suffix) = &section.virtual_suffix {
            if suffix.trim().is_empty() {
                return Err(SchemaConfigError::EmptyVirtualSuffix);
            }
            cfg.virtual_suffix = suffix.clone();
        }
        if let Some(markers) = &section.do_not_match_markers {
            cfg.do_not_match_markers = markers.clone();
        }

        for (key, ov) in &section.fields {
            let field = LogicalField::parse(key)
                .ok_or_else(|| SchemaConfigError::UnknownField(key.clone()))?;
            let spec = cfg
                .fields
                .iter_mut()
                .find(|s| s.field == field)
                .ok_or_else(|| SchemaConfigError::UnknownField(key.clone()))?;

            if let Some(aliases) = &ov.aliases {
                spec.aliases = aliases.clone();
            }
            if let Some(fallback) = &ov.fallback {
                spec.fallback = fallback.clone();
            }
            if let Some(rules) = &ov.rules {
                spec.rules = rules
                    .iter()
                    .map(|r| {
                        MatchRule::parse(r).ok_or_else(|| SchemaConfigError::UnknownRule {
                            field: key.clone(),
                            rule: r.clone(),
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
            }
        }

        Ok(cfg)
    }

    pub fn spec(&self, field: LogicalField) -> Option<&FieldSpec> {
        self.fields.iter().find(|s| s.field == field)
    }

    /// Specs for one table, in declaration order.
    pub fn specs_for(&self, kind: TableKind) -> impl Iterator<Item = &FieldSpec> + '_ {
        self.fields.iter().filter(move |s| s.field.table() == kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaConfigError {
    UnknownField(String),
    UnknownRule { field: String, rule: String },
    EmptyVirtualSuffix,
}

impl fmt::Display for SchemaConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaConfigError::UnknownField(key) => {
                write!(f, "CONFIG_UNKNOWN_FIELD: '{key}' is not a logical field")
            }
            SchemaConfigError::UnknownRule { field, rule } => write!(
                f,
                "CONFIG_UNKNOWN_RULE: field '{field}' names rule '{rule}' \
                 (expected exact | marker_excluding_substring | substring | synthesize)"
            ),
            SchemaConfigError::EmptyVirtualSuffix => {
                write!(f, "CONFIG_EMPTY_VIRTUAL_SUFFIX: schema.virtual_suffix must not be empty")
            }
        }
    }
}

impl std::error::Error for SchemaConfigError {}
