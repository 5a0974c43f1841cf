//! Command handler modules for the `vsop` binary.
//!
//! Shared loading (config, source selection, catalog) lives here.
//! Output formatting lives in the submodules.

pub mod browse;

use anyhow::{bail, Context, Result};
use tracing::warn;
use vsop_config::{
    report_unused_keys, AppConfig, LoadedConfig, SourceKind, SourceSection, UnusedKeyPolicy,
};
use vsop_link::LinkSynthesizer;
use vsop_reconcile::{Catalog, ReconcileConfig};
use vsop_schema::SchemaConfig;
use vsop_table::{CsvFileSource, SheetExportClient, TableSource};

/// Worksheet names used when `source.kind: sheet` names none.
pub const DEFAULT_PERFORMANCES_SHEET: &str = "演奏曲目";
pub const DEFAULT_EVENTS_SHEET: &str = "ライブ一覧";

/// `--performances` / `--events` from the command line.
#[derive(Debug, Clone, Default)]
pub struct SourceOverrides {
    pub performances: Option<String>,
    pub events: Option<String>,
}

impl SourceOverrides {
    fn is_set(&self) -> bool {
        self.performances.is_some() || self.events.is_some()
    }
}

pub struct Settings {
    pub loaded: LoadedConfig,
    pub app: AppConfig,
}

impl Settings {
    pub fn link_synthesizer(&self) -> LinkSynthesizer {
        LinkSynthesizer::from_section(&self.app.link)
    }
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Merge the `--config` layers (none = built-in defaults) and type-check them.
pub fn load_settings(config_paths: &[String], strict: bool) -> Result<Settings> {
    let loaded = if config_paths.is_empty() {
        LoadedConfig::empty()?
    } else {
        let path_refs: Vec<&str> = config_paths.iter().map(|s| s.as_str()).collect();
        vsop_config::load_layered_yaml(&path_refs)?
    };

    let policy = if strict {
        UnusedKeyPolicy::Fail
    } else {
        UnusedKeyPolicy::Warn
    };
    let unused = report_unused_keys(&loaded.config_json, policy)?;
    for key in &unused.unused_leaf_pointers {
        warn!(key = %key, "config key is not read by anything");
    }

    let app = loaded.app_config()?;
    Ok(Settings { loaded, app })
}

/// Read both tables and build the catalog for this invocation.
pub async fn load_catalog(settings: &Settings, overrides: &SourceOverrides) -> Result<Catalog> {
    let schema = SchemaConfig::from_section(&settings.app.schema)?;
    let reconcile = ReconcileConfig::from_section(&settings.app.events);

    let source = open_source(&settings.app.source, overrides).await?;
    tracing::debug!(config_hash = %settings.loaded.config_hash, source = source.name(), "source ready");

    let catalog = Catalog::load(source.as_ref(), &schema, &reconcile)
        .with_context(|| format!("load tables from '{}' source", source.name()))?;
    Ok(catalog)
}

async fn open_source(
    section: &SourceSection,
    overrides: &SourceOverrides,
) -> Result<Box<dyn TableSource>> {
    let csv_section = section.kind == SourceKind::Csv;
    if overrides.is_set() || csv_section {
        // Configured names are worksheet names, not paths, for a sheet source.
        let perf = overrides
            .performances
            .clone()
            .or_else(|| section.performances.clone().filter(|_| csv_section))
            .context("no performances CSV: pass --performances or set source.performances")?;
        let events = overrides
            .events
            .clone()
            .or_else(|| section.events.clone().filter(|_| csv_section))
            .context("no events CSV: pass --events or set source.events")?;
        return Ok(Box::new(CsvFileSource::new(perf, events)));
    }

    let Some(base_url) = section.effective_sheet_base_url() else {
        bail!(
            "source.kind=sheet needs source.sheet_base_url or {}",
            vsop_config::ENV_SHEET_BASE_URL
        );
    };
    let client = SheetExportClient::new(
        base_url,
        section
            .performances
            .clone()
            .unwrap_or_else(|| DEFAULT_PERFORMANCES_SHEET.to_string()),
        section
            .events
            .clone()
            .unwrap_or_else(|| DEFAULT_EVENTS_SHEET.to_string()),
    );
    let fetched = client.fetch().await.context("fetch spreadsheet export")?;
    Ok(Box::new(fetched))
}
