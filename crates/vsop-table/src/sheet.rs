//! Published-spreadsheet source (CSV export endpoint).
//!
//! Fetches each worksheet through the document's `gviz/tq?tqx=out:csv`
//! export and hands the body to the CSV parser. Both tables are fetched once
//! per load cycle into a [`MemorySource`]; everything after the fetch is
//! synchronous.

use tracing::{debug, info};

use crate::ingest_csv::parse_csv_str;
use crate::source::{MemorySource, SourceError};
use crate::{RawTable, TableKind};

#[derive(Debug, Clone)]
pub struct SheetExportClient {
    http: reqwest::Client,
    base_url: String,
    performances_sheet: String,
    events_sheet: String,
}

impl SheetExportClient {
    /// `base_url` is the document URL, e.g. `https://docs.google.com/spreadsheets/d/<id>`.
    pub fn new(
        base_url: impl Into<String>,
        performances_sheet: impl Into<String>,
        events_sheet: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            performances_sheet: performances_sheet.into(),
            events_sheet: events_sheet.into(),
        }
    }

    fn export_url(&self) -> String {
        format!("{}/gviz/tq", self.base_url.trim_end_matches('/'))
    }

    pub fn sheet_name(&self, kind: TableKind) -> &str {
        match kind {
            TableKind::Performances => &self.performances_sheet,
            TableKind::Events => &self.events_sheet,
        }
    }

    /// Fetch and parse one worksheet.
    pub async fn fetch_table(&self, kind: TableKind) -> Result<RawTable, SourceError> {
        let sheet = self.sheet_name(kind);
        if sheet.trim().is_empty() {
            return Err(SourceError::Config(format!("no worksheet name for '{kind}'")));
        }

        debug!(table = %kind, sheet, "fetching worksheet export");
        let resp = self
            .http
            .get(self.export_url())
            .query(&[("tqx", "out:csv"), ("sheet", sheet)])
            .send()
            .await
            .map_err(|e| SourceError::Transport(e.to_string()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| SourceError::Transport(format!("read body: {e}")))?;

        if !status.is_success() {
            return Err(SourceError::Http {
                status: status.as_u16(),
                message: first_line(&body),
            });
        }

        let table = parse_csv_str(&body)?;
        info!(table = %kind, sheet, rows = table.len(), "worksheet loaded");
        Ok(table)
    }

    /// Fetch both worksheets for one load cycle.
    pub async fn fetch(&self) -> Result<MemorySource, SourceError> {
        let performances = self.fetch_table(TableKind::Performances).await?;
        let events = self.fetch_table(TableKind::Events).await?;
        Ok(MemorySource::new()
            .with(TableKind::Performances, performances)
            .with(TableKind::Events, events))
    }
}

fn first_line(body: &str) -> String {
    let line = body.lines().next().unwrap_or("").trim();
    if line.is_empty() {
        "empty response body".to_string()
    } else {
        line.chars().take(200).collect()
    }
}
