//! vsop-link
//!
//! Playback deep-links into recorded video.
//!
//! A performance's video reference arrives in whatever form the sheet author
//! typed: a bare video id, a short link, a full watch URL, some other URL on
//! the video host, or nothing. [`LinkSynthesizer::build_link`] turns that plus
//! a start offset into one canonical time-offset URL, or
//! [`PlaybackLink::None`]. Total: every input yields a result.

use std::fmt;

use serde::Serialize;
use tracing::debug;
use vsop_config::LinkSection;
use vsop_table::present;

pub const DEFAULT_WATCH_URL: &str = "https://www.youtube.com/watch";
pub const DEFAULT_HOST_MARKERS: &[&str] = &["youtube.com", "youtu.be"];

/// Path prefix of the short-link form; the id is the next path segment.
const SHORT_LINK_PREFIX: &str = "youtu.be/";

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackLink {
    Url(String),
    /// No video reference; rendered as `none`.
    None,
}

impl PlaybackLink {
    pub fn url(&self) -> Option<&str> {
        match self {
            PlaybackLink::Url(u) => Some(u.as_str()),
            PlaybackLink::None => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, PlaybackLink::None)
    }
}

impl fmt::Display for PlaybackLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaybackLink::Url(u) => f.write_str(u),
            PlaybackLink::None => f.write_str("none"),
        }
    }
}

/// What a video-reference cell turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoRef<'a> {
    Missing,
    /// A video id, bare or extracted from a recognized URL.
    Id(&'a str),
    /// A URL on the video host without an extractable id.
    OpaqueUrl(&'a str),
}

// ---------------------------------------------------------------------------
// Synthesizer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSynthesizer {
    watch_url: String,
    host_markers: Vec<String>,
}

impl Default for LinkSynthesizer {
    fn default() -> Self {
        Self {
            watch_url: DEFAULT_WATCH_URL.to_string(),
            host_markers: DEFAULT_HOST_MARKERS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl LinkSynthesizer {
    pub fn new(watch_url: impl Into<String>, host_markers: Vec<String>) -> Self {
        Self {
            watch_url: watch_url.into(),
            host_markers,
        }
    }

    pub fn from_section(section: &LinkSection) -> Self {
        let mut out = Self::default();
        if let Some(w) = section.watch_url.as_deref().map(str::trim) {
            if !w.is_empty() {
                out.watch_url = w.trim_end_matches(['?', '&']).to_string();
            }
        }
        if let Some(markers) = &section.host_markers {
            out.host_markers = markers.clone();
        }
        out
    }

    pub fn watch_url(&self) -> &str {
        &self.watch_url
    }

    pub fn classify<'a>(&self, reference: &'a str) -> VideoRef<'a> {
        let Some(r) = present(reference) else {
            return VideoRef::Missing;
        };

        let lower = r.to_lowercase();
        let on_host = self
            .host_markers
            .iter()
            .map(|m| m.trim().to_lowercase())
            .any(|m| !m.is_empty() && lower.contains(&m));
        if !on_host {
            return VideoRef::Id(r);
        }

        match query_video_id(r).or_else(|| short_link_id(r)) {
            Some(id) => VideoRef::Id(id),
            None => VideoRef::OpaqueUrl(r),
        }
    }

    pub fn build_link(&self, reference: &str, start_offset: &str) -> PlaybackLink {
        let secs = parse_offset_secs(start_offset);
        match self.classify(reference) {
            VideoRef::Missing => PlaybackLink::None,
            VideoRef::Id(id) => {
                PlaybackLink::Url(format!("{}?v={id}&t={secs}s", self.watch_url))
            }
            VideoRef::OpaqueUrl(url) => {
                debug!(url, "video host url without id; appending offset");
                let sep = if url.contains('?') { '&' } else { '?' };
                PlaybackLink::Url(format!("{url}{sep}t={secs}s"))
            }
        }
    }
}

/// [`LinkSynthesizer::build_link`] with the default host and watch URL.
pub fn build_link(reference: &str, start_offset: &str) -> PlaybackLink {
    LinkSynthesizer::default().build_link(reference, start_offset)
}

/// Whole seconds from an offset cell.
///
/// Missing and unparseable values are 0, fractions truncate, negatives clamp to 0.
pub fn parse_offset_secs(cell: &str) -> u64 {
    let Some(t) = present(cell) else {
        return 0;
    };
    if let Ok(n) = t.parse::<i64>() {
        return n.max(0) as u64;
    }
    match t.parse::<f64>() {
        Ok(f) if f.is_finite() && f > 0.0 => f.trunc() as u64,
        _ => 0,
    }
}

fn query_video_id(url: &str) -> Option<&str> {
    let (_, query) = url.split_once('?')?;
    let query = query.split('#').next().unwrap_or(query);
    query
        .split('&')
        .find_map(|pair| pair.strip_prefix("v="))
        .filter(|id| !id.is_empty())
}

fn short_link_id(url: &str) -> Option<&str> {
    let at = url.to_ascii_lowercase().find(SHORT_LINK_PREFIX)? + SHORT_LINK_PREFIX.len();
    let rest = &url[at..];
    let end = rest.find(['?', '&', '#', '/']).unwrap_or(rest.len());
    Some(&rest[..end]).filter(|id| !id.is_empty())
}
