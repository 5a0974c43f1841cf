//! Match rules: the tiers a field walks through, first hit wins.
//!
//! Matching is Unicode-lowercase. Within a tier, aliases are tried in their
//! declared order, and for one alias, columns in table order. Empty column
//! names and empty aliases never match (the empty string is a substring of
//! everything).

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchRule {
    /// Case-insensitive equality between an alias and a column name.
    Exact,
    /// Alias within column or column within alias, skipping marked columns.
    MarkerExcludingSubstring,
    /// Same containment test with markers ignored.
    Substring,
    /// Invent a constant column. Always terminates a chain.
    Synthesize,
}

/// Exact, marker-excluding substring, substring, synthesize.
pub const DEFAULT_CHAIN: [MatchRule; 4] = [
    MatchRule::Exact,
    MatchRule::MarkerExcludingSubstring,
    MatchRule::Substring,
    MatchRule::Synthesize,
];

impl MatchRule {
    pub fn key(&self) -> &'static str {
        match self {
            MatchRule::Exact => "exact",
            MatchRule::MarkerExcludingSubstring => "marker_excluding_substring",
            MatchRule::Substring => "substring",
            MatchRule::Synthesize => "synthesize",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exact" => Some(MatchRule::Exact),
            "marker_excluding_substring" => Some(MatchRule::MarkerExcludingSubstring),
            "substring" => Some(MatchRule::Substring),
            "synthesize" => Some(MatchRule::Synthesize),
            _ => None,
        }
    }

    /// Pick a column for this tier. `Synthesize` never picks an existing column.
    pub(crate) fn find<'a>(
        &self,
        columns: &[&'a str],
        aliases: &[String],
        markers: &[String],
    ) -> Option<&'a str> {
        let aliases_lc: Vec<String> = aliases
            .iter()
            .map(|a| a.trim().to_lowercase())
            .filter(|a| !a.is_empty())
            .collect();

        match self {
            MatchRule::Exact => aliases_lc.iter().find_map(|alias| {
                columns
                    .iter()
                    .copied()
                    .find(|col| !col.is_empty() && col.to_lowercase() == *alias)
            }),
            MatchRule::MarkerExcludingSubstring => {
                let markers_lc: Vec<String> = markers
                    .iter()
                    .map(|m| m.trim().to_lowercase())
                    .filter(|m| !m.is_empty())
                    .collect();
                substring_match(columns, &aliases_lc, |col_lc| {
                    !is_marked(col_lc, &aliases_lc, &markers_lc)
                })
            }
            MatchRule::Substring => substring_match(columns, &aliases_lc, |_| true),
            MatchRule::Synthesize => None,
        }
    }
}

impl fmt::Display for MatchRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

fn substring_match<'a>(
    columns: &[&'a str],
    aliases_lc: &[String],
    accept: impl Fn(&str) -> bool,
) -> Option<&'a str> {
    aliases_lc.iter().find_map(|alias| {
        columns.iter().copied().find(|col| {
            if col.is_empty() {
                return false;
            }
            let col_lc = col.to_lowercase();
            let contains = col_lc.contains(alias.as_str()) || alias.contains(col_lc.as_str());
            contains && accept(&col_lc)
        })
    })
}

/// A column is marked when it contains a marker that no alias names outright.
fn is_marked(col_lc: &str, aliases_lc: &[String], markers_lc: &[String]) -> bool {
    markers_lc
        .iter()
        .any(|m| col_lc.contains(m.as_str()) && !aliases_lc.iter().any(|a| a == m))
}
