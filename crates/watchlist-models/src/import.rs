use serde::{Deserialize, Serialize};

/// One candidate returned by the title-suggestion lookup.
///
/// Ephemeral: produced by the search call and consumed immediately by the
/// add-to-list call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchMatch {
    /// IMDB title const, e.g. "tt0111161".
    pub id: String,
    pub title: String,
    pub year: Option<u32>,
    /// Media kind label as reported by the endpoint ("feature", "TV series", ...).
    pub kind: Option<String>,
}

/// Aggregate outcome of one import run.
///
/// Built incrementally while importing and returned once; there is no
/// partial commit or rollback, so items already added stay added even when
/// a later title fails.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ImportReport {
    /// Number of titles in the input list.
    pub total: usize,
    /// Titles that yielded at least one search match.
    pub processed: usize,
    /// Individual successful add-to-list submissions (a title with two
    /// matches that both succeed contributes 2).
    pub added: usize,
    /// Titles with zero matches or a failed search.
    pub failed: usize,
    pub errors: Vec<String>,
}

impl ImportReport {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }
}
