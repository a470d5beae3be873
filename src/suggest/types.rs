//! Suggestion pipeline types
//!
//! Items returned by a source, the pipeline phase, and the read-only view
//! projection handed to whatever renders the suggestions.

use serde::{Deserialize, Deserializer, Serialize};

/// A single suggestion returned by a source.
///
/// Only `id` and `name` are interpreted by the pipeline. Any other fields the
/// source sends are carried along untouched in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionItem {
    /// Source identifier (numeric ids are converted to strings)
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,
    /// Display name, also the text committed when the suggestion is selected
    pub name: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl SuggestionItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            extra: serde_json::Map::new(),
        }
    }
}

fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Number(number) => number.to_string(),
    })
}

/// Where the pipeline currently is for the latest input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Nothing pending
    #[default]
    Idle,
    /// Waiting for the input to go quiet
    Debouncing,
    /// A request for the latest input is in flight
    Fetching,
    /// Suggestions for the latest input are showing (from cache or network)
    Resolved,
    /// The latest request failed
    Errored,
}

impl Phase {
    /// Whether an event is still expected before the pipeline settles.
    pub fn is_busy(self) -> bool {
        matches!(self, Phase::Debouncing | Phase::Fetching)
    }
}

/// Read-only projection of the search state for the view layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchView {
    pub query: String,
    pub suggestions: Vec<SuggestionItem>,
    pub is_open: bool,
    pub is_loading: bool,
    pub error: Option<String>,
    /// Highlighted suggestion, `None` when nothing is highlighted
    pub selected_index: Option<usize>,
    pub recent_searches: Vec<String>,
}

/// Cache key for a raw query: trimmed and lowercased.
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}
