//! typeahead library - Debounced, cached, race-safe search suggestions
//!
//! This library exposes the suggestion pipeline used by the typeahead CLI.

pub mod command;
pub mod config;
pub mod error;
pub mod recent;
pub mod source;
pub mod suggest;

#[cfg(test)]
pub mod test_utils;
pub mod view;

// Re-export commonly used types for convenience
pub use config::Config;
pub use error::TypeaheadError;
pub use source::{FetchError, HttpSource, SuggestionSource};
pub use suggest::{PipelineSettings, SearchView, Suggester, SuggestionItem};
