//! Suggestion pipeline
//!
//! Building blocks (cache, debouncer, request arbiter) and the `Suggester` that
//! wires them to a `SuggestionSource` and the recent-search list.

mod arbiter;
mod cache;
mod debouncer;
mod suggester;
mod types;

pub use arbiter::{RequestArbiter, RequestToken, Resolution, Ticket};
pub use cache::{CacheStatus, TtlLruCache};
pub use debouncer::{DebounceOptions, Debouncer};
pub use suggester::{PipelineSettings, Suggester};
pub use types::{Phase, SearchView, SuggestionItem, normalize_query};
