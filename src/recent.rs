//! Recent searches
//!
//! Bounded most-recently-used list of submitted or selected queries, persisted
//! through a [`RecentStore`].

mod recent_state;
pub mod storage;

pub use recent_state::{DEFAULT_MAX_RECENT, RecentSearches};
pub use storage::{FileStore, MemoryStore, RecentStore};
