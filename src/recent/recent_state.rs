use std::collections::HashSet;

use super::storage::{MemoryStore, RecentStore};

/// Default number of recent searches kept.
pub const DEFAULT_MAX_RECENT: usize = 10;

/// Most-recently-used list of committed queries.
///
/// Entries are unique and ordered most recent first. Every change is written
/// through to the store immediately; store failures are logged and otherwise
/// ignored so the list keeps working for the current session.
pub struct RecentSearches {
    entries: Vec<String>,
    max_entries: usize,
    store: Box<dyn RecentStore>,
}

impl RecentSearches {
    /// Loads the persisted list. A failed or corrupt load starts empty.
    pub fn load(store: Box<dyn RecentStore>, max_entries: usize) -> Self {
        let entries = match store.load() {
            Ok(entries) => tidy(entries, max_entries),
            Err(e) => {
                log::warn!("Failed to load recent searches: {}", e);
                Vec::new()
            }
        };

        Self {
            entries,
            max_entries,
            store,
        }
    }

    /// Empty list backed by a private in-memory store.
    pub fn in_memory(max_entries: usize) -> Self {
        Self::load(Box::new(MemoryStore::new()), max_entries)
    }

    /// Moves `query` (trimmed) to the front, dropping the oldest entry past the limit.
    ///
    /// Returns false for blank input or when `query` is already the most recent entry.
    pub fn commit(&mut self, query: &str) -> bool {
        let query = query.trim();
        if query.is_empty() {
            return false;
        }
        if self.entries.first().is_some_and(|first| first == query) {
            return false;
        }

        self.entries.retain(|e| e != query);
        self.entries.insert(0, query.to_string());
        self.entries.truncate(self.max_entries);
        self.persist();
        true
    }

    /// Forget all recent searches.
    pub fn clear(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        self.entries.clear();
        self.persist();
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    fn persist(&self) {
        if let Err(e) = self.store.save(&self.entries) {
            log::warn!("Failed to save recent searches: {}", e);
        }
    }
}

/// Drops blanks and duplicates (keeping the first occurrence) and applies the limit.
fn tidy(entries: Vec<String>, max_entries: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty() && seen.insert(e.clone()))
        .take(max_entries)
        .collect()
}

#[cfg(test)]
#[path = "recent_state_tests.rs"]
mod recent_state_tests;
