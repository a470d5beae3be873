// Configuration type definitions

use serde::Deserialize;

use crate::source::DEFAULT_ENDPOINT;

/// Search configuration section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// 0 disables the timeout
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default = "default_slow_request_ms")]
    pub slow_request_ms: u64,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_slow_request_ms() -> u64 {
    100
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            endpoint: default_endpoint(),
            debounce_ms: default_debounce_ms(),
            request_timeout_ms: default_request_timeout_ms(),
            slow_request_ms: default_slow_request_ms(),
        }
    }
}

/// Suggestion cache configuration section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    /// 0 disables expiry
    #[serde(default = "default_ttl_ms")]
    pub ttl_ms: u64,
}

fn default_capacity() -> usize {
    50
}

fn default_ttl_ms() -> u64 {
    5 * 60 * 1000
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            capacity: default_capacity(),
            ttl_ms: default_ttl_ms(),
        }
    }
}

/// Recent searches configuration section
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RecentConfig {
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
    #[serde(default = "default_persist")]
    pub persist: bool,
}

fn default_max_entries() -> usize {
    crate::recent::DEFAULT_MAX_RECENT
}

fn default_persist() -> bool {
    true
}

impl Default for RecentConfig {
    fn default() -> Self {
        RecentConfig {
            max_entries: default_max_entries(),
            persist: default_persist(),
        }
    }
}

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub recent: RecentConfig,
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;
