//! Suggestion pipeline orchestrator
//!
//! `Suggester` owns the cache, debouncer, arbiter and recent searches and is the
//! only thing that mutates them. Debounce timers and fetches run as spawned tokio
//! tasks that report back over an mpsc channel; the owner applies those events
//! through [`Suggester::pump`], [`Suggester::poll_events`] or [`Suggester::settle`].

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::arbiter::{RequestArbiter, RequestToken, Resolution};
use super::cache::{CacheStatus, TtlLruCache};
use super::debouncer::Debouncer;
use super::types::{Phase, SearchView, SuggestionItem, normalize_query};
use crate::config::Config;
use crate::recent::RecentSearches;
use crate::source::{FetchError, SuggestionSource};

/// Runtime knobs for the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSettings {
    /// Quiet period before a query is looked up
    pub debounce: Duration,
    pub cache_capacity: usize,
    /// `None` disables expiry
    pub cache_ttl: Option<Duration>,
    /// `None` lets requests run until the source answers
    pub request_timeout: Option<Duration>,
    /// Requests slower than this are logged as warnings
    pub slow_request: Duration,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl PipelineSettings {
    /// A value of 0 for the TTL or the request timeout disables it.
    pub fn from_config(config: &Config) -> Self {
        Self {
            debounce: Duration::from_millis(config.search.debounce_ms),
            cache_capacity: config.cache.capacity,
            cache_ttl: non_zero_millis(config.cache.ttl_ms),
            request_timeout: non_zero_millis(config.search.request_timeout_ms),
            slow_request: Duration::from_millis(config.search.slow_request_ms),
        }
    }
}

fn non_zero_millis(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}

/// Completions reported by spawned timer and fetch tasks.
#[derive(Debug)]
enum PipelineEvent {
    /// The debounce timer armed for input number `seq` elapsed
    DebounceElapsed { seq: u64 },
    FetchFinished {
        token: RequestToken,
        key: String,
        outcome: Result<Vec<SuggestionItem>, FetchError>,
        elapsed: Duration,
    },
}

/// Debounced, cached, race-safe suggestion state for one search box.
///
/// Must be driven from within a tokio runtime: typing arms timers and cache
/// misses spawn fetches.
pub struct Suggester<S: SuggestionSource> {
    source: Arc<S>,
    settings: PipelineSettings,
    cache: TtlLruCache<String, Vec<SuggestionItem>>,
    debouncer: Debouncer,
    arbiter: RequestArbiter,
    recent: RecentSearches,

    query: String,
    suggestions: Vec<SuggestionItem>,
    is_open: bool,
    is_loading: bool,
    error: Option<String>,
    selected_index: Option<usize>,
    phase: Phase,

    // Bumped on every input change so superseded debounce ticks are ignored
    input_seq: u64,
    // Input number most recently served from cache or sent to the source
    looked_up_seq: u64,
    events_tx: mpsc::UnboundedSender<PipelineEvent>,
    events_rx: mpsc::UnboundedReceiver<PipelineEvent>,
}

impl<S: SuggestionSource> Suggester<S> {
    pub fn new(source: S, settings: PipelineSettings, recent: RecentSearches) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            source: Arc::new(source),
            cache: TtlLruCache::new(settings.cache_capacity, settings.cache_ttl),
            debouncer: Debouncer::new(settings.debounce),
            arbiter: RequestArbiter::new(),
            settings,
            recent,
            query: String::new(),
            suggestions: Vec::new(),
            is_open: false,
            is_loading: false,
            error: None,
            selected_index: None,
            phase: Phase::Idle,
            input_seq: 0,
            looked_up_seq: 0,
            events_tx,
            events_rx,
        }
    }

    /// Handle a new value of the input box.
    ///
    /// Blank input resets the pipeline immediately. Anything else (re)arms the
    /// debounce timer; the lookup happens once the input has been quiet for the
    /// debounce period.
    pub fn input_changed(&mut self, text: &str) {
        self.query = text.to_string();
        self.selected_index = None;
        self.input_seq += 1;

        if text.trim().is_empty() {
            self.reset_pipeline();
            return;
        }

        self.phase = Phase::Debouncing;
        let seq = self.input_seq;
        let tx = self.events_tx.clone();
        self.debouncer.schedule(move || {
            let _ = tx.send(PipelineEvent::DebounceElapsed { seq });
        });
    }

    /// Commit `item`: its name becomes the query and is recorded as a recent search.
    pub fn select_suggestion(&mut self, item: &SuggestionItem) {
        log::debug!("Selected suggestion {} ({})", item.name, item.id);
        self.input_seq += 1;
        self.debouncer.cancel();
        self.arbiter.invalidate();
        self.is_loading = false;
        self.phase = Phase::Idle;

        self.query = item.name.clone();
        self.recent.commit(&item.name);
        self.is_open = false;
        self.selected_index = None;
    }

    /// Record the current query as a recent search. Blank queries are ignored.
    pub fn submit(&mut self) -> bool {
        self.recent.commit(&self.query)
    }

    /// Enter: select the highlighted suggestion, or submit when nothing is highlighted.
    pub fn confirm(&mut self) {
        let highlighted = self
            .selected_index
            .filter(|_| self.is_open)
            .and_then(|index| self.suggestions.get(index))
            .cloned();

        match highlighted {
            Some(item) => self.select_suggestion(&item),
            None => {
                self.submit();
            }
        }
    }

    /// Arrow down. Stops at the last suggestion.
    pub fn select_next(&mut self) -> bool {
        if !self.is_open || self.suggestions.is_empty() {
            return false;
        }
        let last = self.suggestions.len() - 1;
        self.selected_index = Some(match self.selected_index {
            None => 0,
            Some(index) => (index + 1).min(last),
        });
        true
    }

    /// Arrow up. Moving up from the first suggestion clears the highlight.
    pub fn select_previous(&mut self) -> bool {
        if !self.is_open || self.suggestions.is_empty() {
            return false;
        }
        self.selected_index = match self.selected_index {
            None | Some(0) => None,
            Some(index) => Some(index - 1),
        };
        true
    }

    /// Escape: close the dropdown without touching the query.
    pub fn dismiss(&mut self) {
        self.is_open = false;
        self.selected_index = None;
    }

    /// Reopen the dropdown if there is something to show.
    pub fn focus(&mut self) {
        if !self.query.trim().is_empty() && !self.suggestions.is_empty() {
            self.is_open = true;
        }
    }

    /// Empty the query and drop any pending debounce or fetch.
    pub fn clear(&mut self) {
        self.query.clear();
        self.selected_index = None;
        self.input_seq += 1;
        self.reset_pipeline();
    }

    pub fn clear_recent(&mut self) {
        self.recent.clear();
    }

    /// Wait for the next internal event and apply it.
    ///
    /// Returns whether the visible state changed.
    pub async fn pump(&mut self) -> bool {
        match self.events_rx.recv().await {
            Some(event) => self.handle_event(event),
            None => false,
        }
    }

    /// Apply every event that is already queued, without waiting.
    pub fn poll_events(&mut self) -> bool {
        let mut changed = false;
        while let Ok(event) = self.events_rx.try_recv() {
            changed |= self.handle_event(event);
        }
        changed
    }

    /// Pump until the latest input has been resolved, failed or reset.
    ///
    /// Does not return while a fetch is outstanding, so a source that never
    /// answers needs a request timeout.
    pub async fn settle(&mut self) {
        while self.phase.is_busy() {
            self.pump().await;
        }
    }

    pub fn view(&self) -> SearchView {
        SearchView {
            query: self.query.clone(),
            suggestions: self.suggestions.clone(),
            is_open: self.is_open,
            is_loading: self.is_loading,
            error: self.error.clone(),
            selected_index: self.selected_index,
            recent_searches: self.recent.entries().to_vec(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn suggestions(&self) -> &[SuggestionItem] {
        &self.suggestions
    }

    pub fn recent(&self) -> &RecentSearches {
        &self.recent
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    pub fn cache_status(&self) -> CacheStatus<String> {
        self.cache.status()
    }

    fn handle_event(&mut self, event: PipelineEvent) -> bool {
        match event {
            PipelineEvent::DebounceElapsed { seq } => {
                if seq != self.input_seq {
                    log::debug!("Ignoring superseded debounce tick {}", seq);
                    return false;
                }
                self.lookup();
                true
            }
            PipelineEvent::FetchFinished {
                token,
                key,
                outcome,
                elapsed,
            } => self.finish_fetch(token, key, outcome, elapsed),
        }
    }

    /// Serve the current query from cache, or start a fetch for it.
    fn lookup(&mut self) {
        self.looked_up_seq = self.input_seq;
        let key = normalize_query(&self.query);

        if let Some(items) = self.cache.get(&key) {
            log::debug!("Cache hit for {:?} ({} suggestions)", key, items.len());
            self.arbiter.invalidate();
            self.apply_results(items);
            return;
        }

        let ticket = self.arbiter.issue();
        log::debug!("Cache miss for {:?}, issuing request {}", key, ticket.token);
        self.is_loading = true;
        self.error = None;
        self.phase = Phase::Fetching;

        let source = Arc::clone(&self.source);
        let tx = self.events_tx.clone();
        let query = self.query.trim().to_string();
        let timeout = self.settings.request_timeout;

        tokio::spawn(async move {
            let started = Instant::now();
            let outcome = fetch_with_timeout(source.as_ref(), &query, ticket.cancel, timeout).await;
            let _ = tx.send(PipelineEvent::FetchFinished {
                token: ticket.token,
                key,
                outcome,
                elapsed: started.elapsed(),
            });
        });
    }

    fn finish_fetch(
        &mut self,
        token: RequestToken,
        key: String,
        outcome: Result<Vec<SuggestionItem>, FetchError>,
        elapsed: Duration,
    ) -> bool {
        match self.arbiter.resolve(token, outcome) {
            Resolution::Accepted(items) => {
                if elapsed > self.settings.slow_request {
                    log::warn!(
                        "Slow suggestion request {} for {:?}: {}ms",
                        token,
                        key,
                        elapsed.as_millis()
                    );
                } else {
                    log::debug!("Request {} for {:?} took {}ms", token, key, elapsed.as_millis());
                }
                self.cache.set(key, items.clone());
                self.apply_results(items);
                true
            }
            Resolution::Failed(e) => {
                log::error!("Suggestion request {} for {:?} failed: {}", token, key, e);
                self.error = Some(format!("Failed to fetch suggestions: {}", e));
                self.is_loading = false;
                self.phase = Phase::Errored;
                self.keep_debouncing_if_input_moved();
                true
            }
            Resolution::Stale => false,
        }
    }

    fn apply_results(&mut self, items: Vec<SuggestionItem>) {
        self.suggestions = items;
        self.is_open = true;
        self.is_loading = false;
        self.error = None;
        self.selected_index = None;
        self.phase = Phase::Resolved;
        self.keep_debouncing_if_input_moved();
    }

    /// A fetch can finish after newer input has armed the debouncer. Its outcome
    /// is still shown, but the pipeline stays busy until that input is looked up.
    fn keep_debouncing_if_input_moved(&mut self) {
        if self.looked_up_seq != self.input_seq {
            self.phase = Phase::Debouncing;
        }
    }

    fn reset_pipeline(&mut self) {
        self.debouncer.cancel();
        self.arbiter.invalidate();
        self.suggestions.clear();
        self.is_open = false;
        self.is_loading = false;
        self.error = None;
        self.phase = Phase::Idle;
    }
}

async fn fetch_with_timeout<S: SuggestionSource>(
    source: &S,
    query: &str,
    cancel: CancellationToken,
    timeout: Option<Duration>,
) -> Result<Vec<SuggestionItem>, FetchError> {
    let Some(limit) = timeout else {
        return source.search(query, cancel).await;
    };

    tokio::time::timeout(limit, source.search(query, cancel))
        .await
        .unwrap_or_else(|_| Err(timeout_error(limit)))
}

fn timeout_error(limit: Duration) -> FetchError {
    FetchError::Timeout {
        after_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
    }
}

#[cfg(test)]
#[path = "suggester_tests.rs"]
mod suggester_tests;
