//! Shared test utilities for typeahead
//!
//! Scripted and fixed suggestion sources plus helpers for building a
//! `Suggester` that never touches the network or the disk.

#[cfg(test)]
pub mod test_helpers {
    use std::collections::{HashMap, HashSet};
    use std::future::Future;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use tokio::sync::oneshot;
    use tokio_util::sync::CancellationToken;

    use crate::recent::{MemoryStore, RecentSearches};
    use crate::source::{FetchError, SuggestionSource};
    use crate::suggest::{PipelineSettings, Suggester, SuggestionItem};

    type Outcome = Result<Vec<SuggestionItem>, FetchError>;

    /// Items named after `names`, with ids "1", "2", ...
    pub fn items(names: &[&str]) -> Vec<SuggestionItem> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| SuggestionItem::new((i + 1).to_string(), *name))
            .collect()
    }

    /// 300ms debounce, roomy cache, no request timeout
    pub fn test_settings() -> PipelineSettings {
        PipelineSettings {
            debounce: Duration::from_millis(300),
            cache_capacity: 50,
            cache_ttl: Some(Duration::from_secs(300)),
            request_timeout: None,
            slow_request: Duration::from_millis(100),
        }
    }

    /// Suggester with in-memory recent searches
    pub fn test_suggester<S: SuggestionSource>(source: S) -> Suggester<S> {
        test_suggester_with(source, test_settings())
    }

    pub fn test_suggester_with<S: SuggestionSource>(
        source: S,
        settings: PipelineSettings,
    ) -> Suggester<S> {
        let recent = RecentSearches::load(Box::new(MemoryStore::new()), 10);
        Suggester::new(source, settings, recent)
    }

    #[derive(Default)]
    struct Script {
        pending: HashMap<String, oneshot::Sender<Outcome>>,
        cancels: HashMap<String, CancellationToken>,
        calls: Vec<String>,
    }

    /// Source whose responses are released by the test, in any order.
    ///
    /// Ignores cancellation on purpose so stale completions still arrive.
    #[derive(Clone, Default)]
    pub struct ScriptedSource {
        script: Arc<Mutex<Script>>,
    }

    impl ScriptedSource {
        pub fn new() -> Self {
            Self::default()
        }

        /// Sleep in 1ms steps until a request for `query` is outstanding.
        ///
        /// Sleeping rather than yielding lets a paused clock advance, so this can
        /// run alongside a `settle()` that is waiting on a debounce timer.
        pub async fn wait_for(&self, query: &str) {
            for _ in 0..10_000 {
                if self.script.lock().unwrap().pending.contains_key(query) {
                    return;
                }
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
            panic!("no request for {:?} was made", query);
        }

        /// Complete the outstanding request for `query`.
        pub fn respond(&self, query: &str, outcome: Outcome) {
            let sender = self
                .script
                .lock()
                .unwrap()
                .pending
                .remove(query)
                .unwrap_or_else(|| panic!("no pending request for {:?}", query));
            let _ = sender.send(outcome);
        }

        pub fn was_cancelled(&self, query: &str) -> bool {
            self.script
                .lock()
                .unwrap()
                .cancels
                .get(query)
                .is_some_and(|cancel| cancel.is_cancelled())
        }

        pub fn calls(&self) -> Vec<String> {
            self.script.lock().unwrap().calls.clone()
        }
    }

    impl SuggestionSource for ScriptedSource {
        fn search(
            &self,
            query: &str,
            cancel: CancellationToken,
        ) -> impl Future<Output = Outcome> + Send {
            let (tx, rx) = oneshot::channel();
            {
                let mut script = self.script.lock().unwrap();
                script.calls.push(query.to_string());
                script.pending.insert(query.to_string(), tx);
                script.cancels.insert(query.to_string(), cancel);
            }
            async move { rx.await.unwrap_or(Err(FetchError::Cancelled)) }
        }
    }

    /// Source that answers immediately from a fixed table.
    ///
    /// Unknown queries return no suggestions; queries marked failing return a
    /// network error.
    #[derive(Clone, Default)]
    pub struct FixedSource {
        results: HashMap<String, Vec<SuggestionItem>>,
        failing: HashSet<String>,
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl FixedSource {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with(mut self, query: &str, names: &[&str]) -> Self {
            self.results.insert(query.to_string(), items(names));
            self
        }

        pub fn failing(mut self, query: &str) -> Self {
            self.failing.insert(query.to_string());
            self
        }

        /// Handle for inspecting calls after the source has been moved.
        pub fn call_log(&self) -> Arc<Mutex<Vec<String>>> {
            Arc::clone(&self.calls)
        }
    }

    impl SuggestionSource for FixedSource {
        fn search(
            &self,
            query: &str,
            _cancel: CancellationToken,
        ) -> impl Future<Output = Outcome> + Send {
            self.calls.lock().unwrap().push(query.to_string());
            let outcome = if self.failing.contains(query) {
                Err(FetchError::Network {
                    message: "connection refused".to_string(),
                })
            } else {
                Ok(self.results.get(query).cloned().unwrap_or_default())
            };
            std::future::ready(outcome)
        }
    }
}
