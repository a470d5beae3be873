//! Debouncer for suggestion requests
//!
//! Delays a callback until input has been quiet for the configured period.
//! Each `schedule` call aborts the previously armed timer before arming a new
//! one, so a debouncer never has more than one live timer.

use std::time::Duration;

use tokio::task::JoinHandle;

/// Which edges of a busy window invoke the callback.
///
/// The default is trailing-only: just the last call in a burst fires, once the
/// burst has gone quiet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceOptions {
    /// Invoke immediately when no timer is live, then stay quiet until the window closes
    pub leading: bool,
    /// Invoke the most recently scheduled callback once the window closes
    pub trailing: bool,
}

impl Default for DebounceOptions {
    fn default() -> Self {
        Self {
            leading: false,
            trailing: true,
        }
    }
}

/// Tokio-backed debouncer holding at most one pending timer.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    options: DebounceOptions,
    timer: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self::with_options(delay, DebounceOptions::default())
    }

    pub fn with_options(delay: Duration, options: DebounceOptions) -> Self {
        Self {
            delay,
            options,
            timer: None,
        }
    }

    /// Schedule `callback`, replacing whatever was pending.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&mut self, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let window_open = self.is_pending();
        self.cancel();

        let trailing = if self.options.leading && !window_open {
            callback();
            None
        } else if self.options.trailing {
            Some(callback)
        } else {
            None
        };

        let delay = self.delay;
        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(callback) = trailing {
                callback();
            }
        }));
    }

    /// Drop the pending callback, if any, without invoking it.
    pub fn cancel(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }

    /// Whether a timer is armed and has not yet elapsed.
    pub fn is_pending(&self) -> bool {
        self.timer.as_ref().is_some_and(|timer| !timer.is_finished())
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
#[path = "debouncer_tests.rs"]
mod debouncer_tests;
