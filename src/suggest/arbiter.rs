//! Request arbiter
//!
//! Tags every fetch with a monotonically increasing token and accepts an outcome
//! only when its token is still the current one. Superseded requests are
//! cancelled through their `CancellationToken`, but that is advisory: the token
//! comparison is what keeps a slow, stale response from landing after a newer one.

use std::fmt;

use tokio_util::sync::CancellationToken;

use crate::source::FetchError;

/// Identifier of one fetch attempt. Never reused or decremented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handed to the code performing a fetch.
#[derive(Debug, Clone)]
pub struct Ticket {
    pub token: RequestToken,
    /// Cancelled when this request is superseded or invalidated
    pub cancel: CancellationToken,
}

/// What to do with a completed fetch.
#[derive(Debug, PartialEq)]
pub enum Resolution<T> {
    /// Current request succeeded
    Accepted(T),
    /// Current request failed for a real reason and should be surfaced
    Failed(FetchError),
    /// Superseded or cancelled; drop silently
    Stale,
}

/// Arbitrates between overlapping fetches so at most one outcome is accepted
/// per issued token, regardless of completion order.
#[derive(Debug, Default)]
pub struct RequestArbiter {
    counter: u64,
    current: Option<RequestToken>,
    in_flight: Option<CancellationToken>,
}

impl RequestArbiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, cancelling the one in flight (if any).
    pub fn issue(&mut self) -> Ticket {
        self.cancel_in_flight();

        self.counter += 1;
        let token = RequestToken(self.counter);
        let cancel = CancellationToken::new();
        self.current = Some(token);
        self.in_flight = Some(cancel.clone());

        Ticket { token, cancel }
    }

    /// Cancel the in-flight request and make any pending completion stale.
    pub fn invalidate(&mut self) {
        self.cancel_in_flight();
        self.current = None;
    }

    /// Classify a completed fetch.
    ///
    /// The current token settles at most once; later completions carrying the
    /// same token are stale.
    pub fn resolve<T>(
        &mut self,
        token: RequestToken,
        outcome: Result<T, FetchError>,
    ) -> Resolution<T> {
        if self.current != Some(token) {
            log::debug!("Discarding stale response for request {}", token);
            return Resolution::Stale;
        }
        self.current = None;
        self.in_flight = None;

        match outcome {
            Ok(value) => Resolution::Accepted(value),
            Err(error) if error.is_cancellation() => {
                log::debug!("Request {} reported cancellation", token);
                Resolution::Stale
            }
            Err(error) => Resolution::Failed(error),
        }
    }

    /// Token of the request whose outcome would currently be accepted.
    pub fn current(&self) -> Option<RequestToken> {
        self.current
    }

    /// Most recently issued token, settled or not.
    pub fn last_issued(&self) -> Option<RequestToken> {
        (self.counter > 0).then_some(RequestToken(self.counter))
    }

    pub fn has_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    fn cancel_in_flight(&mut self) -> bool {
        if let Some(cancel) = self.in_flight.take() {
            log::debug!("Cancelling in-flight request {:?}", self.current);
            cancel.cancel();
            return true;
        }
        false
    }
}

impl Drop for RequestArbiter {
    fn drop(&mut self) {
        self.cancel_in_flight();
    }
}

#[cfg(test)]
#[path = "arbiter_tests.rs"]
mod arbiter_tests;
