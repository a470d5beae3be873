//! Suggestion sources
//!
//! Defines the `SuggestionSource` seam the pipeline fetches through and the
//! `FetchError` taxonomy used to classify failed fetches. Sources receive a
//! `CancellationToken` but are not required to honor it; the pipeline's request
//! arbiter discards superseded results either way.

mod http;

use std::future::Future;

use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::suggest::SuggestionItem;

pub use http::{DEFAULT_ENDPOINT, HttpSource, parse_results};

/// Errors that can occur while fetching suggestions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum FetchError {
    /// Connection or transport failure
    #[error("Network error: {message}")]
    Network { message: String },

    /// The server answered with a non-success status
    #[error("HTTP error ({status}): {message}")]
    Http { status: u16, message: String },

    /// The response body could not be decoded
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// The request exceeded the configured timeout
    #[error("Request timed out after {after_ms}ms")]
    Timeout { after_ms: u64 },

    /// The request was cancelled because a newer one superseded it
    #[error("Request cancelled")]
    Cancelled,
}

impl FetchError {
    /// Cancellation is never user-visible; it is treated like a stale response.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, FetchError::Cancelled)
    }
}

/// Something that can turn a query into suggestions.
pub trait SuggestionSource: Send + Sync + 'static {
    fn search(
        &self,
        query: &str,
        cancel: CancellationToken,
    ) -> impl Future<Output = Result<Vec<SuggestionItem>, FetchError>> + Send;
}
