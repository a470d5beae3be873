//! HTTP suggestion source
//!
//! Queries a JSON endpoint with `GET {endpoint}?name={query}` using reqwest and
//! races the request against its cancellation token.

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use super::{FetchError, SuggestionSource};
use crate::error::TypeaheadError;
use crate::suggest::SuggestionItem;

/// Character search endpoint used when none is configured
pub const DEFAULT_ENDPOINT: &str = "https://rickandmortyapi.com/api/character";

/// Async HTTP source
///
/// Cloning is cheap; the underlying reqwest client shares its connection pool.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    endpoint: Url,
}

impl HttpSource {
    pub fn new(endpoint: &str) -> Result<Self, TypeaheadError> {
        let endpoint = Url::parse(endpoint).map_err(|e| TypeaheadError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(TypeaheadError::InvalidEndpoint {
                endpoint: endpoint.to_string(),
                message: "scheme must be http or https".to_string(),
            });
        }

        let client = Client::builder()
            .build()
            .map_err(|e| TypeaheadError::HttpClient(e.to_string()))?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn fetch(&self, query: &str) -> Result<Vec<SuggestionItem>, FetchError> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[("name", query)])
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| FetchError::Network {
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(FetchError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.bytes().await.map_err(|e| FetchError::Network {
            message: e.to_string(),
        })?;
        parse_results(&body)
    }
}

impl SuggestionSource for HttpSource {
    async fn search(
        &self,
        query: &str,
        cancel: CancellationToken,
    ) -> Result<Vec<SuggestionItem>, FetchError> {
        if cancel.is_cancelled() {
            return Err(FetchError::Cancelled);
        }

        tokio::select! {
            biased;

            _ = cancel.cancelled() => {
                log::debug!("Request for {:?} cancelled in flight", query);
                Err(FetchError::Cancelled)
            }

            result = self.fetch(query) => result,
        }
    }
}

/// Decode a response body: either `{"results": [...]}` or a bare array.
pub fn parse_results(body: &[u8]) -> Result<Vec<SuggestionItem>, FetchError> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Payload {
        Wrapped { results: Vec<SuggestionItem> },
        Bare(Vec<SuggestionItem>),
    }

    match serde_json::from_slice::<Payload>(body) {
        Ok(Payload::Wrapped { results }) => Ok(results),
        Ok(Payload::Bare(items)) => Ok(items),
        Err(e) => Err(FetchError::Parse {
            message: e.to_string(),
        }),
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod http_tests;
