use thiserror::Error;

#[derive(Debug, Error)]
pub enum TypeaheadError {
    #[error("Invalid endpoint {endpoint:?}: {message}")]
    InvalidEndpoint { endpoint: String, message: String },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}
