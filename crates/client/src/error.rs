//! Upstream API client error types.

use std::sync::Arc;

use browsy_core::Error;

/// Errors from the book API clients.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    /// Invalid search query.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Invalid maxResults parameter (must be 1-40).
    #[error("invalid max results: must be 1-40")]
    InvalidMaxResults,

    /// Invalid ISBN.
    #[error("invalid isbn: {0}")]
    InvalidIsbn(String),

    /// Base URL could not be parsed.
    #[error("invalid base url: {0}")]
    InvalidBaseUrl(String),

    /// Authentication failed (invalid API key).
    #[error("authentication failed: invalid API key")]
    AuthError,

    /// Rate limited by the upstream API.
    #[error("rate limited: too many requests")]
    RateLimited,

    /// HTTP error response.
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response parse error.
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { ApiError::Timeout } else { ApiError::Network(Arc::new(err)) }
    }
}

impl ApiError {
    /// Convert into the unified error, tagging it with the source it came from.
    pub fn into_core(self, source_name: &str) -> Error {
        match self {
            ApiError::InvalidQuery(msg) => Error::InvalidInput(msg),
            ApiError::InvalidIsbn(isbn) => Error::InvalidInput(format!("invalid isbn: {isbn}")),
            ApiError::InvalidMaxResults => Error::InvalidInput(ApiError::InvalidMaxResults.to_string()),
            ApiError::InvalidBaseUrl(msg) => Error::InvalidConfig(msg),
            ApiError::AuthError => Error::UpstreamAuth(source_name.to_string()),
            ApiError::RateLimited => Error::UpstreamRateLimited(source_name.to_string()),
            other => Error::upstream(source_name, other.to_string()),
        }
    }
}

/// Map a non-success HTTP status to an error.
pub(crate) fn check_status(status: reqwest::StatusCode) -> Result<(), ApiError> {
    if status == 401 || status == 403 {
        return Err(ApiError::AuthError);
    }

    if status == 429 {
        return Err(ApiError::RateLimited);
    }

    if status.is_client_error() || status.is_server_error() {
        return Err(ApiError::HttpError { status: status.as_u16() });
    }

    Ok(())
}
