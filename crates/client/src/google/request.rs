//! Google Books volumes request types and validation.

use browsy_core::{OrderBy, SearchQuery};
use serde::Serialize;

use crate::ApiError;

/// Largest page Google Books will return.
pub const MAX_RESULTS_LIMIT: u32 = 40;

/// Query parameters for `GET /volumes`.
///
/// Based on the Google Books API v1 reference:
/// https://developers.google.com/books/docs/v1/reference/volumes/list
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct VolumesRequest {
    /// Full-text query; supports `intitle:`, `inauthor:`, `isbn:`, `subject:`.
    pub q: String,

    /// Page size (1-40, default 20).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,

    /// Zero-based index of the first result.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_index: Option<u32>,

    /// `newest` or `relevance`; API default when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_by: Option<OrderBy>,
}

impl VolumesRequest {
    /// The request for an ISBN lookup: `isbn:<isbn>`, one result.
    pub fn isbn(isbn: &str) -> Self {
        Self { q: format!("isbn:{isbn}"), max_results: Some(1), ..Default::default() }
    }

    /// Validate the request parameters.
    ///
    /// Returns an error if any parameters are out of range or malformed.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.q.trim().is_empty() {
            return Err(ApiError::InvalidQuery("query cannot be empty".to_string()));
        }

        if let Some(max_results) = self.max_results
            && !(1..=MAX_RESULTS_LIMIT).contains(&max_results)
        {
            return Err(ApiError::InvalidMaxResults);
        }

        Ok(())
    }
}

impl From<&SearchQuery> for VolumesRequest {
    fn from(query: &SearchQuery) -> Self {
        Self {
            q: query.text.clone(),
            max_results: Some(query.max_results),
            start_index: Some(query.offset),
            order_by: query.order_by,
        }
    }
}
