//! search_books tool implementation.
//!
//! Free-text search against the primary source, through the repository's
//! cache.

use browsy_client::google::MAX_RESULTS_LIMIT;
use browsy_core::{BookRecord, BookRepository, Clock, Error, OrderBy, PrimarySource, SearchQuery, SecondarySource};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::json_result;

/// Input parameters for search_books tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SearchBooksParams {
    /// Search text. Google Books operators such as `intitle:`, `inauthor:`,
    /// `subject:` and `newer:2025` are passed through.
    pub query: String,

    /// Zero-based index of the first result (default: 0).
    #[serde(default)]
    pub offset: Option<u32>,

    /// Page size, 1-40 (default: 20).
    #[serde(default)]
    pub max_results: Option<u32>,

    /// "newest" or "relevance".
    #[serde(default)]
    pub order_by: Option<OrderBy>,
}

/// Output structure for search_books tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SearchBooksOutput {
    pub query: String,
    pub offset: u32,
    pub count: usize,
    pub books: Vec<BookRecord>,
}

impl SearchBooksParams {
    fn to_query(&self) -> Result<SearchQuery, Error> {
        let text = self.query.trim();
        if text.is_empty() {
            return Err(Error::InvalidInput("query cannot be empty".into()));
        }

        let mut query = SearchQuery::new(text)
            .with_offset(self.offset.unwrap_or(0))
            .with_order_by(self.order_by);

        if let Some(max_results) = self.max_results {
            if !(1..=MAX_RESULTS_LIMIT).contains(&max_results) {
                return Err(Error::InvalidInput(format!("max_results must be 1-{MAX_RESULTS_LIMIT}")));
            }
            query = query.with_max_results(max_results);
        }

        Ok(query)
    }
}

/// Implementation of the search_books tool.
///
/// Upstream failures surface as an empty result list, not an error.
pub async fn search_impl<P, S, C>(
    books: &BookRepository<P, S, C>, params: SearchBooksParams,
) -> Result<CallToolResult, McpError>
where
    P: PrimarySource,
    S: SecondarySource,
    C: Clock,
{
    let query = params.to_query()?;
    let results = books.search_by_query(&query).await?;

    json_result(&SearchBooksOutput { query: query.text, offset: query.offset, count: results.len(), books: results })
}
