//! feed_query tool implementation.
//!
//! One page of the discovery feed: picks the rotating genre query for the
//! caller's load count, searches it, and drops books the caller already
//! shows.

use std::collections::HashSet;

use browsy_core::{
    BookRecord, BookRepository, Clock, FeedStrategy, OrderBy, PrimarySource, SecondarySource, merge_page,
};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::json_result;

/// Input parameters for feed_query tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FeedQueryParams {
    /// How many feed loads the caller has done so far; selects the query.
    #[serde(default)]
    pub load_count: u32,

    /// Zero-based index of the first result (default: 0).
    #[serde(default)]
    pub offset: Option<u32>,

    /// Ids already on screen; these are left out of the page.
    #[serde(default)]
    pub seen_ids: Vec<String>,
}

/// Output structure for feed_query tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FeedQueryOutput {
    pub query: String,
    pub order_by: Option<OrderBy>,
    pub offset: u32,
    /// New books, in upstream order.
    pub books: Vec<BookRecord>,
    /// Upstream records dropped as duplicates.
    pub skipped: usize,
}

/// Implementation of the feed_query tool.
pub async fn feed_impl<P, S, C>(
    books: &BookRepository<P, S, C>, params: FeedQueryParams,
) -> Result<CallToolResult, McpError>
where
    P: PrimarySource,
    S: SecondarySource,
    C: Clock,
{
    let feed = FeedStrategy::smart_query(params.load_count);
    let offset = params.offset.unwrap_or(0);
    let page = books.search_by_query(&feed.to_search(offset)).await?;
    let fetched = page.len();

    let seen: HashSet<String> = params.seen_ids.into_iter().collect();
    let mut fresh = Vec::new();
    merge_page(&mut fresh, page.into_iter().filter(|b| !seen.contains(&b.id)).collect());
    tracing::debug!(query = feed.text, offset, fetched, fresh = fresh.len(), "feed page");

    json_result(&FeedQueryOutput {
        query: feed.text.to_string(),
        order_by: feed.order_by,
        offset,
        skipped: fetched - fresh.len(),
        books: fresh,
    })
}
