//! MCP tool implementations.
//!
//! This module contains all tools exposed by the browsy server. Each tool
//! takes the shared state it needs by reference so it can be exercised
//! without a transport.

pub mod feed;
pub mod isbn;
pub mod search;
pub mod shelf;

pub use feed::{FeedQueryParams, feed_impl};
pub use isbn::{LookupIsbnParams, lookup_impl};
pub use search::{SearchBooksParams, search_impl};
pub use shelf::{
    ShelfListParams, ShelfParams, ShelfStatusParams, add_impl, list_impl, remove_impl, status_impl, toggle_impl,
};

use browsy_core::Error;
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use serde::Serialize;

/// Render a tool output as pretty JSON text content.
pub(crate) fn json_result<T: Serialize>(output: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(output).map_err(Error::from)?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}
