//! lookup_isbn tool implementation.
//!
//! Normalizes the ISBN, then asks the repository: cache, Google Books,
//! then Open Library.

use browsy_client::normalize_isbn;
use browsy_core::{BookRecord, BookRepository, Clock, PrimarySource, SecondarySource};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::json_result;

/// Input parameters for lookup_isbn tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LookupIsbnParams {
    /// ISBN-10 or ISBN-13. Hyphens and spaces are ignored.
    pub isbn: String,
}

/// Output structure for lookup_isbn tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LookupIsbnOutput {
    /// The normalized ISBN that was looked up.
    pub isbn: String,
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub book: Option<BookRecord>,
}

/// Implementation of the lookup_isbn tool.
///
/// Not finding the book is a successful result with `found: false`.
pub async fn lookup_impl<P, S, C>(
    books: &BookRepository<P, S, C>, params: LookupIsbnParams,
) -> Result<CallToolResult, McpError>
where
    P: PrimarySource,
    S: SecondarySource,
    C: Clock,
{
    let isbn = normalize_isbn(&params.isbn).map_err(|e| e.into_core("lookup_isbn"))?;
    let book = books.lookup_by_isbn(&isbn).await?;

    json_result(&LookupIsbnOutput { isbn, found: book.is_some(), book })
}
