//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use std::sync::{Arc, Mutex};

use browsy_client::{GoogleBooksClient, OpenLibraryClient};
use browsy_core::{BookRepository, LocalShelfStore, SqliteBlobStore};
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

use crate::tools::{
    FeedQueryParams, LookupIsbnParams, SearchBooksParams, ShelfListParams, ShelfParams, ShelfStatusParams, add_impl,
    feed_impl, list_impl, lookup_impl, remove_impl, search_impl, status_impl, toggle_impl,
};

/// Book repository over the live upstream APIs.
pub type Books = BookRepository<GoogleBooksClient, OpenLibraryClient>;

/// Shelf store persisted to SQLite.
pub type Shelves = LocalShelfStore<SqliteBlobStore>;

/// The main MCP server handler for browsy.
#[derive(Clone)]
pub struct BrowsyServer {
    books: Arc<Books>,
    shelves: Arc<Mutex<Shelves>>,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl BrowsyServer {
    /// Create a new server handler.
    pub fn new(books: Books, shelves: Shelves) -> Self {
        Self { books: Arc::new(books), shelves: Arc::new(Mutex::new(shelves)), tool_router: Self::tool_router() }
    }

    #[tool(
        description = "Search books by free text (Google Books). Supports intitle:, inauthor:, subject: and newer:YYYY operators. Returns normalized book records."
    )]
    async fn search_books(&self, params: Parameters<SearchBooksParams>) -> Result<CallToolResult, McpError> {
        search_impl(&*self.books, params.0).await
    }

    #[tool(description = "Look up one book by ISBN-10 or ISBN-13. Tries Google Books, then Open Library.")]
    async fn lookup_isbn(&self, params: Parameters<LookupIsbnParams>) -> Result<CallToolResult, McpError> {
        lookup_impl(&*self.books, params.0).await
    }

    #[tool(description = "Discovery feed page. Rotates genre queries by load_count and skips books already seen.")]
    async fn feed_query(&self, params: Parameters<FeedQueryParams>) -> Result<CallToolResult, McpError> {
        feed_impl(&*self.books, params.0).await
    }

    #[tool(description = "Toggle a book on a shelf (TBR, RECOMMEND, READ). Returns whether it is now on the shelf.")]
    async fn shelf_toggle(&self, params: Parameters<ShelfParams>) -> Result<CallToolResult, McpError> {
        toggle_impl(&self.shelves, params.0).await
    }

    #[tool(description = "Put a book on a shelf. Re-adding refreshes its saved time.")]
    async fn shelf_add(&self, params: Parameters<ShelfParams>) -> Result<CallToolResult, McpError> {
        add_impl(&self.shelves, params.0).await
    }

    #[tool(description = "Take a book off a shelf.")]
    async fn shelf_remove(&self, params: Parameters<ShelfParams>) -> Result<CallToolResult, McpError> {
        remove_impl(&self.shelves, params.0).await
    }

    #[tool(description = "List the shelves a book is on.")]
    async fn shelf_status(&self, params: Parameters<ShelfStatusParams>) -> Result<CallToolResult, McpError> {
        status_impl(&self.shelves, params.0).await
    }

    #[tool(description = "List the books on one shelf, most recently saved first.")]
    async fn shelf_list(&self, params: Parameters<ShelfListParams>) -> Result<CallToolResult, McpError> {
        list_impl(&self.shelves, params.0).await
    }
}

impl ServerHandler for BrowsyServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "browsy-mcp".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(
                "Book discovery: search and ISBN lookup with caching, plus TBR/RECOMMEND/READ shelves.".into(),
            ),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
