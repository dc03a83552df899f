//! browsy-mcp server entry point.
//!
//! Boots the MCP server on stdio transport.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use anyhow::Result;
use browsy_client::{GoogleBooksClient, GoogleBooksConfig, OpenLibraryClient, OpenLibraryConfig};
use browsy_core::shelf::SHELF_BLOB_KEY;
use browsy_core::{AppConfig, BookRepository, LocalShelfStore, SqliteBlobStore};
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;

    let google = GoogleBooksClient::new(GoogleBooksConfig::from(&config))?;
    if !google.has_api_key() {
        tracing::warn!("BROWSY_GOOGLE_BOOKS_API_KEY not set, Google Books requests are anonymous");
    }
    let open_library = OpenLibraryClient::new(OpenLibraryConfig::from(&config))?;
    let books = BookRepository::new(google, open_library, config.cache())?;

    let shelves = LocalShelfStore::new(SqliteBlobStore::open(&config.shelf_db_path, SHELF_BLOB_KEY)?);

    tracing::info!(
        shelf_db = %config.shelf_db_path.display(),
        shelved = shelves.len(),
        cache_capacity = config.cache_capacity,
        cache_ttl_secs = config.cache_ttl_secs,
        "Starting browsy-mcp server on stdio transport"
    );

    let handler = handler::BrowsyServer::new(books, shelves);
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}
