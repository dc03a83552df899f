//! Shelf tools: toggle, add, remove, status and list.
//!
//! All of them work on the one shelf store the server holds behind a std
//! mutex. Store calls run on the blocking pool since every mutation writes
//! the blob before the tool returns.

use std::sync::{Arc, Mutex};

use browsy_core::{BlobStore, Clock, Error, LocalShelfStore, Shelf, ShelfMembership};
use chrono::{DateTime, SecondsFormat};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::json_result;

/// A book and a shelf.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ShelfParams {
    /// Book id as returned by search_books or lookup_isbn.
    pub book_id: String,
    /// "TBR", "RECOMMEND" or "READ".
    pub shelf: Shelf,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ShelfStatusParams {
    pub book_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ShelfListParams {
    pub shelf: Shelf,
}

/// Result of a mutation on one (book, shelf) pair.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ShelfChangeOutput {
    pub book_id: String,
    pub shelf: Shelf,
    /// Membership after the call.
    pub on_shelf: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ShelfStatusOutput {
    pub book_id: String,
    pub shelves: Vec<Shelf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ShelfListOutput {
    pub shelf: Shelf,
    pub count: usize,
    /// Most recently saved first.
    pub books: Vec<ShelfEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ShelfEntry {
    pub book_id: String,
    /// Milliseconds since the Unix epoch.
    pub saved_at: i64,
    /// `saved_at` as RFC 3339.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_at_rfc3339: Option<String>,
}

impl From<ShelfMembership> for ShelfEntry {
    fn from(m: ShelfMembership) -> Self {
        let saved_at_rfc3339 =
            DateTime::from_timestamp_millis(m.saved_at).map(|t| t.to_rfc3339_opts(SecondsFormat::Millis, true));
        Self { book_id: m.book_id, saved_at: m.saved_at, saved_at_rfc3339 }
    }
}

fn book_id(raw: &str) -> Result<&str, Error> {
    let id = raw.trim();
    if id.is_empty() {
        return Err(Error::InvalidInput("book_id cannot be empty".into()));
    }
    Ok(id)
}

/// Shelf store shared by every tool call.
pub type SharedShelves<B, C> = Arc<Mutex<LocalShelfStore<B, C>>>;

/// Run `f` against the store on the blocking pool. Mutations write the blob
/// synchronously, so the lock is never held on a runtime worker.
async fn with_store<B, C, T, F>(shelves: &SharedShelves<B, C>, f: F) -> Result<T, Error>
where
    B: BlobStore + 'static,
    C: Clock + 'static,
    T: Send + 'static,
    F: FnOnce(&mut LocalShelfStore<B, C>) -> T + Send + 'static,
{
    let shelves = Arc::clone(shelves);
    tokio::task::spawn_blocking(move || {
        let mut store = shelves.lock().map_err(|_| Error::Storage("shelf store lock poisoned".into()))?;
        Ok(f(&mut store))
    })
    .await
    .map_err(|e| Error::Storage(format!("shelf task failed: {e}")))?
}

/// Implementation of the shelf_toggle tool.
pub async fn toggle_impl<B: BlobStore + 'static, C: Clock + 'static>(
    shelves: &SharedShelves<B, C>, params: ShelfParams,
) -> Result<CallToolResult, McpError> {
    let id = book_id(&params.book_id)?.to_string();
    let shelf = params.shelf;
    let key = id.clone();
    let on_shelf = with_store(shelves, move |store| store.toggle_shelf(&key, shelf)).await?;
    tracing::debug!(book_id = %id, %shelf, on_shelf, "toggled shelf");

    json_result(&ShelfChangeOutput { book_id: id, shelf, on_shelf })
}

/// Implementation of the shelf_add tool.
pub async fn add_impl<B: BlobStore + 'static, C: Clock + 'static>(
    shelves: &SharedShelves<B, C>, params: ShelfParams,
) -> Result<CallToolResult, McpError> {
    let id = book_id(&params.book_id)?.to_string();
    let shelf = params.shelf;
    let key = id.clone();
    with_store(shelves, move |store| store.add_to_shelf(&key, shelf)).await?;

    json_result(&ShelfChangeOutput { book_id: id, shelf, on_shelf: true })
}

/// Implementation of the shelf_remove tool.
pub async fn remove_impl<B: BlobStore + 'static, C: Clock + 'static>(
    shelves: &SharedShelves<B, C>, params: ShelfParams,
) -> Result<CallToolResult, McpError> {
    let id = book_id(&params.book_id)?.to_string();
    let shelf = params.shelf;
    let key = id.clone();
    with_store(shelves, move |store| store.remove_from_shelf(&key, shelf)).await?;

    json_result(&ShelfChangeOutput { book_id: id, shelf, on_shelf: false })
}

/// Implementation of the shelf_status tool.
pub async fn status_impl<B: BlobStore + 'static, C: Clock + 'static>(
    shelves: &SharedShelves<B, C>, params: ShelfStatusParams,
) -> Result<CallToolResult, McpError> {
    let id = book_id(&params.book_id)?.to_string();
    let key = id.clone();
    let on = with_store(shelves, move |store| store.shelves_for(&key)).await?;

    json_result(&ShelfStatusOutput { book_id: id, shelves: on.into_iter().collect() })
}

/// Implementation of the shelf_list tool.
pub async fn list_impl<B: BlobStore + 'static, C: Clock + 'static>(
    shelves: &SharedShelves<B, C>, params: ShelfListParams,
) -> Result<CallToolResult, McpError> {
    let shelf = params.shelf;
    let memberships = with_store(shelves, move |store| store.shelf(shelf)).await?;
    let books: Vec<ShelfEntry> = memberships.into_iter().map(ShelfEntry::from).collect();

    json_result(&ShelfListOutput { shelf, count: books.len(), books })
}
