//! Open Library Books API client.
//!
//! The secondary book source, used for ISBN lookups Google Books could not
//! answer. No API key.
//!
//! ### Upstream API
//!
//! - **Endpoint**: `https://openlibrary.org/api/books?bibkeys=ISBN:<isbn>&format=json&jscmd=data`
//! - **Not found**: the response is an empty object rather than a 404.

pub mod response;

pub use response::{BookData, BooksResponse, Cover, Identifiers, Named};

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use browsy_core::{AppConfig, BookRecord, Error, SecondarySource};
use reqwest::header;
use url::Url;

use crate::error::{ApiError, check_status};

/// Name reported in logs and upstream errors.
pub const SOURCE_NAME: &str = "open_library";

const DEFAULT_BASE_URL: &str = "https://openlibrary.org";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_USER_AGENT: &str = concat!("browsy/", env!("CARGO_PKG_VERSION"));

/// Open Library client configuration.
#[derive(Debug, Clone)]
pub struct OpenLibraryConfig {
    /// Base URL (default: https://openlibrary.org).
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for OpenLibraryConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl From<&AppConfig> for OpenLibraryConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            base_url: config.open_library_base_url.clone(),
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
        }
    }
}

/// Open Library Books API client.
#[derive(Debug, Clone)]
pub struct OpenLibraryClient {
    http: reqwest::Client,
    books_url: Url,
}

impl OpenLibraryClient {
    pub fn new(config: OpenLibraryConfig) -> Result<Self, ApiError> {
        let books_url = Url::parse(&format!("{}/api/books", config.base_url.trim_end_matches('/')))
            .map_err(|e| ApiError::InvalidBaseUrl(format!("{}: {e}", config.base_url)))?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| ApiError::Network(Arc::new(e)))?;

        Ok(Self { http, books_url })
    }

    /// Look up one ISBN. `Ok(None)` when Open Library has no record.
    pub async fn book_by_isbn(&self, isbn: &str) -> Result<Option<BookRecord>, ApiError> {
        if isbn.trim().is_empty() {
            return Err(ApiError::InvalidIsbn(isbn.to_string()));
        }

        let start = Instant::now();
        let key = bibkey(isbn);
        tracing::debug!(bibkey = %key, "looking up Open Library");

        let http_response = self
            .http
            .get(self.books_url.clone())
            .header(header::ACCEPT, "application/json")
            .query(&[("bibkeys", key.as_str()), ("format", "json"), ("jscmd", "data")])
            .send()
            .await?;

        let status = http_response.status();
        tracing::debug!(%status, "Open Library response status");
        check_status(status)?;

        let bytes = http_response.bytes().await?;
        let mut api_response: BooksResponse =
            serde_json::from_slice(&bytes).map_err(|e| ApiError::Parse(e.to_string()))?;

        let book = api_response.remove(&key).map(|data| data.into_book(isbn));
        tracing::debug!(elapsed = ?start.elapsed(), found = book.is_some(), "Open Library lookup completed");
        Ok(book)
    }
}

fn bibkey(isbn: &str) -> String {
    format!("ISBN:{isbn}")
}

#[async_trait]
impl SecondarySource for OpenLibraryClient {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    async fn lookup_by_isbn(&self, isbn: &str) -> Result<Option<BookRecord>, Error> {
        self.book_by_isbn(isbn).await.map_err(|e| e.into_core(SOURCE_NAME))
    }
}
