//! Google Books API client.
//!
//! The primary book source: free-text search plus ISBN lookup, normalized
//! into [`BookRecord`]s.
//!
//! ### Upstream API
//!
//! - **Endpoint**: `https://www.googleapis.com/books/v1/volumes`
//! - **Authentication**: optional `key` query parameter. Anonymous requests
//!   work but share a much smaller quota.
//! - **Normalization**: largest cover upgraded to full size over https,
//!   first author, ISBN-13 preferred over ISBN-10.

pub mod request;
pub mod response;

pub use request::{MAX_RESULTS_LIMIT, VolumesRequest};
pub use response::{ImageLinks, IndustryIdentifier, VolumeInfo, VolumeItem, VolumesResponse};

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use browsy_core::{AppConfig, BookRecord, Error, PrimarySource, SearchQuery};
use reqwest::header;
use url::Url;

use crate::error::{ApiError, check_status};

/// Name reported in logs and upstream errors.
pub const SOURCE_NAME: &str = "google_books";

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/books/v1";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_USER_AGENT: &str = concat!("browsy/", env!("CARGO_PKG_VERSION"));

/// Google Books client configuration.
#[derive(Debug, Clone)]
pub struct GoogleBooksConfig {
    /// API key; sent as `key` when present.
    pub api_key: Option<String>,
    /// Base URL (default: https://www.googleapis.com/books/v1).
    pub base_url: String,
    /// Request timeout (default: 30s).
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for GoogleBooksConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl From<&AppConfig> for GoogleBooksConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            api_key: config.google_books_key().map(str::to_string),
            base_url: config.google_books_base_url.clone(),
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
        }
    }
}

/// Google Books API client.
#[derive(Debug, Clone)]
pub struct GoogleBooksClient {
    http: reqwest::Client,
    config: GoogleBooksConfig,
    volumes_url: Url,
}

impl GoogleBooksClient {
    /// Create a new client with the given configuration.
    pub fn new(config: GoogleBooksConfig) -> Result<Self, ApiError> {
        let volumes_url = Url::parse(&format!("{}/volumes", config.base_url.trim_end_matches('/')))
            .map_err(|e| ApiError::InvalidBaseUrl(format!("{}: {e}", config.base_url)))?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| ApiError::Network(Arc::new(e)))?;

        Ok(Self { http, config, volumes_url })
    }

    /// Whether requests carry an API key.
    pub fn has_api_key(&self) -> bool {
        self.config.api_key.is_some()
    }

    /// Run a volumes request and normalize every item.
    pub async fn volumes(&self, req: &VolumesRequest) -> Result<Vec<BookRecord>, ApiError> {
        req.validate()?;

        let start = Instant::now();
        tracing::debug!(query = %req.q, start_index = ?req.start_index, "searching Google Books");

        let mut builder = self
            .http
            .get(self.volumes_url.clone())
            .header(header::ACCEPT, "application/json")
            .query(req);
        if let Some(key) = &self.config.api_key {
            builder = builder.query(&[("key", key)]);
        }

        let http_response = builder.send().await?;

        let status = http_response.status();
        tracing::debug!(%status, "Google Books response status");
        check_status(status)?;

        let bytes = http_response.bytes().await?;
        let api_response: VolumesResponse =
            serde_json::from_slice(&bytes).map_err(|e| ApiError::Parse(e.to_string()))?;

        let books = api_response.into_books();
        tracing::debug!(elapsed = ?start.elapsed(), results = books.len(), "Google Books search completed");
        Ok(books)
    }
}

#[async_trait]
impl PrimarySource for GoogleBooksClient {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<BookRecord>, Error> {
        self.volumes(&VolumesRequest::from(query)).await.map_err(|e| e.into_core(SOURCE_NAME))
    }

    async fn lookup_by_isbn(&self, isbn: &str) -> Result<Vec<BookRecord>, Error> {
        self.volumes(&VolumesRequest::isbn(isbn)).await.map_err(|e| e.into_core(SOURCE_NAME))
    }
}
