//! Cache-then-primary-then-secondary lookup policy.

use tokio::sync::Mutex;

use super::source::{PrimarySource, SearchQuery, SecondarySource};
use crate::Error;
use crate::cache::{CacheConfig, ExpiringLruCache};
use crate::clock::{Clock, SystemClock};
use crate::model::BookRecord;

/// Book data access with dual-source fallback and in-memory caching.
///
/// Upstream failures never reach the caller: a failing source is logged and
/// treated as having no result. "Not found" is a successful empty result.
///
/// The cache lock is taken only around cache reads and writes, never across
/// an upstream call, so a cancelled request cannot leave a partial write.
pub struct BookRepository<P, S, C = SystemClock> {
    primary: P,
    secondary: S,
    cache: Mutex<ExpiringLruCache<String, BookRecord, C>>,
}

impl<P, S> BookRepository<P, S, SystemClock>
where
    P: PrimarySource,
    S: SecondarySource,
{
    /// # Errors
    ///
    /// Returns `Error::InvalidConfig` if the cache config is invalid.
    pub fn new(primary: P, secondary: S, config: CacheConfig) -> Result<Self, Error> {
        Ok(Self::with_cache(primary, secondary, ExpiringLruCache::new(config)?))
    }
}

impl<P, S, C> BookRepository<P, S, C>
where
    P: PrimarySource,
    S: SecondarySource,
    C: Clock,
{
    pub fn with_cache(primary: P, secondary: S, cache: ExpiringLruCache<String, BookRecord, C>) -> Self {
        Self { primary, secondary, cache: Mutex::new(cache) }
    }

    /// Free-text search against the primary source.
    ///
    /// A cache hit returns only the single record cached for this query.
    /// On a fresh primary result the first record is cached and the full
    /// page returned. The secondary source has no text search and is never
    /// consulted.
    ///
    /// The cache key ignores offset and ordering, so a cached query answers
    /// every page of that query with its one record.
    // TODO: cache whole pages keyed by (text, offset, order). Today a paged
    // feed stalls: every later page of a cached query is its first record.
    pub async fn search_by_query(&self, query: &SearchQuery) -> Result<Vec<BookRecord>, Error> {
        let cache_key = search_key(&query.text);

        if let Some(cached) = self.cache.lock().await.get(&cache_key) {
            tracing::debug!(query = %query.text, "search cache hit");
            return Ok(vec![cached]);
        }

        match self.primary.search(query).await {
            Ok(books) if !books.is_empty() => {
                self.cache.lock().await.put(cache_key, books[0].clone());
                tracing::debug!(
                    source = self.primary.name(),
                    query = %query.text,
                    count = books.len(),
                    "search served from upstream"
                );
                Ok(books)
            }
            Ok(_) => {
                tracing::debug!(source = self.primary.name(), query = %query.text, "search returned no results");
                Ok(Vec::new())
            }
            Err(e) => {
                tracing::warn!(source = self.primary.name(), query = %query.text, error = %e, "search failed");
                Ok(Vec::new())
            }
        }
    }

    /// ISBN lookup: cache, then primary, then secondary.
    ///
    /// Returns `Ok(None)` when neither source has the book; nothing is
    /// cached in that case.
    pub async fn lookup_by_isbn(&self, isbn: &str) -> Result<Option<BookRecord>, Error> {
        let cache_key = isbn_key(isbn);

        if let Some(cached) = self.cache.lock().await.get(&cache_key) {
            tracing::debug!(isbn, "isbn cache hit");
            return Ok(Some(cached));
        }

        match self.primary.lookup_by_isbn(isbn).await {
            Ok(books) => {
                if let Some(book) = books.into_iter().next() {
                    self.cache.lock().await.put(cache_key, book.clone());
                    tracing::debug!(source = self.primary.name(), isbn, "isbn served from primary");
                    return Ok(Some(book));
                }
                tracing::debug!(source = self.primary.name(), isbn, "primary has no match, falling back");
            }
            Err(e) => {
                tracing::warn!(source = self.primary.name(), isbn, error = %e, "primary isbn lookup failed");
            }
        }

        match self.secondary.lookup_by_isbn(isbn).await {
            Ok(Some(book)) => {
                self.cache.lock().await.put(cache_key, book.clone());
                tracing::debug!(source = self.secondary.name(), isbn, "isbn served from secondary");
                return Ok(Some(book));
            }
            Ok(None) => {
                tracing::debug!(source = self.secondary.name(), isbn, "secondary has no match");
            }
            Err(e) => {
                tracing::warn!(source = self.secondary.name(), isbn, error = %e, "secondary isbn lookup failed");
            }
        }

        Ok(None)
    }

    /// Drop every cached record.
    pub async fn clear_cache(&self) {
        self.cache.lock().await.clear();
    }

    /// Number of cached records.
    pub async fn cached_len(&self) -> usize {
        self.cache.lock().await.len()
    }
}

fn search_key(query: &str) -> String {
    format!("search:{query}")
}

fn isbn_key(isbn: &str) -> String {
    format!("isbn:{isbn}")
}
