//! Upstream source contracts.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::Error;
use crate::model::BookRecord;

/// Default page size for free-text searches.
pub const DEFAULT_MAX_RESULTS: u32 = 20;

/// Sort hint forwarded to the primary source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum OrderBy {
    Newest,
    Relevance,
}

impl OrderBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderBy::Newest => "newest",
            OrderBy::Relevance => "relevance",
        }
    }
}

/// A free-text search against the primary source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub text: String,
    pub max_results: u32,
    pub offset: u32,
    pub order_by: Option<OrderBy>,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), max_results: DEFAULT_MAX_RESULTS, offset: 0, order_by: None }
    }

    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_order_by(mut self, order_by: Option<OrderBy>) -> Self {
        self.order_by = order_by;
        self
    }
}

/// Rich-metadata source tried first. Supports free-text search.
///
/// Implementations return records already normalized into [`BookRecord`].
#[async_trait]
pub trait PrimarySource: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    async fn search(&self, query: &SearchQuery) -> Result<Vec<BookRecord>, Error>;

    /// Zero or one records.
    async fn lookup_by_isbn(&self, isbn: &str) -> Result<Vec<BookRecord>, Error>;
}

/// ISBN-only fallback source.
#[async_trait]
pub trait SecondarySource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn lookup_by_isbn(&self, isbn: &str) -> Result<Option<BookRecord>, Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_query_defaults() {
        let q = SearchQuery::new("fantasy");
        assert_eq!(q.max_results, 20);
        assert_eq!(q.offset, 0);
        assert_eq!(q.order_by, None);

        let q = q.with_offset(40).with_order_by(Some(OrderBy::Newest));
        assert_eq!(q.offset, 40);
        assert_eq!(q.order_by.map(|o| o.as_str()), Some("newest"));
    }
}
