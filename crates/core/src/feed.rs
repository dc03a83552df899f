//! Discovery feed helpers.
//!
//! Query rotation for the home feed, and page merging for infinite scroll.
//! The upstream search may return overlapping pages, so merged pages are
//! deduplicated by [`BookRecord::id`].

use std::collections::HashSet;

use crate::lookup::{OrderBy, SearchQuery};
use crate::model::BookRecord;

/// One feed query: search text plus the sort hint to send with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedQuery {
    pub text: &'static str,
    pub order_by: Option<OrderBy>,
}

impl FeedQuery {
    /// The search for page `offset` of this feed query.
    pub fn to_search(&self, offset: u32) -> SearchQuery {
        SearchQuery::new(self.text).with_offset(offset).with_order_by(self.order_by)
    }
}

const ROTATION: [FeedQuery; 8] = [
    FeedQuery { text: "fiction newer:2025", order_by: Some(OrderBy::Newest) },
    FeedQuery { text: "fantasy newer:2025", order_by: Some(OrderBy::Newest) },
    FeedQuery { text: "mystery newer:2025", order_by: Some(OrderBy::Newest) },
    FeedQuery { text: "romance newer:2025", order_by: Some(OrderBy::Newest) },
    FeedQuery { text: "novel newer:2024", order_by: Some(OrderBy::Newest) },
    FeedQuery { text: "bestseller newer:2024", order_by: Some(OrderBy::Newest) },
    FeedQuery { text: "fiction newer:2025", order_by: Some(OrderBy::Relevance) },
    FeedQuery { text: "bestseller newer:2025", order_by: Some(OrderBy::Relevance) },
];

/// Recent-release queries across genres, rotated per feed load.
pub struct FeedStrategy;

impl FeedStrategy {
    /// The query for the `load_count`-th feed load.
    pub fn smart_query(load_count: u32) -> FeedQuery {
        ROTATION[(load_count % ROTATION.len() as u32) as usize]
    }
}

/// Append the books from `page` whose ids are not already in `existing`.
///
/// Returns how many were appended.
pub fn merge_page(existing: &mut Vec<BookRecord>, page: Vec<BookRecord>) -> usize {
    let mut seen: HashSet<String> = existing.iter().map(|b| b.id.clone()).collect();
    let before = existing.len();
    existing.extend(page.into_iter().filter(|b| seen.insert(b.id.clone())));
    existing.len() - before
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_wraps() {
        assert_eq!(FeedStrategy::smart_query(0).text, "fiction newer:2025");
        assert_eq!(FeedStrategy::smart_query(6).order_by, Some(OrderBy::Relevance));
        assert_eq!(FeedStrategy::smart_query(8), FeedStrategy::smart_query(0));
        assert_eq!(FeedStrategy::smart_query(13), FeedStrategy::smart_query(5));
    }

    #[test]
    fn test_to_search_carries_order_and_offset() {
        let search = FeedStrategy::smart_query(1).to_search(20);
        assert_eq!(search.text, "fantasy newer:2025");
        assert_eq!(search.offset, 20);
        assert_eq!(search.order_by, Some(OrderBy::Newest));
    }

    #[test]
    fn test_merge_page_dedups_by_id() {
        let mut feed = vec![BookRecord::new("a", "A", "x"), BookRecord::new("b", "B", "x")];
        let page = vec![
            BookRecord::new("b", "B again", "x"),
            BookRecord::new("c", "C", "x"),
            BookRecord::new("c", "C dup in page", "x"),
        ];

        assert_eq!(merge_page(&mut feed, page), 1);
        let ids: Vec<&str> = feed.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
        assert_eq!(feed[1].title, "B");
    }
}
