use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Author placeholder when a source has no author for a volume.
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

/// A book normalized from either upstream source.
///
/// Identity is `id`. Records from different sources are never merged by
/// content; callers paging through results deduplicate by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookRecord {
    pub id: String,
    pub title: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// As provided upstream: `YYYY`, `YYYY-MM` or `YYYY-MM-DD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u32>,
    /// ISBN-13 when known, otherwise ISBN-10.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(default)]
    pub subjects: Vec<String>,
}

impl BookRecord {
    /// A record with only the required fields set.
    pub fn new(id: impl Into<String>, title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            author: author.into(),
            cover_url: None,
            description: None,
            published_date: None,
            page_count: None,
            isbn: None,
            subjects: Vec::new(),
        }
    }
}
