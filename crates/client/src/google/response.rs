//! Google Books volumes response types and normalization.

use browsy_core::{BookRecord, UNKNOWN_AUTHOR};
use serde::Deserialize;

use crate::cover;

/// Raw response from `GET /volumes`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumesResponse {
    #[serde(default)]
    pub items: Vec<VolumeItem>,
}

/// One volume.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeItem {
    pub id: String,
    pub volume_info: VolumeInfo,
}

/// Volume metadata.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeInfo {
    pub title: String,
    #[serde(default)]
    pub authors: Vec<String>,
    pub description: Option<String>,
    pub published_date: Option<String>,
    pub page_count: Option<u32>,
    #[serde(default)]
    pub categories: Vec<String>,
    pub image_links: Option<ImageLinks>,
    #[serde(default)]
    pub industry_identifiers: Vec<IndustryIdentifier>,
}

/// Cover URLs by size, smallest to largest.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageLinks {
    pub small_thumbnail: Option<String>,
    pub thumbnail: Option<String>,
    pub small: Option<String>,
    pub medium: Option<String>,
    pub large: Option<String>,
    pub extra_large: Option<String>,
}

impl ImageLinks {
    /// Largest of extraLarge, large, medium, thumbnail.
    fn best(&self) -> Option<&str> {
        self.extra_large
            .as_deref()
            .or(self.large.as_deref())
            .or(self.medium.as_deref())
            .or(self.thumbnail.as_deref())
    }
}

/// ISBN and other identifiers.
#[derive(Debug, Deserialize)]
pub struct IndustryIdentifier {
    #[serde(rename = "type")]
    pub kind: String,
    pub identifier: String,
}

fn find_identifier(identifiers: &[IndustryIdentifier], kind: &str) -> Option<String> {
    identifiers.iter().find(|id| id.kind == kind).map(|id| id.identifier.clone())
}

impl From<VolumeItem> for BookRecord {
    /// Normalize a volume: best cover (enhanced, https), first author or
    /// placeholder, ISBN-13 over ISBN-10, categories as subjects.
    fn from(item: VolumeItem) -> Self {
        let info = item.volume_info;

        let original_cover = info.image_links.as_ref().and_then(ImageLinks::best);
        let cover_url = original_cover.map(cover::enhance);
        if let (Some(original), Some(enhanced)) = (original_cover, cover_url.as_deref())
            && original != enhanced
        {
            tracing::trace!(title = %info.title, original, enhanced, "enhanced cover url");
        }

        let isbn = find_identifier(&info.industry_identifiers, "ISBN_13")
            .or_else(|| find_identifier(&info.industry_identifiers, "ISBN_10"));

        BookRecord {
            id: item.id,
            title: info.title,
            author: info.authors.into_iter().next().unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
            cover_url,
            description: info.description,
            published_date: info.published_date,
            page_count: info.page_count,
            isbn,
            subjects: info.categories,
        }
    }
}

impl VolumesResponse {
    /// Normalize every volume in the response.
    pub fn into_books(self) -> Vec<BookRecord> {
        self.items.into_iter().map(BookRecord::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE_JSON: &str = r#"{
        "kind": "books#volumes",
        "totalItems": 2,
        "items": [
            {
                "id": "B1gX0QEACAAJ",
                "volumeInfo": {
                    "title": "Dune",
                    "authors": ["Frank Herbert", "Someone Else"],
                    "publishedDate": "2005-08-02",
                    "description": "Desert planet.",
                    "pageCount": 528,
                    "categories": ["Fiction"],
                    "imageLinks": {
                        "smallThumbnail": "http://books.google.com/books/content?id=B1gX0QEACAAJ&zoom=5&edge=curl",
                        "thumbnail": "http://books.google.com/books/content?id=B1gX0QEACAAJ&zoom=1&edge=curl"
                    },
                    "industryIdentifiers": [
                        {"type": "ISBN_10", "identifier": "0441013597"},
                        {"type": "ISBN_13", "identifier": "9780441013593"}
                    ]
                }
            },
            {
                "id": "noAuthor",
                "volumeInfo": {
                    "title": "Anonymous Pamphlet",
                    "industryIdentifiers": [
                        {"type": "OTHER", "identifier": "UOM:39015"},
                        {"type": "ISBN_10", "identifier": "1234567890"}
                    ]
                }
            }
        ]
    }"#;

    #[test]
    fn test_deserialize_volumes_response() {
        let response: VolumesResponse = serde_json::from_str(FIXTURE_JSON).unwrap();
        assert_eq!(response.items.len(), 2);
        assert_eq!(response.items[0].volume_info.authors.len(), 2);
    }

    #[test]
    fn test_normalize_full_volume() {
        let response: VolumesResponse = serde_json::from_str(FIXTURE_JSON).unwrap();
        let books = response.into_books();

        let dune = &books[0];
        assert_eq!(dune.id, "B1gX0QEACAAJ");
        assert_eq!(dune.author, "Frank Herbert");
        assert_eq!(dune.isbn.as_deref(), Some("9780441013593"));
        assert_eq!(dune.page_count, Some(528));
        assert_eq!(dune.subjects, ["Fiction"]);
        assert_eq!(
            dune.cover_url.as_deref(),
            Some("https://books.google.com/books/content?id=B1gX0QEACAAJ&zoom=0")
        );
    }

    #[test]
    fn test_normalize_sparse_volume() {
        let response: VolumesResponse = serde_json::from_str(FIXTURE_JSON).unwrap();
        let books = response.into_books();

        let sparse = &books[1];
        assert_eq!(sparse.author, UNKNOWN_AUTHOR);
        assert_eq!(sparse.isbn.as_deref(), Some("1234567890"));
        assert!(sparse.cover_url.is_none());
        assert!(sparse.subjects.is_empty());
    }

    #[test]
    fn test_prefers_largest_cover() {
        let links = ImageLinks {
            thumbnail: Some("t".into()),
            medium: Some("m".into()),
            large: Some("l".into()),
            ..Default::default()
        };
        assert_eq!(links.best(), Some("l"));

        let links = ImageLinks { small_thumbnail: Some("s".into()), ..Default::default() };
        assert_eq!(links.best(), None);
    }

    #[test]
    fn test_empty_results() {
        let response: VolumesResponse = serde_json::from_str(r#"{"kind": "books#volumes", "totalItems": 0}"#).unwrap();
        assert!(response.into_books().is_empty());
    }
}
