//! Open Library Books API response types (`jscmd=data`).

use std::collections::HashMap;

use browsy_core::{BookRecord, UNKNOWN_AUTHOR};
use serde::Deserialize;

use crate::cover;

/// Raw response, keyed by bibkey (`ISBN:<isbn>`). Empty when nothing matched.
pub type BooksResponse = HashMap<String, BookData>;

/// Book metadata. Everything but the title is optional.
#[derive(Debug, Deserialize)]
pub struct BookData {
    pub title: String,
    pub subtitle: Option<String>,
    #[serde(default)]
    pub authors: Vec<Named>,
    pub publish_date: Option<String>,
    pub number_of_pages: Option<u32>,
    #[serde(default)]
    pub subjects: Vec<Named>,
    pub cover: Option<Cover>,
    pub identifiers: Option<Identifiers>,
}

/// Author or subject entry; only the name is used.
#[derive(Debug, Deserialize)]
pub struct Named {
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct Cover {
    pub small: Option<String>,
    pub medium: Option<String>,
    pub large: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Identifiers {
    #[serde(default)]
    pub isbn_13: Vec<String>,
    #[serde(default)]
    pub isbn_10: Vec<String>,
}

impl BookData {
    /// Normalize into a record with id `OL:<isbn>`.
    ///
    /// `queried_isbn` is the ISBN that was looked up. It backs the record's
    /// ISBN when the response carries no identifiers. The data endpoint has
    /// no description.
    pub fn into_book(self, queried_isbn: &str) -> BookRecord {
        let title = match self.subtitle {
            Some(subtitle) => format!("{}: {subtitle}", self.title),
            None => self.title,
        };

        // Enhanced to the large size, same as Google Books covers.
        let cover_url = self
            .cover
            .and_then(|c| c.large.or(c.medium).or(c.small))
            .map(|url| cover::enhance(&url));

        let identifiers = self.identifiers.unwrap_or_default();
        let isbn = identifiers
            .isbn_13
            .into_iter()
            .next()
            .or_else(|| identifiers.isbn_10.into_iter().next())
            .unwrap_or_else(|| queried_isbn.to_string());

        BookRecord {
            id: format!("OL:{queried_isbn}"),
            title,
            author: self.authors.into_iter().next().map(|a| a.name).unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
            cover_url,
            description: None,
            published_date: self.publish_date,
            page_count: self.number_of_pages,
            isbn: Some(isbn),
            subjects: self.subjects.into_iter().map(|s| s.name).collect(),
        }
    }
}
