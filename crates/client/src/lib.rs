//! Upstream book API clients for browsy.
//!
//! Google Books is the primary source and Open Library the ISBN fallback.
//! Both normalize their responses into [`browsy_core::BookRecord`] and
//! implement the source traits the core repository is generic over.

pub mod cover;
pub mod error;
pub mod google;
pub mod isbn;
pub mod openlibrary;

pub use error::ApiError;
pub use google::{GoogleBooksClient, GoogleBooksConfig, VolumesRequest};
pub use isbn::normalize_isbn;
pub use openlibrary::{OpenLibraryClient, OpenLibraryConfig};
