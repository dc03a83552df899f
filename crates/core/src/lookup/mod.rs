//! Book lookups across the primary and secondary upstream sources.

mod repository;
mod source;

pub use repository::BookRepository;
pub use source::{DEFAULT_MAX_RESULTS, OrderBy, PrimarySource, SearchQuery, SecondarySource};
