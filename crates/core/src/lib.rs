//! Core types and shared functionality for browsy.
//!
//! This crate provides:
//! - Expiring LRU book cache
//! - Dual-source lookup policy over the upstream book APIs
//! - Local shelf membership store with pluggable persistence
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod feed;
pub mod lookup;
pub mod model;
pub mod shelf;

pub use cache::{CacheConfig, ExpiringLruCache};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{AppConfig, ConfigError};
pub use error::Error;
pub use feed::{FeedQuery, FeedStrategy, merge_page};
pub use lookup::{BookRepository, OrderBy, PrimarySource, SearchQuery, SecondarySource};
pub use model::{BookRecord, Shelf, ShelfMembership, UNKNOWN_AUTHOR};
pub use shelf::{BlobStore, FileBlobStore, LocalShelfStore, MemoryBlobStore, SqliteBlobStore};
