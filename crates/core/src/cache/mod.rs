//! In-memory book cache.
//!
//! A bounded, LRU-evicted map whose entries expire a fixed time after they
//! were last written. Used by [`crate::lookup::BookRepository`] to avoid
//! repeat calls to the upstream book APIs.

pub mod lru;

pub use lru::{CacheConfig, DEFAULT_CAPACITY, DEFAULT_TTL, ExpiringLruCache, MAX_CAPACITY};
