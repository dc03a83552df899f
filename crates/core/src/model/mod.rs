//! Domain types shared by the repository, the shelf store and the adapters.

mod book;
mod shelf;

pub use book::{BookRecord, UNKNOWN_AUTHOR};
pub use shelf::{Shelf, ShelfMembership};
