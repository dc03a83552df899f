//! Local shelf membership store.
//!
//! Tracks which books sit on which [`Shelf`], mirrored to an injected
//! [`BlobStore`] as a JSON array of [`ShelfMembership`] records:
//!
//! - the blob is read at construction; an absent or undecodable blob starts
//!   an empty store
//! - a blob that could not be read is retried before each mutation and is
//!   never overwritten until a read succeeds
//! - every mutation rewrites the full blob, including no-op removals
//! - a failed write is logged and the in-memory state is kept

mod blob;
mod migrations;
mod sqlite;

pub use blob::{BlobStore, FileBlobStore, MemoryBlobStore};
pub use sqlite::{SHELF_BLOB_KEY, SqliteBlobStore};

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::clock::{Clock, SystemClock};
use crate::model::{Shelf, ShelfMembership};

/// Persisted set of (book, shelf) memberships with toggle semantics.
///
/// Not synchronized; multi-threaded hosts hold it behind one mutex.
pub struct LocalShelfStore<B, C = SystemClock> {
    storage: B,
    clock: C,
    memberships: HashMap<(String, Shelf), ShelfMembership>,
    /// `Some` while the blob has not been read; holds keys removed since.
    unread: Option<HashSet<(String, Shelf)>>,
}

impl<B: BlobStore> LocalShelfStore<B, SystemClock> {
    /// Load memberships from `storage`.
    pub fn new(storage: B) -> Self {
        Self::with_clock(storage, SystemClock)
    }
}

impl<B: BlobStore, C: Clock> LocalShelfStore<B, C> {
    /// Load memberships from `storage`, timestamping new saves with `clock`.
    pub fn with_clock(storage: B, clock: C) -> Self {
        match load_memberships(&storage) {
            Ok(memberships) => Self { storage, clock, memberships, unread: None },
            Err(e) => {
                tracing::warn!(error = %e, "failed to read shelf blob, will retry before the next write");
                Self { storage, clock, memberships: HashMap::new(), unread: Some(HashSet::new()) }
            }
        }
    }

    /// Put a book on a shelf, refreshing `saved_at` if it is already there.
    pub fn add_to_shelf(&mut self, book_id: &str, shelf: Shelf) {
        self.retry_load();
        let key = (book_id.to_string(), shelf);
        if let Some(removed) = &mut self.unread {
            removed.remove(&key);
        }
        let membership = ShelfMembership { book_id: book_id.to_string(), shelf, saved_at: self.clock.now_millis() };
        self.memberships.insert(key, membership);
        self.persist();
    }

    /// Take a book off a shelf. Persists even when nothing changed.
    pub fn remove_from_shelf(&mut self, book_id: &str, shelf: Shelf) {
        self.retry_load();
        let key = (book_id.to_string(), shelf);
        self.memberships.remove(&key);
        if let Some(removed) = &mut self.unread {
            removed.insert(key);
        }
        self.persist();
    }

    pub fn is_on_shelf(&self, book_id: &str, shelf: Shelf) -> bool {
        self.memberships.contains_key(&(book_id.to_string(), shelf))
    }

    /// Every shelf the book is on.
    pub fn shelves_for(&self, book_id: &str) -> BTreeSet<Shelf> {
        Shelf::ALL.into_iter().filter(|shelf| self.is_on_shelf(book_id, *shelf)).collect()
    }

    /// Flip membership. Returns `true` if the book is now on the shelf.
    pub fn toggle_shelf(&mut self, book_id: &str, shelf: Shelf) -> bool {
        if self.is_on_shelf(book_id, shelf) {
            self.remove_from_shelf(book_id, shelf);
            false
        } else {
            self.add_to_shelf(book_id, shelf);
            true
        }
    }

    /// Memberships on one shelf, most recently saved first.
    pub fn shelf(&self, shelf: Shelf) -> Vec<ShelfMembership> {
        let mut saved: Vec<ShelfMembership> = self.memberships.values().filter(|m| m.shelf == shelf).cloned().collect();
        saved.sort_by(|a, b| b.saved_at.cmp(&a.saved_at).then_with(|| a.book_id.cmp(&b.book_id)));
        saved
    }

    pub fn len(&self) -> usize {
        self.memberships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memberships.is_empty()
    }

    /// Whether the persisted blob has been read into memory.
    pub fn is_loaded(&self) -> bool {
        self.unread.is_none()
    }

    /// Merge the persisted blob under in-memory changes once it becomes
    /// readable.
    fn retry_load(&mut self) {
        let Some(removed) = &self.unread else {
            return;
        };
        match load_memberships(&self.storage) {
            Ok(loaded) => {
                let before = self.memberships.len();
                for (key, membership) in loaded {
                    if !removed.contains(&key) {
                        self.memberships.entry(key).or_insert(membership);
                    }
                }
                tracing::info!(recovered = self.memberships.len() - before, "read shelf blob after earlier failure");
                self.unread = None;
            }
            Err(e) => tracing::warn!(error = %e, "shelf blob still unreadable"),
        }
    }

    fn persist(&self) {
        if !self.is_loaded() {
            tracing::warn!(memberships = self.memberships.len(), "shelf blob unread, not persisting");
            return;
        }

        let mut records: Vec<&ShelfMembership> = self.memberships.values().collect();
        records.sort_by(|a, b| (&a.book_id, a.shelf).cmp(&(&b.book_id, b.shelf)));

        let result = serde_json::to_string(&records)
            .map_err(crate::Error::from)
            .and_then(|blob| self.storage.save(&blob));

        if let Err(e) = result {
            tracing::warn!(error = %e, memberships = records.len(), "failed to persist shelves");
        }
    }
}

/// Read and decode the blob. Only a failed read is an error; an undecodable
/// blob yields an empty map.
fn load_memberships(storage: &impl BlobStore) -> Result<HashMap<(String, Shelf), ShelfMembership>, crate::Error> {
    let Some(blob) = storage.load()? else {
        return Ok(HashMap::new());
    };

    match serde_json::from_str::<Vec<ShelfMembership>>(&blob) {
        Ok(records) => Ok(records.into_iter().map(|m| ((m.book_id.clone(), m.shelf), m)).collect()),
        Err(e) => {
            tracing::warn!(error = %e, "corrupt shelf blob, starting empty");
            Ok(HashMap::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::Error;
    use crate::clock::ManualClock;

    fn store() -> (LocalShelfStore<MemoryBlobStore, ManualClock>, MemoryBlobStore, ManualClock) {
        let blob = MemoryBlobStore::new();
        let clock = ManualClock::new(1_000);
        (LocalShelfStore::with_clock(blob.clone(), clock.clone()), blob, clock)
    }

    #[derive(Default)]
    struct CountingBlobStore {
        saves: AtomicUsize,
        fail: bool,
    }

    impl BlobStore for CountingBlobStore {
        fn save(&self, _blob: &str) -> Result<(), Error> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            if self.fail { Err(Error::Storage("disk full".into())) } else { Ok(()) }
        }

        fn load(&self) -> Result<Option<String>, Error> {
            Ok(None)
        }
    }

    /// Fails the first `failures` loads, then reads through to `inner`.
    struct FlakyLoadStore {
        inner: MemoryBlobStore,
        failures: AtomicUsize,
    }

    impl FlakyLoadStore {
        fn new(inner: MemoryBlobStore, failures: usize) -> Self {
            Self { inner, failures: AtomicUsize::new(failures) }
        }
    }

    impl BlobStore for FlakyLoadStore {
        fn save(&self, blob: &str) -> Result<(), Error> {
            self.inner.save(blob)
        }

        fn load(&self) -> Result<Option<String>, Error> {
            let remaining = self.failures.load(Ordering::SeqCst);
            if remaining > 0 {
                self.failures.store(remaining - 1, Ordering::SeqCst);
                return Err(Error::Storage("database is locked".into()));
            }
            self.inner.load()
        }
    }

    fn seeded_blob() -> MemoryBlobStore {
        MemoryBlobStore::with_blob(
            r#"[{"bookId":"a","shelf":"TBR","savedAt":10},{"bookId":"b","shelf":"READ","savedAt":20}]"#,
        )
    }

    #[test]
    fn test_toggle_on_then_off() {
        let (mut store, _blob, _clock) = store();

        assert!(store.toggle_shelf("b1", Shelf::Tbr));
        assert!(store.is_on_shelf("b1", Shelf::Tbr));

        assert!(!store.toggle_shelf("b1", Shelf::Tbr));
        assert!(!store.is_on_shelf("b1", Shelf::Tbr));
        assert!(store.is_empty());
    }

    #[test]
    fn test_shelves_for() {
        let (mut store, _blob, _clock) = store();
        store.add_to_shelf("b1", Shelf::Read);
        store.add_to_shelf("b1", Shelf::Recommend);
        store.add_to_shelf("b2", Shelf::Tbr);

        assert_eq!(store.shelves_for("b1"), BTreeSet::from([Shelf::Read, Shelf::Recommend]));
        assert!(store.shelves_for("nobody").is_empty());
    }

    #[test]
    fn test_re_add_refreshes_timestamp() {
        let (mut store, _blob, clock) = store();
        store.add_to_shelf("b1", Shelf::Tbr);
        clock.advance(5_000);
        store.add_to_shelf("b1", Shelf::Tbr);

        let saved = store.shelf(Shelf::Tbr);
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].saved_at, 6_000);
    }

    #[test]
    fn test_shelf_sorted_most_recent_first() {
        let (mut store, _blob, clock) = store();
        store.add_to_shelf("old", Shelf::Read);
        clock.advance(10);
        store.add_to_shelf("new", Shelf::Read);
        store.add_to_shelf("elsewhere", Shelf::Tbr);

        let ids: Vec<String> = store.shelf(Shelf::Read).into_iter().map(|m| m.book_id).collect();
        assert_eq!(ids, ["new", "old"]);
    }

    #[test]
    fn test_persist_reload_round_trip() {
        let (mut store, blob, clock) = store();
        store.add_to_shelf("b1", Shelf::Tbr);
        clock.advance(1);
        store.add_to_shelf("b1", Shelf::Read);
        store.add_to_shelf("b2", Shelf::Recommend);
        store.toggle_shelf("b1", Shelf::Tbr);

        let reloaded = LocalShelfStore::with_clock(blob, clock);
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.shelves_for("b1"), BTreeSet::from([Shelf::Read]));
        assert_eq!(reloaded.shelves_for("b2"), BTreeSet::from([Shelf::Recommend]));
        assert_eq!(reloaded.shelf(Shelf::Read), store.shelf(Shelf::Read));
    }

    #[test]
    fn test_persist_reload_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shelves.json");

        let mut store = LocalShelfStore::new(FileBlobStore::new(&path));
        store.add_to_shelf("b1", Shelf::Recommend);

        let reloaded = LocalShelfStore::new(FileBlobStore::new(&path));
        assert!(reloaded.is_on_shelf("b1", Shelf::Recommend));
    }

    #[test]
    fn test_persist_reload_through_sqlite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("browsy.sqlite");

        let mut store = LocalShelfStore::new(SqliteBlobStore::open(&path, SHELF_BLOB_KEY).unwrap());
        store.add_to_shelf("b1", Shelf::Read);
        store.add_to_shelf("b2", Shelf::Read);

        let reloaded = LocalShelfStore::new(SqliteBlobStore::open(&path, SHELF_BLOB_KEY).unwrap());
        assert_eq!(reloaded.shelf(Shelf::Read).len(), 2);
    }

    #[test]
    fn test_loads_blob_written_by_mobile_clients() {
        let blob = MemoryBlobStore::with_blob(
            r#"[{"bookId":"abc","shelf":"TBR","savedAt":10},{"bookId":"abc","shelf":"READ","savedAt":20}]"#,
        );
        let store = LocalShelfStore::new(blob);
        assert_eq!(store.shelves_for("abc"), BTreeSet::from([Shelf::Tbr, Shelf::Read]));
    }

    #[test]
    fn test_corrupt_blob_starts_empty() {
        let blob = MemoryBlobStore::with_blob("{not json");
        let mut store = LocalShelfStore::new(blob.clone());
        assert!(store.is_empty());

        store.add_to_shelf("b1", Shelf::Tbr);
        let reloaded = LocalShelfStore::new(blob);
        assert!(reloaded.is_on_shelf("b1", Shelf::Tbr));
    }

    #[test]
    fn test_every_mutation_persists() {
        let storage = Arc::new(CountingBlobStore::default());
        let mut store = LocalShelfStore::new(storage.clone());

        store.add_to_shelf("b1", Shelf::Tbr);
        store.add_to_shelf("b1", Shelf::Tbr);
        store.remove_from_shelf("b1", Shelf::Tbr);
        store.remove_from_shelf("b1", Shelf::Tbr);
        store.toggle_shelf("b2", Shelf::Read);
        let _ = store.is_on_shelf("b2", Shelf::Read);
        let _ = store.shelves_for("b2");

        assert_eq!(storage.saves.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn test_failed_save_keeps_memory_state() {
        let storage = CountingBlobStore { fail: true, ..Default::default() };
        let mut store = LocalShelfStore::new(storage);

        assert!(store.toggle_shelf("b1", Shelf::Tbr));
        assert!(store.is_on_shelf("b1", Shelf::Tbr));
    }

    #[test]
    fn test_transient_load_error_keeps_existing_blob() {
        let blob = seeded_blob();
        let mut store = LocalShelfStore::with_clock(FlakyLoadStore::new(blob.clone(), 1), ManualClock::new(1_000));
        assert!(!store.is_loaded());

        store.add_to_shelf("c", Shelf::Tbr);
        assert!(store.is_loaded());
        assert_eq!(store.len(), 3);

        let reloaded = LocalShelfStore::new(blob);
        assert!(reloaded.is_on_shelf("a", Shelf::Tbr));
        assert!(reloaded.is_on_shelf("b", Shelf::Read));
        assert!(reloaded.is_on_shelf("c", Shelf::Tbr));
    }

    #[test]
    fn test_unreadable_blob_is_never_overwritten() {
        let blob = seeded_blob();
        let before = blob.load().unwrap();
        let mut store = LocalShelfStore::new(FlakyLoadStore::new(blob.clone(), usize::MAX));

        assert!(store.toggle_shelf("c", Shelf::Tbr));
        store.remove_from_shelf("a", Shelf::Tbr);

        assert!(store.is_on_shelf("c", Shelf::Tbr));
        assert!(!store.is_loaded());
        assert_eq!(blob.load().unwrap(), before);
    }

    #[test]
    fn test_removals_before_recovery_stay_removed() {
        let blob = seeded_blob();
        let mut store = LocalShelfStore::new(FlakyLoadStore::new(blob.clone(), 2));

        // Construction and the first retry both fail.
        store.remove_from_shelf("a", Shelf::Tbr);
        store.add_to_shelf("c", Shelf::Read);

        assert!(store.is_loaded());
        let reloaded = LocalShelfStore::new(blob);
        assert!(!reloaded.is_on_shelf("a", Shelf::Tbr));
        assert!(reloaded.is_on_shelf("b", Shelf::Read));
        assert!(reloaded.is_on_shelf("c", Shelf::Read));
    }
}
