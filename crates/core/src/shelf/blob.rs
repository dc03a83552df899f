//! Durable blob stores backing the shelf store.

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use crate::Error;

/// A single persisted string slot.
///
/// The shelf store overwrites the whole blob on every mutation and reads it
/// once at construction. Hosts supply the platform-appropriate backend.
pub trait BlobStore: Send + Sync {
    /// Replace the stored blob.
    fn save(&self, blob: &str) -> Result<(), Error>;

    /// The stored blob, or `None` if nothing was saved yet.
    fn load(&self) -> Result<Option<String>, Error>;
}

impl<B: BlobStore + ?Sized> BlobStore for Arc<B> {
    fn save(&self, blob: &str) -> Result<(), Error> {
        (**self).save(blob)
    }

    fn load(&self) -> Result<Option<String>, Error> {
        (**self).load()
    }
}

/// Process-local blob, mostly for tests.
///
/// Clones share the same slot, so a "reload" can be simulated by building a
/// second store over a clone.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    blob: Arc<RwLock<Option<String>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with `blob`.
    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self { blob: Arc::new(RwLock::new(Some(blob.into()))) }
    }
}

impl BlobStore for MemoryBlobStore {
    fn save(&self, blob: &str) -> Result<(), Error> {
        let mut slot = self.blob.write().map_err(|_| Error::Storage("memory blob lock poisoned".into()))?;
        *slot = Some(blob.to_string());
        Ok(())
    }

    fn load(&self) -> Result<Option<String>, Error> {
        let slot = self.blob.read().map_err(|_| Error::Storage("memory blob lock poisoned".into()))?;
        Ok(slot.clone())
    }
}

/// Blob kept in a single file.
///
/// Writes go to a sibling temp file which is then renamed over the target,
/// so a crash mid-write leaves the previous blob intact.
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    path: PathBuf,
}

impl FileBlobStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl BlobStore for FileBlobStore {
    fn save(&self, blob: &str) -> Result<(), Error> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.temp_path();
        std::fs::write(&tmp, blob)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn load(&self) -> Result<Option<String>, Error> {
        match std::fs::read_to_string(&self.path) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
