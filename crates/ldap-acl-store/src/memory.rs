//! In-memory implementation of the store traits.
//!
//! This is primarily for testing. It has the same semantics as the file
//! store because both share the document logic, and it additionally
//! counts writes and can pretend the medium is read-only.

use std::io;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::document::AclDocument;
use crate::error::{Result, StoreError};
use crate::traits::AclStore;

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
}

#[derive(Debug, Default)]
struct MemoryStoreInner {
    /// Rendered document, `None` until created.
    contents: Option<String>,

    /// Number of successful saves.
    writes: usize,

    /// Saves fail while set.
    read_only: bool,
}

impl MemoryStore {
    /// Create a store that does not exist yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `text`, as if read from disk.
    pub fn with_contents(text: impl Into<String>) -> Self {
        let store = Self::new();
        store.write_guard().contents = Some(text.into());
        store
    }

    /// The rendered document, if the store exists.
    pub fn contents(&self) -> Option<String> {
        self.read_guard().contents.clone()
    }

    /// How many saves have succeeded.
    pub fn writes(&self) -> usize {
        self.read_guard().writes
    }

    /// Make subsequent saves fail (or succeed again).
    pub fn set_read_only(&self, read_only: bool) {
        self.write_guard().read_only = read_only;
    }

    fn read_guard(&self) -> RwLockReadGuard<'_, MemoryStoreInner> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_guard(&self) -> RwLockWriteGuard<'_, MemoryStoreInner> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl AclStore for MemoryStore {
    fn load(&self) -> Result<Option<AclDocument>> {
        Ok(self.read_guard().contents.as_deref().map(AclDocument::parse))
    }

    fn save(&self, document: &AclDocument) -> Result<()> {
        let mut inner = self.write_guard();
        if inner.read_only {
            return Err(StoreError::Write {
                location: self.location(),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "medium is read-only"),
            });
        }
        inner.contents = Some(document.render());
        inner.writes += 1;
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
