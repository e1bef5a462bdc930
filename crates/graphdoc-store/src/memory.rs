//! In-memory implementation of [`DocumentStore`].
//!
//! [`MemoryDocumentStore`] is a first-class backend for tests, ephemeral
//! stores, and anywhere persistence isn't needed, with identical semantics
//! to the SQLite backend: exclusive write handles, shared read handles,
//! empty body on creation.

use std::collections::HashMap;

use crate::document::{Access, Document, DocumentName, Holds};
use crate::error::StoreError;
use crate::traits::DocumentStore;

/// In-memory document store. All bodies live in a HashMap.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    docs: HashMap<DocumentName, Vec<u8>>,
    holds: Holds,
    read_only: bool,
}

impl MemoryDocumentStore {
    /// Creates an empty, writable store.
    pub fn new() -> Self {
        MemoryDocumentStore {
            docs: HashMap::new(),
            holds: Holds::new(),
            read_only: false,
        }
    }

    /// Marks the store read-only (for backends that only serve queries).
    pub fn with_read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    /// Returns true if no documents are stored.
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn has_document(&self, name: &DocumentName) -> bool {
        self.docs.contains_key(name)
    }

    fn create_document(&mut self, name: &DocumentName) -> Result<(), StoreError> {
        if self.docs.contains_key(name) {
            return Err(StoreError::DocumentExists { name: name.clone() });
        }
        self.docs.insert(name.clone(), Vec::new());
        Ok(())
    }

    fn delete_document(&mut self, name: &DocumentName) -> Result<(), StoreError> {
        if self.holds.any_held(name) {
            return Err(StoreError::DocumentLocked { name: name.clone() });
        }
        self.docs
            .remove(name)
            .ok_or_else(|| StoreError::DocumentMissing { name: name.clone() })?;
        Ok(())
    }

    fn open(&mut self, name: &DocumentName, access: Access) -> Result<Document, StoreError> {
        let body = self
            .docs
            .get(name)
            .ok_or_else(|| StoreError::DocumentMissing { name: name.clone() })?
            .clone();
        self.holds.acquire(name, access)?;
        Ok(Document::new(name.clone(), body))
    }

    fn put(&mut self, name: &DocumentName, doc: &Document) -> Result<(), StoreError> {
        self.holds.require_write(name)?;
        let body = self
            .docs
            .get_mut(name)
            .ok_or_else(|| StoreError::DocumentMissing { name: name.clone() })?;
        *body = doc.body().to_vec();
        Ok(())
    }

    fn release(&mut self, name: &DocumentName) {
        self.holds.release(name);
    }

    fn read_only(&self) -> bool {
        self.read_only
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentGuard;

    fn name(s: &str) -> DocumentName {
        DocumentName(s.to_string())
    }

    #[test]
    fn create_open_put_roundtrip() {
        let mut store = MemoryDocumentStore::new();
        let n = name("doc");
        store.create_document(&n).unwrap();
        assert!(store.has_document(&n));

        {
            let mut guard = DocumentGuard::open(&mut store, &n, Access::Write).unwrap();
            assert!(guard.document().body().is_empty());
            guard.document_mut().set_body(b"payload".to_vec());
            guard.commit().unwrap();
        }

        let guard = DocumentGuard::open(&mut store, &n, Access::Read).unwrap();
        assert_eq!(guard.document().body(), b"payload");
    }

    #[test]
    fn open_missing_document_fails() {
        let mut store = MemoryDocumentStore::new();
        assert!(matches!(
            store.open(&name("nope"), Access::Read),
            Err(StoreError::DocumentMissing { .. })
        ));
    }

    #[test]
    fn create_existing_document_fails() {
        let mut store = MemoryDocumentStore::new();
        let n = name("doc");
        store.create_document(&n).unwrap();
        assert!(store.create_document(&n).is_err());
    }

    #[test]
    fn write_handle_is_exclusive() {
        let mut store = MemoryDocumentStore::new();
        let n = name("doc");
        store.create_document(&n).unwrap();
        store.open(&n, Access::Write).unwrap();
        assert!(matches!(
            store.open(&n, Access::Write),
            Err(StoreError::DocumentLocked { .. })
        ));
        store.release(&n);
        store.open(&n, Access::Read).unwrap();
    }

    #[test]
    fn commit_on_read_guard_rejected() {
        let mut store = MemoryDocumentStore::new();
        let n = name("doc");
        store.create_document(&n).unwrap();
        let mut guard = DocumentGuard::open(&mut store, &n, Access::Read).unwrap();
        assert!(matches!(
            guard.commit(),
            Err(StoreError::HandleNotHeld { .. })
        ));
    }

    #[test]
    fn delete_held_document_rejected() {
        let mut store = MemoryDocumentStore::new();
        let n = name("doc");
        store.create_document(&n).unwrap();
        store.open(&n, Access::Read).unwrap();
        assert!(matches!(
            store.delete_document(&n),
            Err(StoreError::DocumentLocked { .. })
        ));
        store.release(&n);
        store.delete_document(&n).unwrap();
        assert!(!store.has_document(&n));
    }

    #[test]
    fn guard_drop_releases() {
        let mut store = MemoryDocumentStore::new();
        let n = name("doc");
        store.create_document(&n).unwrap();
        {
            let _guard = DocumentGuard::open(&mut store, &n, Access::Write).unwrap();
        }
        // Handle released by the drop; a fresh write open must succeed.
        store.open(&n, Access::Write).unwrap();
    }
}
