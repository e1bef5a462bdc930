//! Documents, document names, and the scoped handle guard.
//!
//! [`DocumentGuard`] is the only way store manager code touches a document:
//! it acquires the handle on construction and releases it in `Drop`, so
//! every exit path (success, error, early return) releases exactly once.

use std::collections::HashMap;
use std::fmt;

use crate::error::StoreError;
use crate::traits::DocumentStore;

/// Opaque storage name for a document, produced by the graph registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentName(pub String);

impl fmt::Display for DocumentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Access mode for a document handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

/// A named, opaque payload container.
///
/// The body is whatever bytes the active [`crate::traits::DataAdaptor`]
/// wrote; a freshly created document has an empty body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    name: DocumentName,
    body: Vec<u8>,
}

impl Document {
    /// Creates a document with an empty body.
    pub fn empty(name: DocumentName) -> Self {
        Document { name, body: Vec::new() }
    }

    /// Creates a document with the given body.
    pub fn new(name: DocumentName, body: Vec<u8>) -> Self {
        Document { name, body }
    }

    pub fn name(&self) -> &DocumentName {
        &self.name
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn set_body(&mut self, body: Vec<u8>) {
        self.body = body;
    }
}

/// Scoped document handle with guaranteed release.
///
/// Opening marks the handle held in the backing store and snapshots the
/// document contents. Mutations go through [`DocumentGuard::document_mut`]
/// and take effect in the store only on [`DocumentGuard::commit`]; dropping
/// the guard without committing leaves the stored document untouched.
pub struct DocumentGuard<'a, S: DocumentStore + ?Sized> {
    store: &'a mut S,
    name: DocumentName,
    access: Access,
    doc: Document,
}

impl<'a, S: DocumentStore + ?Sized> DocumentGuard<'a, S> {
    /// Acquires a handle on the named document.
    pub fn open(
        store: &'a mut S,
        name: &DocumentName,
        access: Access,
    ) -> Result<Self, StoreError> {
        let doc = store.open(name, access)?;
        Ok(DocumentGuard {
            store,
            name: name.clone(),
            access,
            doc,
        })
    }

    /// The document contents as of acquisition, plus any local mutations.
    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Mutable access to the working copy.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    /// Writes the working copy back to the store. Requires write access.
    pub fn commit(&mut self) -> Result<(), StoreError> {
        if self.access != Access::Write {
            return Err(StoreError::HandleNotHeld {
                name: self.name.clone(),
            });
        }
        self.store.put(&self.name, &self.doc)
    }
}

impl<S: DocumentStore + ?Sized> Drop for DocumentGuard<'_, S> {
    fn drop(&mut self) {
        self.store.release(&self.name);
    }
}

/// In-process handle bookkeeping shared by the shipped document stores.
///
/// Tracks which documents are held and in which mode: any number of
/// concurrent read handles, or exactly one write handle.
#[derive(Debug, Default)]
pub(crate) struct Holds {
    map: HashMap<DocumentName, Hold>,
}

#[derive(Debug)]
enum Hold {
    Read(usize),
    Write,
}

impl Holds {
    pub(crate) fn new() -> Self {
        Holds::default()
    }

    /// Records an acquisition, rejecting conflicting access.
    pub(crate) fn acquire(
        &mut self,
        name: &DocumentName,
        access: Access,
    ) -> Result<(), StoreError> {
        match (self.map.get_mut(name), access) {
            (None, Access::Read) => {
                self.map.insert(name.clone(), Hold::Read(1));
                Ok(())
            }
            (None, Access::Write) => {
                self.map.insert(name.clone(), Hold::Write);
                Ok(())
            }
            (Some(Hold::Read(n)), Access::Read) => {
                *n += 1;
                Ok(())
            }
            _ => Err(StoreError::DocumentLocked { name: name.clone() }),
        }
    }

    /// Verifies a write handle is held on the document.
    pub(crate) fn require_write(&self, name: &DocumentName) -> Result<(), StoreError> {
        match self.map.get(name) {
            Some(Hold::Write) => Ok(()),
            _ => Err(StoreError::HandleNotHeld { name: name.clone() }),
        }
    }

    /// Records a release. Releasing an unheld document is ignored so that
    /// guard drops stay infallible.
    pub(crate) fn release(&mut self, name: &DocumentName) {
        match self.map.get_mut(name) {
            Some(Hold::Read(n)) if *n > 1 => {
                *n -= 1;
            }
            Some(_) => {
                self.map.remove(name);
            }
            None => {}
        }
    }

    /// Returns true if any handle is held on the document.
    pub(crate) fn any_held(&self, name: &DocumentName) -> bool {
        self.map.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> DocumentName {
        DocumentName(s.to_string())
    }

    #[test]
    fn shared_reads_exclusive_writes() {
        let mut holds = Holds::new();
        holds.acquire(&name("d"), Access::Read).unwrap();
        holds.acquire(&name("d"), Access::Read).unwrap();
        assert!(matches!(
            holds.acquire(&name("d"), Access::Write),
            Err(StoreError::DocumentLocked { .. })
        ));

        holds.release(&name("d"));
        holds.release(&name("d"));
        holds.acquire(&name("d"), Access::Write).unwrap();
        assert!(matches!(
            holds.acquire(&name("d"), Access::Read),
            Err(StoreError::DocumentLocked { .. })
        ));
    }

    #[test]
    fn require_write_needs_write_hold() {
        let mut holds = Holds::new();
        assert!(holds.require_write(&name("d")).is_err());
        holds.acquire(&name("d"), Access::Read).unwrap();
        assert!(holds.require_write(&name("d")).is_err());
        holds.release(&name("d"));
        holds.acquire(&name("d"), Access::Write).unwrap();
        assert!(holds.require_write(&name("d")).is_ok());
    }

    #[test]
    fn release_unheld_is_ignored() {
        let mut holds = Holds::new();
        holds.release(&name("never"));
        assert!(!holds.any_held(&name("never")));
    }
}
