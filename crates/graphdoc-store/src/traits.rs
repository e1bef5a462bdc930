//! Collaborator contracts consumed by the store manager.
//!
//! The manager is generic over four capability traits; every backend
//! (in-memory, SQLite, alternate serialization formats) plugs in by
//! implementing the relevant trait, ensuring backends are fully swappable
//! without touching orchestration logic.
//!
//! All contracts are synchronous: operations may block the calling thread
//! while a handle is held, and no internal threading is introduced.

use graphdoc_core::graph::Graph;
use graphdoc_core::name::GraphName;
use graphdoc_core::triple::Triple;

use crate::document::{Access, Document, DocumentName};
use crate::error::StoreError;

/// Physical storage of named, opaque documents.
///
/// The store is assumed to provide per-document mutual exclusion for write
/// handles; the shipped backends enforce it in-process via handle
/// bookkeeping. Every successful [`DocumentStore::open`] must be paired
/// with exactly one [`DocumentStore::release`]; store manager code goes
/// through [`crate::document::DocumentGuard`] to make that pairing
/// structural rather than manual.
pub trait DocumentStore {
    /// Returns true if a document with this name exists.
    fn has_document(&self, name: &DocumentName) -> bool;

    /// Creates an empty document. Creating an existing document is an error.
    fn create_document(&mut self, name: &DocumentName) -> Result<(), StoreError>;

    /// Deletes a document. Fails if any handle is held on it.
    fn delete_document(&mut self, name: &DocumentName) -> Result<(), StoreError>;

    /// Acquires a handle and returns a snapshot of the document contents.
    fn open(&mut self, name: &DocumentName, access: Access) -> Result<Document, StoreError>;

    /// Writes contents back while a write handle is held.
    fn put(&mut self, name: &DocumentName, doc: &Document) -> Result<(), StoreError>;

    /// Releases a held handle. Infallible so that guard drops never panic.
    fn release(&mut self, name: &DocumentName);

    /// Whether this store rejects mutations. Default: writable.
    fn read_only(&self) -> bool {
        false
    }

    /// Whether this store is ready for operations. Default: always.
    fn ready(&self) -> bool {
        true
    }

    /// Releases backend resources. Idempotent.
    fn close(&mut self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Codec between an in-memory graph and a document payload.
///
/// One implementation per serialization format, all against the same
/// document contract.
pub trait DataAdaptor {
    /// Decodes the document body into the caller's graph.
    ///
    /// An empty body decodes as an empty graph (a freshly created document
    /// has no payload yet).
    fn to_graph(&self, doc: &Document, graph: &mut Graph) -> Result<(), StoreError>;

    /// Encodes the graph into the document body, replacing prior contents.
    fn to_document(&self, graph: &Graph, doc: &mut Document) -> Result<(), StoreError>;

    /// Adds statements to an existing document body incrementally.
    /// Statements already present are not duplicated. Returns the subset
    /// that was actually added, so callers mirroring the document (the
    /// statement index) see exactly the statements the document gained.
    fn append_triples(
        &self,
        doc: &mut Document,
        triples: &[Triple],
    ) -> Result<Vec<Triple>, StoreError>;

    /// Removes statements from an existing document body incrementally.
    /// Statements not present are ignored. Returns the subset that was
    /// actually removed.
    fn delete_triples(
        &self,
        doc: &mut Document,
        triples: &[Triple],
    ) -> Result<Vec<Triple>, StoreError>;
}

/// Bidirectional mapping from logical graph names to document names.
pub trait GraphRegistry {
    /// Derives the storage document name for a graph. Deterministic: the
    /// same graph name always yields the same document name.
    fn document_name(&self, graph: &GraphName) -> DocumentName;

    /// Records a graph-to-document mapping. Idempotent for an identical
    /// existing mapping.
    fn register(&mut self, graph: &GraphName, doc: &DocumentName) -> Result<(), StoreError>;

    /// Removes a graph's mapping. Removing an unknown graph is a no-op.
    fn unregister(&mut self, graph: &GraphName) -> Result<(), StoreError>;

    /// Looks up the registered document name for a graph, if any. Backend
    /// failures are errors, never mistaken for absence.
    fn lookup(&self, graph: &GraphName) -> Result<Option<DocumentName>, StoreError>;

    /// Lists all registered graphs.
    fn graphs(&self) -> Result<Vec<GraphName>, StoreError>;
}

/// Secondary index over statements.
///
/// The store manager only needs bulk add and bulk remove; queries are the
/// index's own business, but whatever it answers must stay consistent with
/// the documents (it is always fed statement sets read from, or about to be
/// written to, the document store).
pub trait TripleIndex {
    /// Adds every statement in the slice to the index.
    fn add_to_index(&mut self, triples: &[Triple]) -> Result<(), StoreError>;

    /// Removes every statement in the slice from the index.
    fn remove_from_index(&mut self, triples: &[Triple]) -> Result<(), StoreError>;

    /// Releases index resources. Idempotent.
    fn close(&mut self) -> Result<(), StoreError> {
        Ok(())
    }
}
