//! The store manager: graph-level CRUD across a document store and a
//! statement index.
//!
//! Every mutating operation touches two independently-failing subsystems.
//! The fixed invocation order per operation keeps the index no more "ahead"
//! of the document store than necessary: prior statements are removed from
//! the index before a document is replaced or deleted, and new statements
//! are indexed only after they are committed to the document. During a
//! mutation window the index may briefly under-represent the store, never
//! over-represent it.
//!
//! Absence is never an error: loading or deleting a graph that was never
//! saved is a silent no-op.

use graphdoc_core::graph::Graph;
use graphdoc_core::name::GraphName;
use graphdoc_core::triple::Triple;

use crate::document::{Access, DocumentGuard};
use crate::error::StoreError;
use crate::traits::{DataAdaptor, DocumentStore, GraphRegistry, TripleIndex};

/// Bundle of the document-side collaborators: physical store, payload
/// codec, and graph-to-document registry.
pub struct DocumentManager<S, A, R> {
    pub store: S,
    pub adaptor: A,
    pub registry: R,
}

impl<S, A, R> DocumentManager<S, A, R> {
    pub fn new(store: S, adaptor: A, registry: R) -> Self {
        DocumentManager {
            store,
            adaptor,
            registry,
        }
    }
}

/// Orchestrates graph-level Load, Save, Update and Delete across the
/// document collaborators and the index.
///
/// Owns both collaborators for its lifetime and releases both on
/// [`StoreManager::close`] (index first, then documents). `Drop` closes as
/// a last resort; explicit close is the expected path.
pub struct StoreManager<S, A, R, I>
where
    S: DocumentStore,
    A: DataAdaptor,
    R: GraphRegistry,
    I: TripleIndex,
{
    documents: DocumentManager<S, A, R>,
    index: I,
    closed: bool,
}

impl<S, A, R, I> StoreManager<S, A, R, I>
where
    S: DocumentStore,
    A: DataAdaptor,
    R: GraphRegistry,
    I: TripleIndex,
{
    /// Creates a manager owning the given collaborators.
    pub fn new(documents: DocumentManager<S, A, R>, index: I) -> Self {
        StoreManager {
            documents,
            index,
            closed: false,
        }
    }

    // -------------------------------------------------------------------
    // Capability queries
    // -------------------------------------------------------------------

    /// Whether incremental updates are supported.
    pub fn update_supported(&self) -> bool {
        !self.is_read_only()
    }

    /// Whether the backing store rejects mutations.
    pub fn is_read_only(&self) -> bool {
        self.documents.store.read_only()
    }

    /// Whether the manager is ready for operations.
    pub fn is_ready(&self) -> bool {
        !self.closed && self.documents.store.ready()
    }

    /// Read access to the index collaborator (for queries).
    pub fn index(&self) -> &I {
        &self.index
    }

    /// Read access to the registry collaborator (for graph listings).
    pub fn registry(&self) -> &R {
        &self.documents.registry
    }

    fn ensure_ready(&self) -> Result<(), StoreError> {
        if self.closed {
            return Err(StoreError::Closed);
        }
        if !self.documents.store.ready() {
            return Err(StoreError::NotReady);
        }
        Ok(())
    }

    fn ensure_writable(&self) -> Result<(), StoreError> {
        self.ensure_ready()?;
        if self.is_read_only() {
            return Err(StoreError::ReadOnlyStore);
        }
        Ok(())
    }

    // -------------------------------------------------------------------
    // Graph-level operations
    // -------------------------------------------------------------------

    /// Loads the named graph's statements into the caller's graph container.
    ///
    /// No-op if no backing document exists: the logical graph is considered
    /// empty, not missing.
    pub fn load_graph(&mut self, name: &GraphName, graph: &mut Graph) -> Result<(), StoreError> {
        self.ensure_ready()?;
        let doc_name = self.documents.registry.document_name(name);
        if !self.documents.store.has_document(&doc_name) {
            tracing::debug!(graph = %name, "load: no backing document, nothing to do");
            return Ok(());
        }

        let guard = DocumentGuard::open(&mut self.documents.store, &doc_name, Access::Read)
            .map_err(|e| wrap_load(name, e))?;
        let decoded = self.documents.adaptor.to_graph(guard.document(), graph);
        drop(guard);
        decoded.map_err(|e| wrap_load(name, e))?;
        tracing::debug!(graph = %name, triples = graph.len(), "load: decoded document");
        Ok(())
    }

    /// Persists the graph, replacing any prior version under the same name.
    pub fn save_graph(&mut self, graph: &Graph) -> Result<(), StoreError> {
        self.ensure_writable()?;
        let name = graph.name().clone();
        let doc_name = self.documents.registry.document_name(&name);

        if !self.documents.store.has_document(&doc_name) {
            self.documents
                .store
                .create_document(&doc_name)
                .map_err(|e| StoreError::DocumentCreation {
                    name: doc_name.clone(),
                    source: Box::new(e),
                })?;
            tracing::debug!(graph = %name, document = %doc_name, "save: created document");
        } else {
            // The index has no replace primitive, so a full replace is
            // remove-old then add-new. The removal runs before the write
            // handle is taken so the write lock only spans the encode.
            let mut prior = Graph::new(name.clone());
            let guard =
                DocumentGuard::open(&mut self.documents.store, &doc_name, Access::Read)
                    .map_err(|e| wrap_save(&name, e))?;
            let decoded = self.documents.adaptor.to_graph(guard.document(), &mut prior);
            drop(guard);
            decoded.map_err(|e| wrap_save(&name, e))?;

            self.index
                .remove_from_index(&prior.to_vec())
                .map_err(|e| StoreError::IndexCleanup {
                    source: Box::new(e),
                })?;
            tracing::debug!(graph = %name, removed = prior.len(), "save: prior statements unindexed");
        }

        self.documents.registry.register(&name, &doc_name)?;

        let mut guard = DocumentGuard::open(&mut self.documents.store, &doc_name, Access::Write)
            .map_err(|e| wrap_save(&name, e))?;
        let written = write_graph(&self.documents.adaptor, &mut self.index, &mut guard, graph);
        drop(guard);
        written.map_err(|e| wrap_save(&name, e))?;
        tracing::debug!(graph = %name, triples = graph.len(), "save: graph persisted");
        Ok(())
    }

    /// Applies incremental additions and removals to the named graph.
    ///
    /// Either side may be `None` ("no-op for this side"), which is distinct
    /// from an empty slice. If no backing document exists the delta is
    /// applied to a fresh graph (additions asserted first, then removals
    /// retracted); a net-empty result performs no storage work at all.
    pub fn update_graph(
        &mut self,
        name: &GraphName,
        additions: Option<&[Triple]>,
        removals: Option<&[Triple]>,
    ) -> Result<(), StoreError> {
        self.ensure_writable()?;
        let doc_name = self.documents.registry.document_name(name);

        if self.documents.store.has_document(&doc_name) {
            // One write handle spans the whole update.
            let mut guard =
                DocumentGuard::open(&mut self.documents.store, &doc_name, Access::Write)
                    .map_err(|e| wrap_update(name, e))?;
            let applied = apply_update(
                &self.documents.adaptor,
                &mut self.index,
                &mut guard,
                additions,
                removals,
            );
            drop(guard);
            applied.map_err(|e| wrap_update(name, e))?;
            tracing::debug!(graph = %name, "update: delta applied");
            return Ok(());
        }

        let mut fresh = Graph::new(name.clone());
        if let Some(adds) = additions {
            fresh.assert_all(adds.iter().cloned());
        }
        if let Some(rems) = removals {
            fresh.retract_all(rems);
        }
        if fresh.is_empty() {
            tracing::debug!(graph = %name, "update: no document and net-empty delta, nothing to do");
            return Ok(());
        }
        self.save_graph(&fresh).map_err(|e| wrap_update(name, e))
    }

    /// Deletes the named graph. No-op if it has no backing document.
    pub fn delete_graph(&mut self, name: &GraphName) -> Result<(), StoreError> {
        self.ensure_writable()?;
        let doc_name = self.documents.registry.document_name(name);
        if !self.documents.store.has_document(&doc_name) {
            tracing::debug!(graph = %name, "delete: no backing document, nothing to do");
            return Ok(());
        }

        let mut prior = Graph::new(name.clone());
        let guard = DocumentGuard::open(&mut self.documents.store, &doc_name, Access::Read)
            .map_err(|e| wrap_delete(name, e))?;
        let decoded = self.documents.adaptor.to_graph(guard.document(), &mut prior);
        drop(guard);
        decoded.map_err(|e| wrap_delete(name, e))?;

        // Index cleanup first; if it fails the document stays intact. The
        // reverse failure (physical delete failing below) leaves a dangling
        // empty document, which is cheaper than stale index entries.
        self.index
            .remove_from_index(&prior.to_vec())
            .map_err(|e| StoreError::IndexCleanup {
                source: Box::new(e),
            })?;

        self.documents
            .store
            .delete_document(&doc_name)
            .map_err(|e| wrap_delete(name, e))?;
        self.documents
            .registry
            .unregister(name)
            .map_err(|e| wrap_delete(name, e))?;
        tracing::debug!(graph = %name, removed = prior.len(), "delete: graph removed");
        Ok(())
    }

    // -------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------

    /// Releases owned collaborators: index first, then documents.
    ///
    /// Idempotent; subsequent calls are no-ops and never double-release.
    /// Both collaborators are closed even if the first close fails; the
    /// first error is returned.
    pub fn close(&mut self) -> Result<(), StoreError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        let index_closed = self.index.close();
        let store_closed = self.documents.store.close();
        index_closed?;
        store_closed
    }
}

impl<S, A, R, I> Drop for StoreManager<S, A, R, I>
where
    S: DocumentStore,
    A: DataAdaptor,
    R: GraphRegistry,
    I: TripleIndex,
{
    fn drop(&mut self) {
        // Last-resort cleanup; explicit close is the expected path.
        let _ = self.close();
    }
}

/// Encodes the graph into the held document, commits, then indexes the new
/// statements. The document is written before the index so the index never
/// holds statements the store does not.
fn write_graph<S, A, I>(
    adaptor: &A,
    index: &mut I,
    guard: &mut DocumentGuard<'_, S>,
    graph: &Graph,
) -> Result<(), StoreError>
where
    S: DocumentStore,
    A: DataAdaptor,
    I: TripleIndex,
{
    adaptor.to_document(graph, guard.document_mut())?;
    guard.commit()?;
    index.add_to_index(&graph.to_vec())?;
    Ok(())
}

/// Applies an update's two sides under one write handle. A failure in
/// either side aborts the remainder.
///
/// Additions commit the document before the index add; removals unindex
/// before the commit. Both orderings keep the index from ever holding a
/// statement the document store does not. Only the statements the adaptor
/// reports as actually added or removed reach the index: a statement the
/// document already held, or never held, must not skew its occurrence
/// count.
fn apply_update<S, A, I>(
    adaptor: &A,
    index: &mut I,
    guard: &mut DocumentGuard<'_, S>,
    additions: Option<&[Triple]>,
    removals: Option<&[Triple]>,
) -> Result<(), StoreError>
where
    S: DocumentStore,
    A: DataAdaptor,
    I: TripleIndex,
{
    if let Some(adds) = additions {
        let added = adaptor.append_triples(guard.document_mut(), adds)?;
        guard.commit()?;
        index.add_to_index(&added)?;
    }
    if let Some(rems) = removals {
        let removed = adaptor.delete_triples(guard.document_mut(), rems)?;
        index.remove_from_index(&removed)?;
        guard.commit()?;
    }
    Ok(())
}

fn wrap_load(name: &GraphName, e: StoreError) -> StoreError {
    if e.is_operation_error() {
        e
    } else {
        StoreError::LoadFailed {
            graph: name.to_string(),
            source: Box::new(e),
        }
    }
}

fn wrap_save(name: &GraphName, e: StoreError) -> StoreError {
    if e.is_operation_error() {
        e
    } else {
        StoreError::SaveFailed {
            graph: name.to_string(),
            source: Box::new(e),
        }
    }
}

fn wrap_update(name: &GraphName, e: StoreError) -> StoreError {
    if e.is_operation_error() {
        e
    } else {
        StoreError::UpdateFailed {
            graph: name.to_string(),
            source: Box::new(e),
        }
    }
}

fn wrap_delete(name: &GraphName, e: StoreError) -> StoreError {
    if e.is_operation_error() {
        e
    } else {
        StoreError::DeleteFailed {
            graph: name.to_string(),
            source: Box::new(e),
        }
    }
}
