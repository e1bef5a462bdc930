//! Storage error types for graphdoc-store.
//!
//! [`StoreError`] covers both operation-level failures raised at the store
//! manager boundary and collaborator-level failures (document store, codec,
//! registry, database). Absence of a graph is never an error anywhere in
//! this crate; absent-graph operations are no-ops.

use thiserror::Error;

use crate::document::DocumentName;

/// Errors produced by storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    // -------------------------------------------------------------------
    // Operation-level errors (raised at the store manager boundary)
    // -------------------------------------------------------------------
    /// A backing document could not be created during a save.
    #[error("unable to create document '{name}'")]
    DocumentCreation {
        name: DocumentName,
        #[source]
        source: Box<StoreError>,
    },

    /// A pre-mutation removal of prior statements from the index failed.
    /// The triggering operation aborts with the document left untouched.
    #[error("unable to remove prior statements from the index")]
    IndexCleanup {
        #[source]
        source: Box<StoreError>,
    },

    /// A graph load failed for a reason other than absence.
    #[error("failed to load graph '{graph}'")]
    LoadFailed {
        graph: String,
        #[source]
        source: Box<StoreError>,
    },

    /// A graph save failed partway through.
    #[error("failed to save graph '{graph}'")]
    SaveFailed {
        graph: String,
        #[source]
        source: Box<StoreError>,
    },

    /// An incremental graph update failed.
    #[error("failed to update graph '{graph}'")]
    UpdateFailed {
        graph: String,
        #[source]
        source: Box<StoreError>,
    },

    /// A graph deletion failed after index cleanup succeeded. The index is
    /// already clean; at worst a dangling empty document remains.
    #[error("failed to delete graph '{graph}'")]
    DeleteFailed {
        graph: String,
        #[source]
        source: Box<StoreError>,
    },

    /// A mutating operation was attempted on a read-only store.
    #[error("store is read-only")]
    ReadOnlyStore,

    /// An operation was attempted after the manager was closed.
    #[error("store manager is closed")]
    Closed,

    /// An operation was attempted while the document store reports itself
    /// not ready for work.
    #[error("document store is not ready")]
    NotReady,

    // -------------------------------------------------------------------
    // Collaborator-level errors
    // -------------------------------------------------------------------
    /// A document handle is already held with conflicting access.
    #[error("document '{name}' is locked by another handle")]
    DocumentLocked { name: DocumentName },

    /// A document does not exist in the document store.
    #[error("document '{name}' does not exist")]
    DocumentMissing { name: DocumentName },

    /// A document already exists where a new one was to be created.
    #[error("document '{name}' already exists")]
    DocumentExists { name: DocumentName },

    /// A write-back was attempted without an open write handle.
    #[error("no open write handle for document '{name}'")]
    HandleNotHeld { name: DocumentName },

    /// The registry detected inconsistent graph-to-document bookkeeping.
    #[error("registry integrity error: {reason}")]
    Registry { reason: String },

    /// A document payload could not be decoded by the data adaptor.
    #[error("malformed document payload: {reason}")]
    MalformedDocument { reason: String },

    /// JSON serialization or deserialization failed.
    #[error("codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// A core data-model validation failed while decoding.
    #[error(transparent)]
    Model(#[from] graphdoc_core::CoreError),

    /// The SQLite backend reported an error.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A schema migration failed.
    #[error("migration error: {0}")]
    Migration(String),
}

impl StoreError {
    /// Returns true for errors that already carry operation-level context.
    ///
    /// These pass through the store manager boundary unchanged; everything
    /// else is wrapped exactly once into the operation-specific variant.
    pub fn is_operation_error(&self) -> bool {
        matches!(
            self,
            StoreError::DocumentCreation { .. }
                | StoreError::IndexCleanup { .. }
                | StoreError::LoadFailed { .. }
                | StoreError::SaveFailed { .. }
                | StoreError::UpdateFailed { .. }
                | StoreError::DeleteFailed { .. }
                | StoreError::ReadOnlyStore
                | StoreError::Closed
                | StoreError::NotReady
        )
    }
}
