//! Document-backed RDF graph storage with a mirrored statement index.
//!
//! The [`StoreManager`] orchestrates four collaborators -- document store,
//! data adaptor, graph registry, and statement index -- to provide
//! graph-level Load, Save, Update and Delete with a fixed consistency
//! protocol between the two stores.
//!
//! # Architecture
//!
//! Collaborators are capability traits ([`DocumentStore`], [`DataAdaptor`],
//! [`GraphRegistry`], [`TripleIndex`]); the manager is generic over them,
//! so backends are fully swappable without touching orchestration logic.
//!
//! # Modules
//!
//! - [`error`]: StoreError taxonomy and the wrap-once propagation policy
//! - [`document`]: documents, names, and the scoped handle guard
//! - [`traits`]: collaborator contracts
//! - [`manager`]: the store manager core
//! - [`registry`]: hash-derived document names, in-memory registry
//! - [`memory`]: in-memory document store
//! - [`schema`] / [`sqlite`]: SQLite-backed document store and registry
//! - [`json`] / [`ntriples`]: JSON and N-Triples data adaptors
//! - [`index`]: in-memory occurrence-counted statement index

pub mod document;
pub mod error;
pub mod index;
pub mod json;
pub mod manager;
pub mod memory;
pub mod ntriples;
pub mod registry;
pub mod schema;
pub mod sqlite;
pub mod traits;

// Re-export key types for ergonomic use.
pub use document::{Access, Document, DocumentGuard, DocumentName};
pub use error::StoreError;
pub use index::{MemoryIndex, TriplePattern};
pub use json::JsonAdaptor;
pub use manager::{DocumentManager, StoreManager};
pub use memory::MemoryDocumentStore;
pub use ntriples::LineAdaptor;
pub use registry::HashRegistry;
pub use sqlite::{SqliteDocumentStore, SqliteRegistry};
pub use traits::{DataAdaptor, DocumentStore, GraphRegistry, TripleIndex};
