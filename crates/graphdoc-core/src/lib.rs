//! Core RDF data model: terms, triples, graphs and graph names.
//!
//! Everything here is storage-agnostic; persistence lives in
//! `graphdoc-store`.

pub mod error;
pub mod graph;
pub mod name;
pub mod term;
pub mod triple;

// Re-export commonly used types
pub use error::CoreError;
pub use graph::Graph;
pub use name::GraphName;
pub use term::Term;
pub use triple::Triple;
