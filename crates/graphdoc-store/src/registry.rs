//! Graph-to-document name registry.
//!
//! Document names are derived, not allocated: the blake3 hash of the graph
//! name's safe form. Derivation is deterministic, so resolution never needs
//! a lookup and two stores pointed at the same data agree on names. The
//! registry still keeps explicit register/unregister bookkeeping so that
//! the set of stored graphs is enumerable.

use std::collections::HashMap;

use graphdoc_core::name::GraphName;

use crate::document::DocumentName;
use crate::error::StoreError;
use crate::traits::GraphRegistry;

/// Derives the storage document name for a graph name.
///
/// blake3 of the safe form, hex-encoded. Deterministic: same graph name,
/// same document name, across processes and backends.
pub fn derive_document_name(graph: &GraphName) -> DocumentName {
    let hash = blake3::hash(graph.safe_form().as_bytes());
    DocumentName(hash.to_hex().to_string())
}

/// In-memory registry with hash-derived document names.
///
/// First-class backend for tests and ephemeral stores; the SQLite-backed
/// registry in [`crate::sqlite`] has identical semantics.
#[derive(Debug, Default)]
pub struct HashRegistry {
    forward: HashMap<GraphName, DocumentName>,
    reverse: HashMap<DocumentName, GraphName>,
}

impl HashRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        HashRegistry::default()
    }
}

impl GraphRegistry for HashRegistry {
    fn document_name(&self, graph: &GraphName) -> DocumentName {
        derive_document_name(graph)
    }

    fn register(&mut self, graph: &GraphName, doc: &DocumentName) -> Result<(), StoreError> {
        if let Some(existing) = self.forward.get(graph) {
            if existing != doc {
                return Err(StoreError::Registry {
                    reason: format!(
                        "graph '{}' already registered to document '{}'",
                        graph, existing
                    ),
                });
            }
            return Ok(());
        }
        if let Some(other) = self.reverse.get(doc) {
            return Err(StoreError::Registry {
                reason: format!("document '{}' already registered to graph '{}'", doc, other),
            });
        }
        self.forward.insert(graph.clone(), doc.clone());
        self.reverse.insert(doc.clone(), graph.clone());
        Ok(())
    }

    fn unregister(&mut self, graph: &GraphName) -> Result<(), StoreError> {
        if let Some(doc) = self.forward.remove(graph) {
            self.reverse.remove(&doc);
        }
        Ok(())
    }

    fn lookup(&self, graph: &GraphName) -> Result<Option<DocumentName>, StoreError> {
        Ok(self.forward.get(graph).cloned())
    }

    fn graphs(&self) -> Result<Vec<GraphName>, StoreError> {
        let mut names: Vec<GraphName> = self.forward.keys().cloned().collect();
        names.sort_by(|a, b| a.safe_form().cmp(b.safe_form()));
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivation_is_deterministic() {
        let g = GraphName::named("http://example.org/g");
        assert_eq!(derive_document_name(&g), derive_document_name(&g));
        assert_ne!(
            derive_document_name(&g),
            derive_document_name(&GraphName::Default)
        );
    }

    #[test]
    fn register_is_idempotent() {
        let mut reg = HashRegistry::new();
        let g = GraphName::named("urn:g");
        let doc = reg.document_name(&g);
        reg.register(&g, &doc).unwrap();
        reg.register(&g, &doc).unwrap();
        assert_eq!(reg.lookup(&g).unwrap(), Some(doc));
    }

    #[test]
    fn conflicting_registration_rejected() {
        let mut reg = HashRegistry::new();
        let g = GraphName::named("urn:g");
        let doc = reg.document_name(&g);
        reg.register(&g, &doc).unwrap();
        let other = DocumentName("somewhere-else".to_string());
        assert!(matches!(
            reg.register(&g, &other),
            Err(StoreError::Registry { .. })
        ));
    }

    #[test]
    fn unregister_unknown_is_noop() {
        let mut reg = HashRegistry::new();
        reg.unregister(&GraphName::named("urn:never")).unwrap();
    }

    #[test]
    fn graphs_lists_registered() {
        let mut reg = HashRegistry::new();
        let a = GraphName::named("urn:a");
        let b = GraphName::named("urn:b");
        let doc_a = reg.document_name(&a);
        let doc_b = reg.document_name(&b);
        reg.register(&a, &doc_a).unwrap();
        reg.register(&b, &doc_b).unwrap();
        assert_eq!(reg.graphs().unwrap(), vec![a.clone(), b.clone()]);

        reg.unregister(&a).unwrap();
        assert_eq!(reg.graphs().unwrap(), vec![b]);
    }
}
