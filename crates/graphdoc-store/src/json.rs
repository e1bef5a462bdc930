//! JSON implementation of [`DataAdaptor`].
//!
//! The document body is a JSON array of triples (serde representation of
//! [`Triple`]). Incremental append/delete decode the body, adjust the
//! statement set, and re-encode.

use graphdoc_core::graph::Graph;
use graphdoc_core::name::GraphName;
use graphdoc_core::triple::Triple;

use crate::document::Document;
use crate::error::StoreError;
use crate::traits::DataAdaptor;

/// JSON array-of-triples codec.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonAdaptor;

impl JsonAdaptor {
    pub fn new() -> Self {
        JsonAdaptor
    }

    fn decode(&self, doc: &Document) -> Result<Vec<Triple>, StoreError> {
        if doc.body().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_slice(doc.body())?)
    }

    fn encode(&self, triples: &[Triple], doc: &mut Document) -> Result<(), StoreError> {
        doc.set_body(serde_json::to_vec(triples)?);
        Ok(())
    }
}

impl DataAdaptor for JsonAdaptor {
    fn to_graph(&self, doc: &Document, graph: &mut Graph) -> Result<(), StoreError> {
        graph.assert_all(self.decode(doc)?);
        Ok(())
    }

    fn to_document(&self, graph: &Graph, doc: &mut Document) -> Result<(), StoreError> {
        self.encode(&graph.to_vec(), doc)
    }

    fn append_triples(
        &self,
        doc: &mut Document,
        triples: &[Triple],
    ) -> Result<Vec<Triple>, StoreError> {
        let mut current = Graph::new(GraphName::Default);
        current.assert_all(self.decode(doc)?);
        let mut added = Vec::new();
        for t in triples {
            if current.assert_triple(t.clone()) {
                added.push(t.clone());
            }
        }
        self.encode(&current.to_vec(), doc)?;
        Ok(added)
    }

    fn delete_triples(
        &self,
        doc: &mut Document,
        triples: &[Triple],
    ) -> Result<Vec<Triple>, StoreError> {
        let mut current = Graph::new(GraphName::Default);
        current.assert_all(self.decode(doc)?);
        let mut removed = Vec::new();
        for t in triples {
            if current.retract_triple(t) {
                removed.push(t.clone());
            }
        }
        self.encode(&current.to_vec(), doc)?;
        Ok(removed)
    }
}
