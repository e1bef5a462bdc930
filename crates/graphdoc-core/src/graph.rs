//! In-memory RDF graphs.
//!
//! A [`Graph`] is a named, insertion-ordered set of triples. Graphs are
//! transient containers: they are built up per operation and persisted only
//! through their document projection, never directly.

use indexmap::IndexSet;

use crate::name::GraphName;
use crate::triple::Triple;

/// A named set of RDF statements.
///
/// Set semantics: asserting a triple twice has no effect. Iteration order is
/// insertion order, which keeps serialized output deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    name: GraphName,
    triples: IndexSet<Triple>,
}

impl Graph {
    /// Creates an empty graph with the given name.
    pub fn new(name: GraphName) -> Self {
        Graph {
            name,
            triples: IndexSet::new(),
        }
    }

    /// Creates an empty default (unnamed) graph.
    pub fn default_graph() -> Self {
        Graph::new(GraphName::Default)
    }

    /// The graph's logical name.
    pub fn name(&self) -> &GraphName {
        &self.name
    }

    /// Asserts one triple. Returns true if the triple was not already present.
    pub fn assert_triple(&mut self, triple: Triple) -> bool {
        self.triples.insert(triple)
    }

    /// Asserts every triple in the iterator.
    pub fn assert_all<T: IntoIterator<Item = Triple>>(&mut self, triples: T) {
        for t in triples {
            self.triples.insert(t);
        }
    }

    /// Retracts one triple. Returns true if the triple was present.
    pub fn retract_triple(&mut self, triple: &Triple) -> bool {
        self.triples.shift_remove(triple)
    }

    /// Retracts every triple in the slice.
    pub fn retract_all(&mut self, triples: &[Triple]) {
        for t in triples {
            self.triples.shift_remove(t);
        }
    }

    /// Returns true if the triple is present.
    pub fn contains(&self, triple: &Triple) -> bool {
        self.triples.contains(triple)
    }

    /// Number of distinct triples.
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    /// Returns true if the graph holds no triples.
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Iterates triples in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// Clones the triples into a vector, preserving insertion order.
    pub fn to_vec(&self) -> Vec<Triple> {
        self.triples.iter().cloned().collect()
    }

    /// Returns true if both graphs hold the same statement set, regardless
    /// of insertion order or graph name.
    pub fn same_statements(&self, other: &Graph) -> bool {
        self.triples.len() == other.triples.len()
            && self.triples.iter().all(|t| other.triples.contains(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::Term;

    fn triple(s: u32, p: u32, o: u32) -> Triple {
        Triple::new(
            Term::iri(format!("urn:s{}", s)).unwrap(),
            Term::iri(format!("urn:p{}", p)).unwrap(),
            Term::iri(format!("urn:o{}", o)).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn assert_is_set_semantics() {
        let mut g = Graph::default_graph();
        assert!(g.assert_triple(triple(1, 1, 1)));
        assert!(!g.assert_triple(triple(1, 1, 1)));
        assert_eq!(g.len(), 1);
    }

    #[test]
    fn retract_removes_only_present() {
        let mut g = Graph::default_graph();
        g.assert_triple(triple(1, 1, 1));
        assert!(g.retract_triple(&triple(1, 1, 1)));
        assert!(!g.retract_triple(&triple(1, 1, 1)));
        assert!(g.is_empty());
    }

    #[test]
    fn iteration_preserves_insertion_order() {
        let mut g = Graph::default_graph();
        g.assert_triple(triple(3, 3, 3));
        g.assert_triple(triple(1, 1, 1));
        g.assert_triple(triple(2, 2, 2));
        let order: Vec<Triple> = g.to_vec();
        assert_eq!(order, vec![triple(3, 3, 3), triple(1, 1, 1), triple(2, 2, 2)]);
    }

    #[test]
    fn same_statements_ignores_order() {
        let mut a = Graph::default_graph();
        a.assert_all([triple(1, 1, 1), triple(2, 2, 2)]);
        let mut b = Graph::new(GraphName::named("urn:other"));
        b.assert_all([triple(2, 2, 2), triple(1, 1, 1)]);
        assert!(a.same_statements(&b));

        b.assert_triple(triple(3, 3, 3));
        assert!(!a.same_statements(&b));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn arb_triples() -> impl Strategy<Value = Vec<Triple>> {
            proptest::collection::vec((0..5u32, 0..5u32, 0..5u32), 0..24)
                .prop_map(|ids| ids.into_iter().map(|(s, p, o)| triple(s, p, o)).collect())
        }

        proptest! {
            #[test]
            fn assert_then_retract_all_leaves_empty(triples in arb_triples()) {
                let mut g = Graph::default_graph();
                g.assert_all(triples.clone());
                g.retract_all(&triples);
                prop_assert!(g.is_empty());
            }

            #[test]
            fn asserted_triples_are_contained(triples in arb_triples()) {
                let mut g = Graph::default_graph();
                g.assert_all(triples.clone());
                for t in &triples {
                    prop_assert!(g.contains(t));
                }
                prop_assert!(g.len() <= triples.len());
            }

            #[test]
            fn assert_is_idempotent(triples in arb_triples()) {
                let mut once = Graph::default_graph();
                once.assert_all(triples.clone());
                let mut twice = Graph::default_graph();
                twice.assert_all(triples.clone());
                twice.assert_all(triples);
                prop_assert!(once.same_statements(&twice));
            }
        }
    }
}
