//! In-memory secondary index over statements.
//!
//! [`MemoryIndex`] is occurrence-counted: the same triple indexed from two
//! different graphs is held with count 2, so removing one graph's statements
//! never erases another graph's identical statements. Pattern lookups
//! consult per-position maps and pick the most selective bound position.

use std::collections::{HashMap, HashSet};

use graphdoc_core::term::Term;
use graphdoc_core::triple::Triple;

use crate::error::StoreError;
use crate::traits::TripleIndex;

/// A lookup pattern: each position is either bound to a term or a wildcard.
#[derive(Debug, Clone, Default)]
pub struct TriplePattern {
    pub subject: Option<Term>,
    pub predicate: Option<Term>,
    pub object: Option<Term>,
}

impl TriplePattern {
    /// The all-wildcard pattern.
    pub fn any() -> Self {
        TriplePattern::default()
    }

    fn matches(&self, triple: &Triple) -> bool {
        self.subject.as_ref().map_or(true, |s| *s == triple.subject)
            && self
                .predicate
                .as_ref()
                .map_or(true, |p| *p == triple.predicate)
            && self.object.as_ref().map_or(true, |o| *o == triple.object)
    }
}

/// Occurrence-counted triple index with subject/predicate/object maps.
#[derive(Debug, Default)]
pub struct MemoryIndex {
    counts: HashMap<Triple, usize>,
    by_subject: HashMap<Term, HashSet<Triple>>,
    by_predicate: HashMap<Term, HashSet<Triple>>,
    by_object: HashMap<Term, HashSet<Triple>>,
}

impl MemoryIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        MemoryIndex::default()
    }

    /// Number of distinct indexed triples.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns true if nothing is indexed.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Returns true if the triple is indexed at least once.
    pub fn contains(&self, triple: &Triple) -> bool {
        self.counts.contains_key(triple)
    }

    /// Occurrence count for a triple (0 if absent).
    pub fn count(&self, triple: &Triple) -> usize {
        self.counts.get(triple).copied().unwrap_or(0)
    }

    /// Answers a pattern query over the distinct indexed triples.
    pub fn lookup(&self, pattern: &TriplePattern) -> Vec<Triple> {
        // Seed from the most selective bound position's map; fall back to a
        // full scan only for the all-wildcard pattern.
        let candidates: Vec<&Triple> = if let Some(s) = &pattern.subject {
            self.by_subject
                .get(s)
                .map(|set| set.iter().collect())
                .unwrap_or_default()
        } else if let Some(o) = &pattern.object {
            self.by_object
                .get(o)
                .map(|set| set.iter().collect())
                .unwrap_or_default()
        } else if let Some(p) = &pattern.predicate {
            self.by_predicate
                .get(p)
                .map(|set| set.iter().collect())
                .unwrap_or_default()
        } else {
            self.counts.keys().collect()
        };
        candidates
            .into_iter()
            .filter(|t| pattern.matches(t))
            .cloned()
            .collect()
    }

    fn index_positions(&mut self, triple: &Triple) {
        self.by_subject
            .entry(triple.subject.clone())
            .or_default()
            .insert(triple.clone());
        self.by_predicate
            .entry(triple.predicate.clone())
            .or_default()
            .insert(triple.clone());
        self.by_object
            .entry(triple.object.clone())
            .or_default()
            .insert(triple.clone());
    }

    fn unindex_positions(&mut self, triple: &Triple) {
        for (map, key) in [
            (&mut self.by_subject, &triple.subject),
            (&mut self.by_predicate, &triple.predicate),
            (&mut self.by_object, &triple.object),
        ] {
            if let Some(set) = map.get_mut(key) {
                set.remove(triple);
                if set.is_empty() {
                    map.remove(key);
                }
            }
        }
    }
}

impl TripleIndex for MemoryIndex {
    fn add_to_index(&mut self, triples: &[Triple]) -> Result<(), StoreError> {
        for t in triples {
            let count = self.counts.entry(t.clone()).or_insert(0);
            *count += 1;
            if *count == 1 {
                self.index_positions(t);
            }
        }
        Ok(())
    }

    fn remove_from_index(&mut self, triples: &[Triple]) -> Result<(), StoreError> {
        for t in triples {
            if let Some(count) = self.counts.get_mut(t) {
                *count -= 1;
                if *count == 0 {
                    self.counts.remove(t);
                    self.unindex_positions(t);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triple(s: &str, p: &str, o: &str) -> Triple {
        Triple::new(
            Term::iri(format!("urn:{}", s)).unwrap(),
            Term::iri(format!("urn:{}", p)).unwrap(),
            Term::iri(format!("urn:{}", o)).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn add_remove_roundtrip() {
        let mut idx = MemoryIndex::new();
        let triples = vec![triple("s1", "p", "o1"), triple("s2", "p", "o2")];
        idx.add_to_index(&triples).unwrap();
        assert_eq!(idx.len(), 2);
        idx.remove_from_index(&triples).unwrap();
        assert!(idx.is_empty());
        assert!(idx.by_subject.is_empty());
        assert!(idx.by_predicate.is_empty());
        assert!(idx.by_object.is_empty());
    }

    #[test]
    fn occurrence_counting_across_graphs() {
        let mut idx = MemoryIndex::new();
        let shared = vec![triple("s", "p", "o")];
        // Indexed from two different graphs.
        idx.add_to_index(&shared).unwrap();
        idx.add_to_index(&shared).unwrap();
        assert_eq!(idx.count(&shared[0]), 2);

        // Removing one graph's statements leaves the other's intact.
        idx.remove_from_index(&shared).unwrap();
        assert!(idx.contains(&shared[0]));
        idx.remove_from_index(&shared).unwrap();
        assert!(!idx.contains(&shared[0]));
    }

    #[test]
    fn remove_absent_is_ignored() {
        let mut idx = MemoryIndex::new();
        idx.remove_from_index(&[triple("s", "p", "o")]).unwrap();
        assert!(idx.is_empty());
    }

    #[test]
    fn pattern_lookup_by_position() {
        let mut idx = MemoryIndex::new();
        idx.add_to_index(&[
            triple("s1", "p1", "o1"),
            triple("s1", "p2", "o2"),
            triple("s2", "p1", "o1"),
        ])
        .unwrap();

        let by_subject = idx.lookup(&TriplePattern {
            subject: Some(Term::iri("urn:s1").unwrap()),
            ..TriplePattern::any()
        });
        assert_eq!(by_subject.len(), 2);

        let by_pred_obj = idx.lookup(&TriplePattern {
            predicate: Some(Term::iri("urn:p1").unwrap()),
            object: Some(Term::iri("urn:o1").unwrap()),
            ..TriplePattern::any()
        });
        assert_eq!(by_pred_obj.len(), 2);

        let all = idx.lookup(&TriplePattern::any());
        assert_eq!(all.len(), 3);

        let none = idx.lookup(&TriplePattern {
            subject: Some(Term::iri("urn:missing").unwrap()),
            ..TriplePattern::any()
        });
        assert!(none.is_empty());
    }
}
