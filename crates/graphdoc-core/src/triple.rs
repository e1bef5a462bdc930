//! RDF triples: one (subject, predicate, object) statement.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::term::Term;

/// One RDF statement.
///
/// Construction through [`Triple::new`] enforces position validity:
/// subjects are IRIs or blank nodes, predicates are IRIs only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
    pub subject: Term,
    pub predicate: Term,
    pub object: Term,
}

impl Triple {
    /// Creates a triple, validating term positions.
    pub fn new(subject: Term, predicate: Term, object: Term) -> Result<Self, CoreError> {
        if subject.is_literal() {
            return Err(CoreError::LiteralSubject);
        }
        if !predicate.is_iri() {
            return Err(CoreError::NonIriPredicate {
                kind: predicate.kind(),
            });
        }
        Ok(Triple {
            subject,
            predicate,
            object,
        })
    }
}

impl fmt::Display for Triple {
    /// Formats the triple as one N-Triples line (including the final dot).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
    }
}
