//! Core error types for graphdoc-core.
//!
//! Uses `thiserror` for structured, matchable error variants covering
//! all anticipated failure modes in the core RDF data model.

use thiserror::Error;

/// Core errors produced by the graphdoc-core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An IRI failed validation (empty or missing a scheme separator).
    #[error("invalid IRI: '{iri}'")]
    InvalidIri { iri: String },

    /// A blank node label failed validation.
    #[error("invalid blank node label: '{label}'")]
    InvalidBlankLabel { label: String },

    /// A language tag failed validation.
    #[error("invalid language tag: '{tag}'")]
    InvalidLanguageTag { tag: String },

    /// A literal term was used in the subject position of a triple.
    #[error("literal terms cannot appear in the subject position")]
    LiteralSubject,

    /// A non-IRI term was used in the predicate position of a triple.
    #[error("predicate must be an IRI, got a {kind} term")]
    NonIriPredicate { kind: &'static str },
}
