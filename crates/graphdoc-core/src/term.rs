//! RDF terms: IRIs, blank nodes, and literals.
//!
//! [`Term`] is the single node type used in all three triple positions.
//! Position validity (no literal subjects, IRI-only predicates) is enforced
//! by [`crate::triple::Triple::new`], not here.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// One RDF term: an IRI, a blank node, or a literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Term {
    /// An absolute IRI.
    Iri(String),
    /// A blank node, identified by its label.
    Blank(String),
    /// A literal with optional language tag or datatype IRI.
    ///
    /// `language` and `datatype` are mutually exclusive; constructors
    /// guarantee at most one is set.
    Literal {
        lexical: String,
        language: Option<String>,
        datatype: Option<String>,
    },
}

impl Term {
    /// Creates an IRI term, validating that the IRI is non-empty and
    /// carries a scheme separator.
    pub fn iri(iri: impl Into<String>) -> Result<Self, CoreError> {
        let iri = iri.into();
        if iri.trim().is_empty() || !iri.contains(':') {
            return Err(CoreError::InvalidIri { iri });
        }
        Ok(Term::Iri(iri))
    }

    /// Creates a blank node term from a label.
    pub fn blank(label: impl Into<String>) -> Result<Self, CoreError> {
        let label = label.into();
        if label.is_empty() || label.chars().any(|c| c.is_whitespace()) {
            return Err(CoreError::InvalidBlankLabel { label });
        }
        Ok(Term::Blank(label))
    }

    /// Creates a plain literal term.
    pub fn literal(lexical: impl Into<String>) -> Self {
        Term::Literal {
            lexical: lexical.into(),
            language: None,
            datatype: None,
        }
    }

    /// Creates a language-tagged literal term.
    pub fn literal_lang(
        lexical: impl Into<String>,
        language: impl Into<String>,
    ) -> Result<Self, CoreError> {
        let language = language.into();
        if language.is_empty() || !language.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err(CoreError::InvalidLanguageTag { tag: language });
        }
        Ok(Term::Literal {
            lexical: lexical.into(),
            language: Some(language),
            datatype: None,
        })
    }

    /// Creates a datatyped literal term.
    pub fn literal_typed(
        lexical: impl Into<String>,
        datatype: impl Into<String>,
    ) -> Result<Self, CoreError> {
        let datatype = datatype.into();
        if datatype.trim().is_empty() || !datatype.contains(':') {
            return Err(CoreError::InvalidIri { iri: datatype });
        }
        Ok(Term::Literal {
            lexical: lexical.into(),
            language: None,
            datatype: Some(datatype),
        })
    }

    /// Returns true if this term is an IRI.
    pub fn is_iri(&self) -> bool {
        matches!(self, Term::Iri(_))
    }

    /// Returns true if this term is a blank node.
    pub fn is_blank(&self) -> bool {
        matches!(self, Term::Blank(_))
    }

    /// Returns true if this term is a literal.
    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Literal { .. })
    }

    /// Short name of the term kind, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Term::Iri(_) => "IRI",
            Term::Blank(_) => "blank node",
            Term::Literal { .. } => "literal",
        }
    }
}

/// Escapes a literal's lexical form for N-Triples output.
pub fn escape_lexical(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}

impl fmt::Display for Term {
    /// Formats the term in N-Triples syntax.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "<{}>", iri),
            Term::Blank(label) => write!(f, "_:{}", label),
            Term::Literal {
                lexical,
                language,
                datatype,
            } => {
                write!(f, "\"{}\"", escape_lexical(lexical))?;
                if let Some(lang) = language {
                    write!(f, "@{}", lang)?;
                } else if let Some(dt) = datatype {
                    write!(f, "^^<{}>", dt)?;
                }
                Ok(())
            }
        }
    }
}
