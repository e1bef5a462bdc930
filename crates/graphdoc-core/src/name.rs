//! Logical graph identifiers.
//!
//! [`GraphName`] distinguishes the unnamed default graph from named graphs.
//! Construction normalizes the identifier (whitespace trimmed); equality is
//! exact string equality after normalization. The "safe form" is the
//! canonical string used for registry lookups and document name derivation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Logical identifier for a graph: the default graph or a named graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GraphName {
    /// The unnamed default graph.
    Default,
    /// A graph identified by an IRI-like string.
    Named(String),
}

impl GraphName {
    /// Creates a graph name from an identifier string.
    ///
    /// Whitespace is trimmed; an empty identifier denotes the default graph.
    pub fn named(identifier: impl AsRef<str>) -> Self {
        let trimmed = identifier.as_ref().trim();
        if trimmed.is_empty() {
            GraphName::Default
        } else {
            GraphName::Named(trimmed.to_string())
        }
    }

    /// Canonical string form: empty for the default graph, the normalized
    /// identifier otherwise.
    pub fn safe_form(&self) -> &str {
        match self {
            GraphName::Default => "",
            GraphName::Named(iri) => iri,
        }
    }

    /// Reconstructs a graph name from its safe form.
    pub fn from_safe_form(safe: &str) -> Self {
        GraphName::named(safe)
    }

    /// Returns true for the default graph.
    pub fn is_default(&self) -> bool {
        matches!(self, GraphName::Default)
    }
}

impl fmt::Display for GraphName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphName::Default => write!(f, "(default)"),
            GraphName::Named(iri) => write!(f, "{}", iri),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_identifier_is_default() {
        assert_eq!(GraphName::named(""), GraphName::Default);
        assert_eq!(GraphName::named("   "), GraphName::Default);
        assert!(GraphName::named("").is_default());
    }

    #[test]
    fn normalization_trims_whitespace() {
        assert_eq!(
            GraphName::named("  http://example.org/g  "),
            GraphName::named("http://example.org/g")
        );
    }

    #[test]
    fn safe_form_roundtrip() {
        let name = GraphName::named("http://example.org/g");
        assert_eq!(GraphName::from_safe_form(name.safe_form()), name);
        assert_eq!(GraphName::from_safe_form(""), GraphName::Default);
    }

    #[test]
    fn display_forms() {
        assert_eq!(GraphName::Default.to_string(), "(default)");
        assert_eq!(
            GraphName::named("urn:g").to_string(),
            "urn:g"
        );
    }
}
