//! Line-oriented N-Triples implementation of [`DataAdaptor`].
//!
//! One statement per line, N-Triples syntax. Append genuinely appends lines
//! to the body; delete filters lines out. Parsing covers the subset the
//! formatter emits: IRIs in angle brackets, `_:label` blank nodes, and
//! double-quoted literals with optional `@lang` or `^^<datatype>`.

use graphdoc_core::graph::Graph;
use graphdoc_core::name::GraphName;
use graphdoc_core::term::Term;
use graphdoc_core::triple::Triple;

use crate::document::Document;
use crate::error::StoreError;
use crate::traits::DataAdaptor;

/// N-Triples line codec.
#[derive(Debug, Default, Clone, Copy)]
pub struct LineAdaptor;

impl LineAdaptor {
    pub fn new() -> Self {
        LineAdaptor
    }
}

fn malformed(line: &str, reason: &str) -> StoreError {
    StoreError::MalformedDocument {
        reason: format!("{} in line: {}", reason, line),
    }
}

/// Parses one N-Triples line into a triple.
pub fn parse_line(line: &str) -> Result<Triple, StoreError> {
    let mut chars = line.trim().chars().peekable();

    let subject = parse_term(&mut chars, line)?;
    skip_spaces(&mut chars);
    let predicate = parse_term(&mut chars, line)?;
    skip_spaces(&mut chars);
    let object = parse_term(&mut chars, line)?;
    skip_spaces(&mut chars);

    if chars.next() != Some('.') {
        return Err(malformed(line, "missing terminating dot"));
    }
    skip_spaces(&mut chars);
    if chars.next().is_some() {
        return Err(malformed(line, "trailing content after dot"));
    }

    Triple::new(subject, predicate, object).map_err(StoreError::Model)
}

fn skip_spaces(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) {
    while matches!(chars.peek(), Some(c) if c.is_whitespace()) {
        chars.next();
    }
}

fn parse_term(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    line: &str,
) -> Result<Term, StoreError> {
    match chars.peek() {
        Some('<') => {
            chars.next();
            let mut iri = String::new();
            for c in chars.by_ref() {
                if c == '>' {
                    return Term::iri(iri).map_err(StoreError::Model);
                }
                iri.push(c);
            }
            Err(malformed(line, "unterminated IRI"))
        }
        Some('_') => {
            chars.next();
            if chars.next() != Some(':') {
                return Err(malformed(line, "malformed blank node label"));
            }
            let mut label = String::new();
            while let Some(&c) = chars.peek() {
                if c.is_whitespace() {
                    break;
                }
                label.push(c);
                chars.next();
            }
            Term::blank(label).map_err(StoreError::Model)
        }
        Some('"') => {
            chars.next();
            let mut lexical = String::new();
            loop {
                match chars.next() {
                    Some('\\') => match chars.next() {
                        Some('\\') => lexical.push('\\'),
                        Some('"') => lexical.push('"'),
                        Some('n') => lexical.push('\n'),
                        Some('r') => lexical.push('\r'),
                        Some('t') => lexical.push('\t'),
                        _ => return Err(malformed(line, "bad escape sequence")),
                    },
                    Some('"') => break,
                    Some(c) => lexical.push(c),
                    None => return Err(malformed(line, "unterminated literal")),
                }
            }
            match chars.peek() {
                Some('@') => {
                    chars.next();
                    let mut lang = String::new();
                    while let Some(&c) = chars.peek() {
                        if c.is_whitespace() {
                            break;
                        }
                        lang.push(c);
                        chars.next();
                    }
                    Term::literal_lang(lexical, lang).map_err(StoreError::Model)
                }
                Some('^') => {
                    chars.next();
                    if chars.next() != Some('^') || chars.next() != Some('<') {
                        return Err(malformed(line, "malformed datatype suffix"));
                    }
                    let mut dt = String::new();
                    for c in chars.by_ref() {
                        if c == '>' {
                            return Term::literal_typed(lexical, dt).map_err(StoreError::Model);
                        }
                        dt.push(c);
                    }
                    Err(malformed(line, "unterminated datatype IRI"))
                }
                _ => Ok(Term::literal(lexical)),
            }
        }
        _ => Err(malformed(line, "unrecognized term")),
    }
}

/// Parses a whole N-Triples body. Blank lines and `#` comments are skipped.
pub fn parse_document(text: &str) -> Result<Vec<Triple>, StoreError> {
    let mut triples = Vec::new();
    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        triples.push(parse_line(trimmed)?);
    }
    Ok(triples)
}

/// Formats triples as N-Triples text, one line each.
pub fn format_document(triples: &[Triple]) -> String {
    let mut out = String::new();
    for t in triples {
        out.push_str(&t.to_string());
        out.push('\n');
    }
    out
}

fn body_text(doc: &Document) -> Result<&str, StoreError> {
    std::str::from_utf8(doc.body()).map_err(|e| StoreError::MalformedDocument {
        reason: format!("document body is not UTF-8: {}", e),
    })
}

impl DataAdaptor for LineAdaptor {
    fn to_graph(&self, doc: &Document, graph: &mut Graph) -> Result<(), StoreError> {
        graph.assert_all(parse_document(body_text(doc)?)?);
        Ok(())
    }

    fn to_document(&self, graph: &Graph, doc: &mut Document) -> Result<(), StoreError> {
        doc.set_body(format_document(&graph.to_vec()).into_bytes());
        Ok(())
    }

    fn append_triples(
        &self,
        doc: &mut Document,
        triples: &[Triple],
    ) -> Result<Vec<Triple>, StoreError> {
        // Append lines rather than rewriting the whole body; skip statements
        // already present to keep document set semantics.
        let mut existing = Graph::new(GraphName::Default);
        existing.assert_all(parse_document(body_text(doc)?)?);

        let mut text = body_text(doc)?.to_string();
        if !text.is_empty() && !text.ends_with('\n') {
            text.push('\n');
        }
        let mut added = Vec::new();
        for t in triples {
            if existing.assert_triple(t.clone()) {
                text.push_str(&t.to_string());
                text.push('\n');
                added.push(t.clone());
            }
        }
        doc.set_body(text.into_bytes());
        Ok(added)
    }

    fn delete_triples(
        &self,
        doc: &mut Document,
        triples: &[Triple],
    ) -> Result<Vec<Triple>, StoreError> {
        let mut doomed = Graph::new(GraphName::Default);
        doomed.assert_all(triples.iter().cloned());

        let mut removed = Graph::new(GraphName::Default);
        let mut kept = String::new();
        for line in body_text(doc)?.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                kept.push_str(line);
                kept.push('\n');
                continue;
            }
            let t = parse_line(trimmed)?;
            if doomed.contains(&t) {
                removed.assert_triple(t);
            } else {
                kept.push_str(line);
                kept.push('\n');
            }
        }
        doc.set_body(kept.into_bytes());
        Ok(removed.to_vec())
    }
}
