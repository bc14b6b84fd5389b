//! In-memory RDF model
//!
//! A `Model` is what the repository stores and hands back: the statements of
//! one named graph, or of the union view, with their namespace prefixes.

use super::namespace::PrefixMapping;
use super::types::Triple;
use indexmap::IndexSet;

/// Set of triples plus a prefix map
///
/// Iteration follows insertion order, so writing out a freshly parsed model
/// keeps the statement order of its source document.
#[derive(Debug, Clone, Default)]
pub struct Model {
    triples: IndexSet<Triple>,
    prefixes: PrefixMapping,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_triples(triples: impl IntoIterator<Item = Triple>) -> Self {
        let mut model = Self::new();
        model.extend(triples);
        model
    }

    /// Add a statement; false if it was already present
    pub fn insert(&mut self, triple: Triple) -> bool {
        self.triples.insert(triple)
    }

    pub fn contains(&self, triple: &Triple) -> bool {
        self.triples.contains(triple)
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// Add every statement and prefix of `other`
    pub fn extend_from(&mut self, other: &Model) {
        self.extend(other.iter().cloned());
        self.prefixes.merge(&other.prefixes);
    }

    /// Same statements, compared exactly (blank nodes by id)
    pub fn same_triples(&self, other: &Model) -> bool {
        self.len() == other.len() && self.iter().all(|t| other.contains(t))
    }

    pub fn prefixes(&self) -> &PrefixMapping {
        &self.prefixes
    }

    pub fn prefixes_mut(&mut self) -> &mut PrefixMapping {
        &mut self.prefixes
    }
}

impl Extend<Triple> for Model {
    fn extend<T: IntoIterator<Item = Triple>>(&mut self, iter: T) {
        self.triples.extend(iter);
    }
}

impl<'a> IntoIterator for &'a Model {
    type Item = &'a Triple;
    type IntoIter = indexmap::set::Iter<'a, Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdf::types::{Literal, NamedNode, Predicate};

    fn endpoint(service: &str, url: &str) -> Triple {
        Triple::new(
            NamedNode::new(&format!("http://example.org/services/{service}"))
                .unwrap()
                .into(),
            Predicate::new("http://example.org/services/endpoint").unwrap(),
            Literal::new_simple_literal(url).into(),
        )
    }

    #[test]
    fn test_duplicate_statements_collapse() {
        let mut model = Model::new();

        assert!(model.insert(endpoint("geo", "http://api/geo")));
        assert!(!model.insert(endpoint("geo", "http://api/geo")));
        assert_eq!(model.len(), 1);
        assert!(model.contains(&endpoint("geo", "http://api/geo")));
    }

    #[test]
    fn test_keeps_document_order() {
        let model = Model::from_triples([endpoint("weather", "w"), endpoint("geo", "g")]);
        let order: Vec<_> = model.iter().cloned().collect();
        assert_eq!(order, vec![endpoint("weather", "w"), endpoint("geo", "g")]);
    }

    #[test]
    fn test_extend_from_unions_statements_and_prefixes() {
        let mut union = Model::from_triples([endpoint("geo", "g")]);
        union.prefixes_mut().set_prefix("svc", "http://example.org/services/");
        let mut other = Model::from_triples([endpoint("weather", "w"), endpoint("geo", "g")]);
        other.prefixes_mut().set_prefix("foaf", "http://xmlns.com/foaf/0.1/");

        union.extend_from(&other);

        assert_eq!(union.len(), 2);
        assert_eq!(union.prefixes().len(), 2);
        assert!(union.same_triples(&other));
        assert!(!union.same_triples(&Model::from_triples([endpoint("geo", "g")])));
    }
}
