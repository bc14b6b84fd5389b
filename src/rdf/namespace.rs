//! Namespace prefixes of a model
//!
//! A graph keeps the `@prefix` declarations of the document it was imported
//! from. They are stored next to its triples and replaced with them.

use std::collections::BTreeMap;

/// Prefix → namespace IRI, ordered by prefix
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefixMapping {
    prefixes: BTreeMap<String, String>,
}

impl PrefixMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `prefix` to `iri`, replacing any earlier binding
    pub fn set_prefix(&mut self, prefix: impl Into<String>, iri: impl Into<String>) {
        self.prefixes.insert(prefix.into(), iri.into());
    }

    pub fn get_iri(&self, prefix: &str) -> Option<&str> {
        self.prefixes.get(prefix).map(String::as_str)
    }

    /// Copy the bindings of `other`; `other` wins when both bind a prefix
    pub fn merge(&mut self, other: &PrefixMapping) {
        self.prefixes
            .extend(other.prefixes.iter().map(|(p, i)| (p.clone(), i.clone())));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.prefixes.iter().map(|(p, i)| (p.as_str(), i.as_str()))
    }

    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rebinding_replaces() {
        let mut mapping = PrefixMapping::new();
        mapping.set_prefix("svc", "http://example.org/services/");
        mapping.set_prefix("svc", "http://example.org/v2/services/");

        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.get_iri("svc"), Some("http://example.org/v2/services/"));
        assert_eq!(mapping.get_iri("foaf"), None);
    }

    #[test]
    fn test_iter_is_sorted_by_prefix() {
        let mut mapping = PrefixMapping::new();
        mapping.set_prefix("xsd", "http://www.w3.org/2001/XMLSchema#");
        mapping.set_prefix("foaf", "http://xmlns.com/foaf/0.1/");

        let prefixes: Vec<_> = mapping.iter().map(|(p, _)| p).collect();
        assert_eq!(prefixes, vec!["foaf", "xsd"]);
    }

    #[test]
    fn test_merge_prefers_other() {
        let mut left = PrefixMapping::new();
        left.set_prefix("ex", "http://example.org/");
        left.set_prefix("a", "http://a.example/");
        let mut right = PrefixMapping::new();
        right.set_prefix("ex", "http://example.com/");

        left.merge(&right);
        assert_eq!(left.len(), 2);
        assert_eq!(left.get_iri("ex"), Some("http://example.com/"));
    }
}
