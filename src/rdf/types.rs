//! RDF terms and statements
//!
//! Owned wrappers over the oxrdf primitives. IRIs, blank node ids and language
//! tags are checked when a term is built, so every statement held by a
//! [`Model`](super::Model) can be written to the dataset and read back as the
//! same value.

use oxrdf::{BlankNode as OxBlankNode, Literal as OxLiteral, NamedNode as OxNamedNode};
use std::fmt;
use thiserror::Error;

/// Datatype of literals without a language tag or explicit type
pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";

/// Term construction errors
#[derive(Error, Debug)]
pub enum RdfError {
    #[error("Invalid IRI <{iri}>: {reason}")]
    InvalidIri { iri: String, reason: String },

    #[error("Invalid blank node id {id:?}: {reason}")]
    InvalidBlankNode { id: String, reason: String },

    #[error("Invalid language tag {tag:?}: {reason}")]
    InvalidLanguageTag { tag: String, reason: String },
}

pub type RdfResult<T> = Result<T, RdfError>;

/// Absolute IRI
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamedNode(OxNamedNode);

impl NamedNode {
    pub fn new(iri: &str) -> RdfResult<Self> {
        OxNamedNode::new(iri).map(Self).map_err(|e| RdfError::InvalidIri {
            iri: iri.to_string(),
            reason: e.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for NamedNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Blank node
///
/// [`BlankNode::new`] draws a random 128-bit id, so nodes created for
/// different documents never collide once they share a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct BlankNode(OxBlankNode);

impl BlankNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a blank node from a stored id
    pub fn from_id(id: &str) -> RdfResult<Self> {
        OxBlankNode::new(id).map(Self).map_err(|e| RdfError::InvalidBlankNode {
            id: id.to_string(),
            reason: e.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for BlankNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Literal: plain, language-tagged or typed
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Literal(OxLiteral);

impl Literal {
    pub fn new_simple_literal(value: impl Into<String>) -> Self {
        Self(OxLiteral::new_simple_literal(value))
    }

    pub fn new_language_tagged_literal(
        value: impl Into<String>,
        language: impl Into<String>,
    ) -> RdfResult<Self> {
        let language = language.into();
        OxLiteral::new_language_tagged_literal(value, language.clone())
            .map(Self)
            .map_err(|e| RdfError::InvalidLanguageTag {
                tag: language,
                reason: e.to_string(),
            })
    }

    /// Typed literal; `xsd:string` yields the same value as a simple literal
    pub fn new_typed_literal(value: impl Into<String>, datatype: NamedNode) -> Self {
        Self(OxLiteral::new_typed_literal(value, datatype.0))
    }

    pub fn value(&self) -> &str {
        self.0.value()
    }

    pub fn language(&self) -> Option<&str> {
        self.0.language()
    }

    /// Datatype IRI; `rdf:langString` for language-tagged literals
    pub fn datatype_iri(&self) -> &str {
        self.0.datatype().as_str()
    }

    /// True for `xsd:string` literals without a language tag
    pub fn is_plain(&self) -> bool {
        self.language().is_none() && self.datatype_iri() == XSD_STRING
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Statement subject
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Subject {
    NamedNode(NamedNode),
    BlankNode(BlankNode),
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::NamedNode(node) => node.fmt(f),
            Subject::BlankNode(node) => node.fmt(f),
        }
    }
}

impl From<NamedNode> for Subject {
    fn from(node: NamedNode) -> Self {
        Subject::NamedNode(node)
    }
}

impl From<BlankNode> for Subject {
    fn from(node: BlankNode) -> Self {
        Subject::BlankNode(node)
    }
}

/// Statement predicate, always an IRI
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Predicate(NamedNode);

impl Predicate {
    pub fn new(iri: &str) -> RdfResult<Self> {
        NamedNode::new(iri).map(Self)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Statement object
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Object {
    NamedNode(NamedNode),
    BlankNode(BlankNode),
    Literal(Literal),
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Object::NamedNode(node) => node.fmt(f),
            Object::BlankNode(node) => node.fmt(f),
            Object::Literal(literal) => literal.fmt(f),
        }
    }
}

impl From<NamedNode> for Object {
    fn from(node: NamedNode) -> Self {
        Object::NamedNode(node)
    }
}

impl From<BlankNode> for Object {
    fn from(node: BlankNode) -> Self {
        Object::BlankNode(node)
    }
}

impl From<Literal> for Object {
    fn from(literal: Literal) -> Self {
        Object::Literal(literal)
    }
}

/// One statement of a graph
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Triple {
    pub subject: Subject,
    pub predicate: Predicate,
    pub object: Object,
}

impl Triple {
    pub fn new(subject: Subject, predicate: Predicate, object: Object) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }
}
