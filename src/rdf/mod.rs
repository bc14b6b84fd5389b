//! RDF model layer
//!
//! Term types, the in-memory [`Model`] exchanged with the repository, prefix
//! mappings and the parsers/serializers used by import and export.
//!
//! # Example
//!
//! ```rust
//! use service_repository::rdf::{Model, NamedNode, Literal, Predicate, Triple};
//!
//! let mut model = Model::new();
//! model.prefixes_mut().set_prefix("foaf", "http://xmlns.com/foaf/0.1/");
//!
//! let subject = NamedNode::new("http://example.org/alice").unwrap();
//! let predicate = Predicate::new("http://xmlns.com/foaf/0.1/name").unwrap();
//! let object = Literal::new_simple_literal("Alice");
//!
//! assert!(model.insert(Triple::new(subject.into(), predicate, object.into())));
//! assert_eq!(model.len(), 1);
//! ```

mod model;
mod namespace;
mod serialization;
mod types;

pub use types::{
    BlankNode, Literal, NamedNode, Object, Predicate, RdfError, RdfResult, Subject, Triple,
    XSD_STRING,
};

pub use model::Model;

pub use namespace::PrefixMapping;

pub use serialization::{
    ParseError, ParseResult, RdfFormat, RdfParser, RdfSerializer, SerializeError,
    SerializeResult,
};
