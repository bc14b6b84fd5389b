//! Conversions between rio's borrowed model and our owned RDF types

use super::{ParseError, ParseResult};
use crate::rdf::{BlankNode, Literal, NamedNode, Object, Predicate, Subject, Triple};
use rio_api::model as rio;
use rustc_hash::FxHashMap;

/// Converts parsed rio triples, relabelling document-local blank nodes
#[derive(Default)]
pub(super) struct TermConverter {
    blank_nodes: FxHashMap<String, BlankNode>,
}

impl TermConverter {
    pub(super) fn triple(&mut self, t: rio::Triple<'_>) -> ParseResult<Triple> {
        let subject = self.subject(t.subject)?;
        let predicate = Predicate::new(t.predicate.iri)?;
        let object = self.object(t.object)?;
        Ok(Triple::new(subject, predicate, object))
    }

    fn subject(&mut self, s: rio::Subject<'_>) -> ParseResult<Subject> {
        match s {
            rio::Subject::NamedNode(n) => Ok(NamedNode::new(n.iri)?.into()),
            rio::Subject::BlankNode(b) => Ok(self.blank_node(b.id).into()),
            other => Err(ParseError::UnsupportedTerm(other.to_string())),
        }
    }

    fn object(&mut self, o: rio::Term<'_>) -> ParseResult<Object> {
        match o {
            rio::Term::NamedNode(n) => Ok(NamedNode::new(n.iri)?.into()),
            rio::Term::BlankNode(b) => Ok(self.blank_node(b.id).into()),
            rio::Term::Literal(l) => Ok(literal(l)?.into()),
            other => Err(ParseError::UnsupportedTerm(other.to_string())),
        }
    }

    fn blank_node(&mut self, id: &str) -> BlankNode {
        self.blank_nodes.entry(id.to_string()).or_default().clone()
    }
}

fn literal(l: rio::Literal<'_>) -> ParseResult<Literal> {
    Ok(match l {
        rio::Literal::Simple { value } => Literal::new_simple_literal(value),
        rio::Literal::LanguageTaggedString { value, language } => {
            Literal::new_language_tagged_literal(value, language)?
        }
        rio::Literal::Typed { value, datatype } => {
            Literal::new_typed_literal(value, NamedNode::new(datatype.iri)?)
        }
    })
}

/// Borrow a triple as a rio triple for the formatters
pub(super) fn to_rio(triple: &Triple) -> rio::Triple<'_> {
    let subject = match &triple.subject {
        Subject::NamedNode(n) => rio::Subject::NamedNode(rio::NamedNode { iri: n.as_str() }),
        Subject::BlankNode(b) => rio::Subject::BlankNode(rio::BlankNode { id: b.as_str() }),
    };

    let object = match &triple.object {
        Object::NamedNode(n) => rio::Term::NamedNode(rio::NamedNode { iri: n.as_str() }),
        Object::BlankNode(b) => rio::Term::BlankNode(rio::BlankNode { id: b.as_str() }),
        Object::Literal(l) => rio::Term::Literal(match l.language() {
            Some(language) => rio::Literal::LanguageTaggedString {
                value: l.value(),
                language,
            },
            None if l.is_plain() => rio::Literal::Simple { value: l.value() },
            None => rio::Literal::Typed {
                value: l.value(),
                datatype: rio::NamedNode {
                    iri: l.datatype_iri(),
                },
            },
        }),
    };

    rio::Triple {
        subject,
        predicate: rio::NamedNode {
            iri: triple.predicate.as_str(),
        },
        object,
    }
}
