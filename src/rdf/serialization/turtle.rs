//! Turtle and N-Triples implementation

use super::convert::{to_rio, TermConverter};
use super::{ParseError, ParseResult, SerializeResult};
use crate::rdf::Model;
use oxiri::Iri;
use rio_api::formatter::TriplesFormatter;
use rio_api::parser::TriplesParser;
use rio_turtle::{NTriplesFormatter, NTriplesParser, TurtleFormatter, TurtleParser};
use std::io::{BufRead, Write};

/// Parse a Turtle (or N3) document, keeping its `@prefix` declarations
pub(super) fn parse_turtle<R: BufRead>(reader: R, base_iri: Option<Iri<String>>) -> ParseResult<Model> {
    let mut parser = TurtleParser::new(reader, base_iri);
    let mut converter = TermConverter::default();
    let mut model = Model::new();

    parser.parse_all(&mut |t| -> Result<(), ParseError> {
        model.insert(converter.triple(t)?);
        Ok(())
    })?;

    for (prefix, iri) in parser.prefixes() {
        model.prefixes_mut().set_prefix(prefix.clone(), iri.clone());
    }

    Ok(model)
}

/// Parse an N-Triples document
pub(super) fn parse_ntriples<R: BufRead>(reader: R) -> ParseResult<Model> {
    let mut parser = NTriplesParser::new(reader);
    let mut converter = TermConverter::default();
    let mut model = Model::new();

    parser.parse_all(&mut |t| -> Result<(), ParseError> {
        model.insert(converter.triple(t)?);
        Ok(())
    })?;

    Ok(model)
}

/// Write a model as Turtle, prefix declarations first
pub(super) fn write_turtle<W: Write>(model: &Model, mut writer: W) -> SerializeResult<W> {
    for (prefix, iri) in model.prefixes().iter() {
        writeln!(writer, "@prefix {}: <{}> .", prefix, iri)?;
    }
    if !model.prefixes().is_empty() {
        writeln!(writer)?;
    }

    let mut formatter = TurtleFormatter::new(writer);
    for triple in model {
        formatter.format(&to_rio(triple))?;
    }
    Ok(formatter.finish()?)
}

/// Write a model as N-Triples
pub(super) fn write_ntriples<W: Write>(model: &Model, writer: W) -> SerializeResult<W> {
    let mut formatter = NTriplesFormatter::new(writer);
    for triple in model {
        formatter.format(&to_rio(triple))?;
    }
    Ok(formatter.finish()?)
}
