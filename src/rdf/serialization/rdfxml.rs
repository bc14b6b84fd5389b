//! RDF/XML implementation

use super::convert::{to_rio, TermConverter};
use super::{ParseError, ParseResult, SerializeResult};
use crate::rdf::Model;
use oxiri::Iri;
use rio_api::formatter::TriplesFormatter;
use rio_api::parser::TriplesParser;
use rio_xml::{RdfXmlFormatter, RdfXmlParser};
use std::io::{BufRead, Write};

/// Parse an RDF/XML document
///
/// rio does not expose the `xmlns` declarations of the document, so models
/// read from RDF/XML carry no prefixes.
pub(super) fn parse_rdfxml<R: BufRead>(reader: R, base_iri: Option<Iri<String>>) -> ParseResult<Model> {
    let mut parser = RdfXmlParser::new(reader, base_iri);
    let mut converter = TermConverter::default();
    let mut model = Model::new();

    parser.parse_all(&mut |t| -> Result<(), ParseError> {
        model.insert(converter.triple(t)?);
        Ok(())
    })?;

    Ok(model)
}

/// Write a model as RDF/XML
pub(super) fn write_rdfxml<W: Write>(model: &Model, writer: W) -> SerializeResult<W> {
    let mut formatter = RdfXmlFormatter::new(writer)?;
    for triple in model {
        formatter.format(&to_rio(triple))?;
    }
    Ok(formatter.finish()?)
}

#[cfg(test)]
mod tests {
    use crate::rdf::{RdfFormat, RdfParser, RdfSerializer};

    const SERVICE_RDF: &str = r#"<?xml version="1.0"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:svc="http://example.org/services/">
  <svc:Service rdf:about="http://example.org/services/geocoder">
    <svc:label xml:lang="en">Geocoder</svc:label>
    <svc:endpoint rdf:resource="http://example.org/api/geocode"/>
  </svc:Service>
</rdf:RDF>
"#;

    #[test]
    fn test_rdfxml_parse() {
        let model = RdfParser::parse(SERVICE_RDF, RdfFormat::RdfXml).unwrap();
        // rdf:type + label + endpoint
        assert_eq!(model.len(), 3);
        assert!(model.prefixes().is_empty());
    }

    #[test]
    fn test_rdfxml_malformed() {
        let result = RdfParser::parse("<rdf:RDF><unclosed>", RdfFormat::RdfXml);
        assert!(result.is_err());
    }

    #[test]
    fn test_rdfxml_roundtrip() {
        let model = RdfParser::parse(SERVICE_RDF, RdfFormat::RdfXml).unwrap();
        let output = RdfSerializer::serialize(&model, RdfFormat::RdfXml).unwrap();
        let reparsed = RdfParser::parse(&output, RdfFormat::RdfXml).unwrap();
        assert!(reparsed.same_triples(&model));
    }
}
