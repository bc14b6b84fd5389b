//! RDF serialization formats
//!
//! Supports:
//! - RDF/XML (also accepted under the `RDF/XML-ABBREV` label)
//! - Turtle (TTL)
//! - N-Triples (NT)
//! - N3, read through the Turtle parser

mod convert;
mod rdfxml;
mod turtle;

use super::Model;
use oxiri::Iri;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use std::fmt;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, warn};

/// RDF serialization format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RdfFormat {
    /// RDF/XML (.rdf), the default when no label is given
    #[default]
    RdfXml,
    /// Turtle format (.ttl)
    Turtle,
    /// N-Triples format (.nt)
    NTriples,
    /// Notation3 (.n3); only its Turtle subset is understood
    N3,
}

impl RdfFormat {
    /// Resolve an optional format label; `None` selects RDF/XML
    ///
    /// Labels are matched case-insensitively: `RDF/XML`, `RDF/XML-ABBREV`,
    /// `N-TRIPLE`, `N-TRIPLES`, `NT`, `TURTLE`, `TTL`, `N3`.
    pub fn from_label(label: Option<&str>) -> ParseResult<Self> {
        match label {
            None => Ok(Self::default()),
            Some(label) => label.parse(),
        }
    }

    /// Canonical label
    pub fn label(&self) -> &'static str {
        match self {
            RdfFormat::RdfXml => "RDF/XML",
            RdfFormat::Turtle => "TURTLE",
            RdfFormat::NTriples => "N-TRIPLE",
            RdfFormat::N3 => "N3",
        }
    }
}

impl FromStr for RdfFormat {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "RDF/XML" | "RDF/XML-ABBREV" | "RDFXML" => Ok(RdfFormat::RdfXml),
            "TURTLE" | "TTL" => Ok(RdfFormat::Turtle),
            "N-TRIPLE" | "N-TRIPLES" | "NTRIPLES" | "NT" => Ok(RdfFormat::NTriples),
            "N3" => Ok(RdfFormat::N3),
            _ => Err(ParseError::UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for RdfFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Parse errors
#[derive(Error, Debug)]
pub enum ParseError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Turtle, N3 or N-Triples syntax error
    #[error("Turtle parse error: {0}")]
    Turtle(#[from] rio_turtle::TurtleError),

    /// RDF/XML syntax error
    #[error("RDF/XML parse error: {0}")]
    RdfXml(#[from] rio_xml::RdfXmlError),

    /// A parsed term could not be represented
    #[error("Invalid term: {0}")]
    InvalidTerm(#[from] super::RdfError),

    /// Unsupported term kind (e.g. RDF-star quoted triples)
    #[error("Unsupported term: {0}")]
    UnsupportedTerm(String),

    /// Base IRI is not a valid IRI
    #[error("Invalid base IRI: {0}")]
    InvalidBaseIri(String),

    /// Unknown format label
    #[error("Unknown RDF format label: {0}")]
    UnknownFormat(String),
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Serialization errors
#[derive(Error, Debug)]
pub enum SerializeError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Output was not valid UTF-8
    #[error("Serialization error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

pub type SerializeResult<T> = Result<T, SerializeError>;

/// RDF parser
///
/// Blank node labels are local to one parsed document: every label is mapped
/// to a fresh, globally unique blank node, so two documents that both use
/// `_:b0` never share a node once stored.
pub struct RdfParser;

impl RdfParser {
    /// Parse RDF data from a string
    pub fn parse(input: &str, format: RdfFormat) -> ParseResult<Model> {
        Self::parse_reader(input.as_bytes(), format, None)
    }

    /// Parse RDF data from a buffered reader, resolving relative IRIs
    /// against `base_iri` when given
    pub fn parse_reader<R: BufRead>(
        reader: R,
        format: RdfFormat,
        base_iri: Option<&str>,
    ) -> ParseResult<Model> {
        let base_iri = base_iri
            .map(|iri| {
                Iri::parse(iri.to_string()).map_err(|e| ParseError::InvalidBaseIri(format!("{iri}: {e}")))
            })
            .transpose()?;

        match format {
            RdfFormat::Turtle | RdfFormat::N3 => turtle::parse_turtle(reader, base_iri),
            RdfFormat::NTriples => turtle::parse_ntriples(reader),
            RdfFormat::RdfXml => rdfxml::parse_rdfxml(reader, base_iri),
        }
    }

    /// Parse RDF data from a file; the file's `file://` URL is the base IRI
    pub fn parse_file(path: &Path, format: RdfFormat) -> ParseResult<Model> {
        let file = std::fs::File::open(path)?;
        let base_iri = file_base_iri(path);
        debug!("Parsing {} as {} (base {:?})", path.display(), format, base_iri);
        Self::parse_reader(BufReader::new(file), format, base_iri.as_deref())
    }
}

/// Bytes escaped in a `file:` URL path; `/` stays the segment separator
const PATH_ESCAPES: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b']')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Percent-encoded `file://` URL of a path
fn file_base_iri(path: &Path) -> Option<String> {
    let absolute = path.canonicalize().ok()?;
    let Some(raw) = absolute.to_str() else {
        warn!("No base IRI for non UTF-8 path {}", absolute.display());
        return None;
    };
    let iri = format!("file://{}", utf8_percent_encode(raw, PATH_ESCAPES));
    match Iri::parse(iri.as_str()) {
        Ok(_) => Some(iri),
        Err(e) => {
            warn!("No base IRI for {}: {}", absolute.display(), e);
            None
        }
    }
}

/// RDF serializer
pub struct RdfSerializer;

impl RdfSerializer {
    /// Serialize a model to a string
    pub fn serialize(model: &Model, format: RdfFormat) -> SerializeResult<String> {
        let output = Self::write(model, format, Vec::new())?;
        Ok(String::from_utf8(output)?)
    }

    /// Serialize a model into a writer, handing the writer back
    pub fn write<W: Write>(model: &Model, format: RdfFormat, writer: W) -> SerializeResult<W> {
        match format {
            RdfFormat::Turtle | RdfFormat::N3 => turtle::write_turtle(model, writer),
            RdfFormat::NTriples => turtle::write_ntriples(model, writer),
            RdfFormat::RdfXml => rdfxml::write_rdfxml(model, writer),
        }
    }
}
