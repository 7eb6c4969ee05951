//! Parse errors raised while mapping RDF triples to axioms.

use thiserror::Error;

/// What went wrong while reading a graph as OWL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// No `rdf:type owl:Ontology` triple anchors the graph.
    MissingOntologyHeader,
    /// A literal sits where a class, property or individual is required.
    UnexpectedLiteral,
    /// A restriction lacks `owl:onProperty` or its filler.
    MalformedRestriction,
    /// An RDF list is cyclic, unterminated or too long.
    MalformedList,
    /// An anonymous expression, list or reification node nothing refers to.
    DanglingExpression,
    /// An `owl:Axiom` node without a matching annotated triple.
    MalformedReification,
    /// A well-formed RDF shape outside the supported OWL subset.
    UnsupportedConstruct,
    /// Nested anonymous expressions exceed the configured depth.
    DepthLimitExceeded,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind:?}: {message}")]
pub struct OwlParseError {
    kind: ParseErrorKind,
    message: String,
}

impl OwlParseError {
    pub fn new(kind: ParseErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ParseErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
