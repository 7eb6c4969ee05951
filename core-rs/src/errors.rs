//! Error types for ontomacro core

use thiserror::Error;

use crate::owl::OwlParseError;

/// Fatal errors: the operation stops and nothing further is applied.
#[derive(Error, Debug)]
pub enum ExpandError {
    #[error("Graph storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("OWL parse error: {0}")]
    Parse(#[from] OwlParseError),

    #[error("RDF syntax error: {0}")]
    RdfSyntax(String),

    #[error("Ontology mutation error: {0}")]
    Mutation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid IRI: {0}")]
    InvalidIri(String),

    #[error("Unsupported ontology format: {0}")]
    UnsupportedFormat(String),

    #[error("Ontology is inconsistent")]
    Inconsistent,

    #[error("Ontology has unsatisfiable classes: {}", .0.join(", "))]
    UnsatisfiableClasses(Vec<String>),

    #[error("Reasoner error: {0}")]
    Reasoner(String),

    #[error("Unknown axiom generator: {0}")]
    UnknownAxiomGenerator(String),
}

impl From<oxigraph::store::StorageError> for ExpandError {
    fn from(err: oxigraph::store::StorageError) -> Self {
        ExpandError::Storage(err.to_string())
    }
}

impl From<oxigraph::store::LoaderError> for ExpandError {
    fn from(err: oxigraph::store::LoaderError) -> Self {
        ExpandError::RdfSyntax(err.to_string())
    }
}

impl From<oxigraph::store::SerializerError> for ExpandError {
    fn from(err: oxigraph::store::SerializerError) -> Self {
        ExpandError::Storage(err.to_string())
    }
}

impl From<oxigraph::model::IriParseError> for ExpandError {
    fn from(err: oxigraph::model::IriParseError) -> Self {
        ExpandError::InvalidIri(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ExpandError>;

/// Failure scoped to a single expansion template.
///
/// Never escapes [`crate::expand::expand`]: the template contributes nothing
/// and the failure is reported in its outcome.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("query error: {0}")]
    Query(String),

    #[error("not a CONSTRUCT query")]
    NotConstruct,

    #[error("query exceeded {0:?}")]
    Timeout(std::time::Duration),

    #[error("result is not valid OWL: {0}")]
    Conversion(#[from] OwlParseError),
}

impl From<oxigraph::sparql::EvaluationError> for TemplateError {
    fn from(err: oxigraph::sparql::EvaluationError) -> Self {
        TemplateError::Query(err.to_string())
    }
}
