//! OWL 2 structural model
//!
//! Entities, class expressions, annotated axioms and ontologies, plus the
//! RDF mapping in both directions. Backed by `oxigraph::model` terms so the
//! model and the SPARQL store share one term representation.

pub mod axiom;
pub mod error;
pub mod model;
pub mod ontology;
pub mod parser;
pub mod serializer;

pub use axiom::{Axiom, AxiomKind, PropertyCharacteristic};
pub use error::{OwlParseError, ParseErrorKind};
pub use model::{
    Annotation, AnnotationProperty, AnnotationSubject, AnnotationValue, Class, ClassExpression,
    DataProperty, Entity, Individual, ObjectProperty,
};
pub use ontology::{Imports, Ontology};
pub use parser::{OntologyParser, ParserConfig};
pub use serializer::OntologySerializer;

/// An unordered collection of axioms with set semantics.
pub type AxiomSet = rustc_hash::FxHashSet<Axiom>;
