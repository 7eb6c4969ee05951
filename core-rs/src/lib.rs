//! # ontomacro core
//!
//! Ontology macro expansion. An ontology carries SPARQL CONSTRUCT templates
//! as `OMO_defined_by_construct` annotation values; expansion runs each
//! template over the ontology's RDF view, reads the constructed triples back
//! as OWL axioms and writes them into the ontology, optionally stamped with
//! `prov:wasDerivedFrom` the template owner.
//!
//! ## Pipeline
//!
//! ```text
//! Ontology ──► GraphView (oxigraph Store) ──► select templates
//!                                                   │
//!                 per template: execute ─► convert ─► annotate
//!                                                   │
//!                          combine (set union, rayon reduce)
//!                                                   │
//!                           apply (augment or replace) ──► Ontology
//! ```
//!
//! The same apply step backs [`reason::reason`], the uniform entry point for
//! pluggable reasoners.

pub mod config;
pub mod errors;
pub mod expand;
pub mod graph;
pub mod io;
pub mod owl;
pub mod reason;
pub mod vocab;

pub use config::{OmxConfig, PrefixMap};
pub use errors::{ExpandError, Result, TemplateError};
pub use expand::{expand, ExpandConfig, ExpansionReport, IriSet, QueryTemplate, ResultSet, TemplateOutcome};
pub use graph::GraphView;
pub use owl::{Axiom, AxiomKind, AxiomSet, Imports, Ontology};
pub use reason::{reason, AxiomGenerator, ReasonOptions, ReasonReport, Reasoner, ReasonerFactory, StructuralReasonerFactory};
