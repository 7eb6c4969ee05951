//! Template discovery.
//!
//! A template is an annotation assertion on the reserved
//! `OMO_defined_by_construct` property: its subject IRI names the template,
//! its literal value is the CONSTRUCT query. Query text is only checked
//! when the template runs.

use oxigraph::model::NamedNode;
use rustc_hash::FxHashSet;
use std::fmt;

use super::IriSet;
use crate::owl::{AnnotationSubject, AnnotationValue, AxiomKind, Imports, Ontology};
use crate::vocab;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryTemplate {
    /// Subject of the defining assertion; the filter key and provenance target.
    pub owner: NamedNode,
    pub query: String,
}

impl QueryTemplate {
    pub fn new(owner: NamedNode, query: impl Into<String>) -> Self {
        Self {
            owner,
            query: query.into(),
        }
    }
}

impl fmt::Display for QueryTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.owner)
    }
}

/// Selects the templates that fire.
///
/// Assertions from the whole imports closure are considered. Those with an
/// anonymous subject or a non-literal value are skipped. A non-empty
/// `include` is an allow-list and `exclude` always wins.
pub fn select_templates(ontology: &Ontology, include: &IriSet, exclude: &IriSet) -> Vec<QueryTemplate> {
    let mut seen = FxHashSet::default();
    let mut templates: Vec<QueryTemplate> = ontology
        .annotation_assertions_for(&vocab::DEFINED_BY_CONSTRUCT, Imports::Included)
        .filter_map(|axiom| match axiom.kind() {
            AxiomKind::AnnotationAssertion {
                subject: AnnotationSubject::Iri(owner),
                value: AnnotationValue::Literal(query),
                ..
            } => Some(QueryTemplate::new(owner.clone(), query.value())),
            _ => None,
        })
        .filter(|template| include.is_empty() || include.contains(&template.owner))
        .filter(|template| !exclude.contains(&template.owner))
        .filter(|template| seen.insert(template.clone()))
        .collect();
    templates.sort_by(|a, b| (a.owner.as_str(), &a.query).cmp(&(b.owner.as_str(), &b.query)));
    templates
}
