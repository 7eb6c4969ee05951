//! Converts constructed triples back into axioms.

use oxigraph::model::vocab::rdf;
use oxigraph::model::{BlankNode, Graph, Triple};

use crate::errors::TemplateError;
use crate::owl::{AxiomKind, AxiomSet, Entity, Imports, Ontology, OntologyParser};
use crate::vocab::owl;

/// Parses template output with the source ontology's declarations in scope,
/// so a constructed `ex:a ex:partOf ex:b` becomes an object property
/// assertion when `ex:partOf` is declared as one in the ontology.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    declarations: Vec<Entity>,
}

impl Converter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Picks up the declarations of the ontology and its imports.
    pub fn for_ontology(ontology: &Ontology) -> Self {
        let declarations = ontology
            .axioms(Imports::Included)
            .filter_map(|axiom| match axiom.kind() {
                AxiomKind::Declaration(entity) => Some(entity.clone()),
                _ => None,
            })
            .collect();
        Self { declarations }
    }

    /// Anchors the triples with a fresh anonymous `owl:Ontology` header and
    /// parses them strictly. The header never yields an axiom.
    pub fn convert(&self, graph: Graph) -> Result<AxiomSet, TemplateError> {
        let mut graph = graph;
        graph.insert(&Triple::new(BlankNode::default(), rdf::TYPE, owl::ONTOLOGY));
        let ontology = OntologyParser::from_graph(&graph)
            .with_declarations(&self.declarations)
            .parse()?;
        Ok(ontology.axioms(Imports::Excluded).cloned().collect())
    }
}

/// Converts without any declarations in scope.
pub fn convert(graph: Graph) -> Result<AxiomSet, TemplateError> {
    Converter::new().convert(graph)
}
