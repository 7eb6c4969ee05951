//! OWL 2 ontology - a mutable set of axioms plus header metadata.

use oxigraph::model::NamedNode;
use rustc_hash::FxHashSet;
use std::fmt;

use super::axiom::{Axiom, AxiomKind};
use super::model::{Annotation, AnnotationProperty};

/// Whether axiom enumeration follows the imports closure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Imports {
    #[default]
    Included,
    Excluded,
}

/// An OWL 2 ontology.
///
/// Axioms are held with set semantics: adding an axiom that is already
/// present changes nothing. Imported ontologies are owned by value and
/// only ever read through [`Imports::Included`].
#[derive(Debug, Clone, Default)]
pub struct Ontology {
    iri: Option<NamedNode>,
    version_iri: Option<NamedNode>,
    import_declarations: Vec<NamedNode>,
    imports: Vec<Ontology>,
    annotations: Vec<Annotation>,
    axioms: FxHashSet<Axiom>,
}

impl Ontology {
    pub fn new(iri: Option<NamedNode>) -> Self {
        Self {
            iri,
            ..Self::default()
        }
    }

    pub fn iri(&self) -> Option<&NamedNode> {
        self.iri.as_ref()
    }

    pub fn set_iri(&mut self, iri: Option<NamedNode>) {
        self.iri = iri;
    }

    pub fn version_iri(&self) -> Option<&NamedNode> {
        self.version_iri.as_ref()
    }

    pub fn set_version_iri(&mut self, iri: Option<NamedNode>) {
        self.version_iri = iri;
    }

    /// IRIs named by `owl:imports` in the header.
    pub fn import_declarations(&self) -> &[NamedNode] {
        &self.import_declarations
    }

    pub fn add_import_declaration(&mut self, iri: NamedNode) {
        if !self.import_declarations.contains(&iri) {
            self.import_declarations.push(iri);
        }
    }

    /// Attaches a loaded ontology to the imports closure, declaring its IRI.
    pub fn add_import(&mut self, imported: Ontology) {
        if let Some(iri) = imported.iri() {
            self.add_import_declaration(iri.clone());
        }
        self.imports.push(imported);
    }

    pub fn imports(&self) -> &[Ontology] {
        &self.imports
    }

    /// Ontology-level annotations from the header.
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn add_annotation(&mut self, annotation: Annotation) {
        if !self.annotations.contains(&annotation) {
            self.annotations.push(annotation);
        }
    }

    /// This ontology followed by its transitive imports, each visited once.
    pub fn import_closure(&self) -> Vec<&Ontology> {
        let mut closure: Vec<&Ontology> = vec![self];
        let mut cursor = 0;
        while cursor < closure.len() {
            let current = closure[cursor];
            for imported in &current.imports {
                let seen = closure
                    .iter()
                    .any(|o| std::ptr::eq(*o, imported) || (o.iri.is_some() && o.iri == imported.iri));
                if !seen {
                    closure.push(imported);
                }
            }
            cursor += 1;
        }
        closure
    }

    /// Enumerates axioms; with [`Imports::Included`] an axiom asserted in
    /// several ontologies of the closure is yielded once per ontology.
    pub fn axioms(&self, imports: Imports) -> impl Iterator<Item = &Axiom> + '_ {
        let sources = match imports {
            Imports::Included => self.import_closure(),
            Imports::Excluded => vec![self],
        };
        sources.into_iter().flat_map(|o| o.axioms.iter())
    }

    pub fn annotation_assertions(&self, imports: Imports) -> impl Iterator<Item = &Axiom> + '_ {
        self.axioms(imports)
            .filter(|axiom| matches!(axiom.kind(), AxiomKind::AnnotationAssertion { .. }))
    }

    /// Annotation assertions using `property`.
    pub fn annotation_assertions_for<'a>(
        &'a self,
        property: &'a AnnotationProperty,
        imports: Imports,
    ) -> impl Iterator<Item = &'a Axiom> + 'a {
        self.annotation_assertions(imports).filter(move |axiom| {
            matches!(axiom.kind(), AxiomKind::AnnotationAssertion { property: p, .. } if p == property)
        })
    }

    pub fn contains_axiom(&self, axiom: &Axiom, imports: Imports) -> bool {
        match imports {
            Imports::Excluded => self.axioms.contains(axiom),
            Imports::Included => self.import_closure().iter().any(|o| o.axioms.contains(axiom)),
        }
    }

    pub fn axiom_count(&self) -> usize {
        self.axioms.len()
    }

    pub fn logical_axiom_count(&self) -> usize {
        self.axioms.iter().filter(|a| a.is_logical()).count()
    }

    pub fn add_axiom(&mut self, axiom: Axiom) -> bool {
        self.axioms.insert(axiom)
    }

    /// Adds every axiom and returns how many were not already present.
    pub fn add_axioms(&mut self, axioms: impl IntoIterator<Item = Axiom>) -> usize {
        axioms.into_iter().map(|axiom| self.axioms.insert(axiom)).filter(|inserted| *inserted).count()
    }

    pub fn remove_axiom(&mut self, axiom: &Axiom) -> bool {
        self.axioms.remove(axiom)
    }

    /// Removes every axiom and returns how many were present.
    pub fn remove_axioms<'a>(&mut self, axioms: impl IntoIterator<Item = &'a Axiom>) -> usize {
        axioms.into_iter().filter(|axiom| self.axioms.remove(*axiom)).count()
    }

    /// Drops every asserted axiom; imports and header are kept.
    pub fn clear_axioms(&mut self) -> usize {
        let removed = self.axioms.len();
        self.axioms.clear();
        removed
    }
}

impl fmt::Display for Ontology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.iri {
            Some(iri) => write!(f, "Ontology({iri})")?,
            None => write!(f, "Ontology(anonymous)")?,
        }
        write!(f, " [{} axioms]", self.axioms.len())
    }
}
