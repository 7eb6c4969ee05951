//! Writes a combined result into the ontology.

use tracing::debug;

use super::merge::ResultSet;
use crate::errors::Result;
use crate::owl::{AxiomSet, Ontology};

/// Mediates every mutation of an ontology's axiom set.
///
/// Mutations are fallible so that persistent backends can report storage
/// failures; those are fatal to the operation.
pub trait AxiomStore {
    fn statement_count(&self) -> usize;

    /// Removes every asserted axiom, returning how many were removed.
    fn clear_all(&mut self) -> Result<usize>;

    /// Adds axioms with set semantics, returning how many were new.
    fn insert_all(&mut self, axioms: AxiomSet) -> Result<usize>;
}

impl AxiomStore for Ontology {
    fn statement_count(&self) -> usize {
        self.axiom_count()
    }

    fn clear_all(&mut self) -> Result<usize> {
        Ok(self.clear_axioms())
    }

    fn insert_all(&mut self, axioms: AxiomSet) -> Result<usize> {
        Ok(self.add_axioms(axioms))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Applied {
    pub removed: usize,
    pub added: usize,
}

/// Replace mode clears the store first; augment mode only adds.
pub fn apply<S: AxiomStore + ?Sized>(store: &mut S, result: ResultSet, replace: bool) -> Result<Applied> {
    let before = store.statement_count();
    let removed = if replace { store.clear_all()? } else { 0 };
    let added = store.insert_all(result.into_axioms())?;
    debug!(before, removed, added, after = store.statement_count(), replace, "Applied axioms");
    Ok(Applied { removed, added })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::owl::Axiom;
    use oxigraph::model::NamedNode;

    fn iri(s: &str) -> NamedNode {
        NamedNode::new_unchecked(format!("http://example.org/{s}"))
    }

    fn ontology() -> Ontology {
        let mut ontology = Ontology::new(None);
        ontology.add_axiom(Axiom::subclass_of(iri("A"), iri("B")));
        ontology.add_axiom(Axiom::subclass_of(iri("B"), iri("C")));
        ontology
    }

    fn result() -> ResultSet {
        [Axiom::subclass_of(iri("B"), iri("C")), Axiom::subclass_of(iri("C"), iri("D"))]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_augment_adds_only_new() {
        let mut ontology = ontology();
        let applied = apply(&mut ontology, result(), false).unwrap();
        assert_eq!(applied, Applied { removed: 0, added: 1 });
        assert_eq!(ontology.axiom_count(), 3);
    }

    #[test]
    fn test_replace_leaves_exactly_result() {
        let mut ontology = ontology();
        let applied = apply(&mut ontology, result(), true).unwrap();
        assert_eq!(applied, Applied { removed: 2, added: 2 });
        assert_eq!(ontology.axiom_count(), 2);
        assert!(!ontology.contains_axiom(&Axiom::subclass_of(iri("A"), iri("B")), crate::owl::Imports::Excluded));
    }

    #[test]
    fn test_replace_with_empty_result_clears() {
        let mut ontology = ontology();
        apply(&mut ontology, ResultSet::empty(), true).unwrap();
        assert_eq!(ontology.axiom_count(), 0);
    }
}
