// Axiom Store Contract Tests
//
// Every ontology mutation goes through `AxiomStore`. Storage failures are
// fatal and must reach the caller unchanged.

use ontomacro_core::errors::{ExpandError, Result};
use ontomacro_core::expand::{apply, AxiomStore};
use ontomacro_core::owl::{Axiom, AxiomSet};
use ontomacro_core::ResultSet;
use oxigraph::model::NamedNode;

fn iri(s: &str) -> NamedNode {
    NamedNode::new_unchecked(format!("http://example.org/{s}"))
}

/// Accepts reads, rejects writes.
struct ReadOnlyStore {
    axioms: AxiomSet,
}

impl AxiomStore for ReadOnlyStore {
    fn statement_count(&self) -> usize {
        self.axioms.len()
    }

    fn clear_all(&mut self) -> Result<usize> {
        Err(ExpandError::Mutation("store is read-only".to_string()))
    }

    fn insert_all(&mut self, _axioms: AxiomSet) -> Result<usize> {
        Err(ExpandError::Mutation("store is read-only".to_string()))
    }
}

fn result() -> ResultSet {
    [Axiom::subclass_of(iri("A"), iri("B"))].into_iter().collect()
}

/// WHY: A failed insert is an error, not an empty success
/// REASON: Callers report how many axioms were added
/// BREAKS: Silent data loss when the backend rejects writes
#[test]
fn insert_failure_propagates() {
    let mut store = ReadOnlyStore { axioms: AxiomSet::default() };
    let err = apply(&mut store, result(), false).unwrap_err();
    assert!(matches!(err, ExpandError::Mutation(ref m) if m == "store is read-only"));
}

/// WHY: Replace mode must not insert after a failed clear
/// REASON: The output would mix old and new axioms
/// BREAKS: create-new-ontology output would contain the input ontology
#[test]
fn clear_failure_stops_replace() {
    let mut store = ReadOnlyStore {
        axioms: [Axiom::subclass_of(iri("X"), iri("Y"))].into_iter().collect(),
    };
    let err = apply(&mut store, result(), true).unwrap_err();
    assert!(matches!(err, ExpandError::Mutation(_)));
    assert_eq!(store.statement_count(), 1);
}

/// WHY: Augment counts only new axioms
/// REASON: Reports distinguish produced from added
/// BREAKS: Re-running expansion would report phantom additions
#[test]
fn augment_counts_only_new_axioms() {
    let mut ontology = ontomacro_core::Ontology::new(None);
    ontology.add_axiom(Axiom::subclass_of(iri("A"), iri("B")));

    let more = result().combine([Axiom::subclass_of(iri("B"), iri("C"))].into_iter().collect());
    let applied = apply(&mut ontology, more, false).unwrap();

    assert_eq!(applied.added, 1);
    assert_eq!(applied.removed, 0);
    assert_eq!(ontology.axiom_count(), 2);
}
