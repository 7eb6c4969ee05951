//! `prov:wasDerivedFrom` stamping of template output.

use oxigraph::model::NamedNode;

use crate::owl::{Annotation, AxiomSet};
use crate::vocab;

pub fn derived_from(owner: &NamedNode) -> Annotation {
    Annotation::new(vocab::WAS_DERIVED_FROM.clone(), owner.clone())
}

/// Adds `derived_from(owner)` to every axiom when enabled, otherwise hands
/// the set back untouched.
///
/// The annotation is part of axiom identity: a stamped axiom and its
/// unstamped counterpart are distinct members of any set.
pub fn annotate(axioms: AxiomSet, owner: &NamedNode, enabled: bool) -> AxiomSet {
    if !enabled {
        return axioms;
    }
    let annotation = derived_from(owner);
    axioms
        .into_iter()
        .map(|axiom| axiom.annotated([annotation.clone()]))
        .collect()
}
