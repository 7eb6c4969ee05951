// Reasoner Contract Tests
//
// `reason` is the single entry point for every backend. These tests pin the
// guarantees callers build on, whatever the backend.

use ontomacro_core::errors::ExpandError;
use ontomacro_core::owl::{Axiom, AxiomKind, Imports, Ontology};
use ontomacro_core::{reason, AxiomGenerator, ReasonOptions, ReasonerFactory, StructuralReasonerFactory};
use oxigraph::model::NamedNode;

fn iri(s: &str) -> NamedNode {
    NamedNode::new_unchecked(format!("http://example.org/{s}"))
}

fn snapshot(ontology: &Ontology) -> Vec<String> {
    let mut axioms: Vec<String> = ontology.axioms(Imports::Excluded).map(|a| a.to_string()).collect();
    axioms.sort();
    axioms
}

/// WHY: Unsatisfiable classes abort before any mutation
/// REASON: Materializing from an incoherent ontology spreads owl:Nothing
/// BREAKS: Output would contain garbage subsumptions
#[test]
fn incoherent_ontology_is_left_untouched() {
    let mut ontology = Ontology::new(Some(iri("onto")));
    ontology.add_axiom(AxiomKind::DisjointClasses(vec![iri("A").into(), iri("B").into()]).into());
    ontology.add_axiom(Axiom::subclass_of(iri("C"), iri("A")));
    ontology.add_axiom(Axiom::subclass_of(iri("C"), iri("B")));
    ontology.add_axiom(Axiom::subclass_of(iri("A"), iri("B")));
    let before = snapshot(&ontology);

    let err = reason(&mut ontology, &StructuralReasonerFactory, &ReasonOptions::default()).unwrap_err();
    match err {
        ExpandError::UnsatisfiableClasses(iris) => assert_eq!(
            iris,
            vec!["http://example.org/A".to_string(), "http://example.org/C".to_string()]
        ),
        other => panic!("expected unsatisfiable classes, got {other}"),
    }
    assert_eq!(snapshot(&ontology), before);
}

/// WHY: Annotated subclass axioms survive redundancy removal
/// REASON: Annotations carry provenance a curator asked for
/// BREAKS: Macro output tagged with prov:wasDerivedFrom would vanish
#[test]
fn annotated_subclass_axioms_are_never_removed() {
    let mut ontology = Ontology::new(None);
    ontology.add_axiom(Axiom::subclass_of(iri("A"), iri("B")));
    ontology.add_axiom(Axiom::subclass_of(iri("B"), iri("C")));
    let tagged = Axiom::subclass_of(iri("A"), iri("C"))
        .annotated([ontomacro_core::expand::derived_from(&iri("Macro"))]);
    ontology.add_axiom(tagged.clone());

    let report = reason(&mut ontology, &StructuralReasonerFactory, &ReasonOptions::default()).unwrap();
    assert_eq!(report.redundant_removed, 0);
    assert!(ontology.contains_axiom(&tagged, Imports::Excluded));
}

/// WHY: Generators are named, parsed case-insensitively and rejected when unknown
/// FORMAT: space separated, e.g. "Subclass EquivalentClass"
/// REASON: Configuration files and flags share this vocabulary
/// BREAKS: Existing configuration files
#[test]
fn generator_names_are_stable() {
    let names: Vec<&str> = AxiomGenerator::ALL.iter().map(|g| g.name()).collect();
    assert!(names.contains(&"Subclass"));
    assert!(names.contains(&"EquivalentClass"));
    assert!(names.contains(&"ClassAssertion"));
    assert_eq!(
        AxiomGenerator::parse_list("subclass EQUIVALENTCLASS").unwrap(),
        vec![AxiomGenerator::SubClass, AxiomGenerator::EquivalentClass]
    );
    assert!(matches!(
        AxiomGenerator::parse_list("Subclass Bogus"),
        Err(ExpandError::UnknownAxiomGenerator(ref name)) if name == "Bogus"
    ));
}

/// WHY: Backends are addressed by name
/// REASON: The CLI and configuration select a backend with a string
/// BREAKS: Existing configuration files
#[test]
fn structural_backend_name() {
    assert_eq!(StructuralReasonerFactory.name(), "structural");
}
