//! Integration tests for the reason entry point
//!
//! Covers classification through intersections, inference filtering
//! (external entities, duplicates, tautologies), inferred-axiom tagging and
//! the failure modes that stop reasoning before the ontology changes.

use ontomacro_core::errors::ExpandError;
use ontomacro_core::io::{load_ontology, load_with_imports};
use ontomacro_core::owl::{Annotation, Axiom, AxiomKind, Class, Imports, Ontology};
use ontomacro_core::reason::{reason, AxiomGenerator, ReasonOptions, StructuralReasonerFactory};
use ontomacro_core::vocab;
use oxigraph::model::{Literal, NamedNode};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const PREAMBLE: &str = r#"
@prefix ex: <http://example.org/> .
@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
"#;

/// `XA ≡ XB ⊓ XC`, so `XA ⊑ XB` and `XA ⊑ XC` are entailed.
const INTERSECTION: &str = r#"
<http://example.org/intersection> a owl:Ontology .
ex:XA a owl:Class ; owl:equivalentClass [ a owl:Class ; owl:intersectionOf ( ex:XB ex:XC ) ] .
ex:XB a owl:Class .
ex:XC a owl:Class .
"#;

fn ex(local: &str) -> NamedNode {
    NamedNode::new_unchecked(format!("http://example.org/{local}"))
}

fn write_ttl(dir: &TempDir, name: &str, body: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, format!("{PREAMBLE}\n{body}")).unwrap();
    path
}

fn load(body: &str) -> Ontology {
    let dir = TempDir::new().unwrap();
    load_ontology(&write_ttl(&dir, "onto.ttl", body)).unwrap()
}

fn with_intersection_import(dir: &TempDir) -> Ontology {
    let main = write_ttl(
        dir,
        "main.ttl",
        r#"
<http://example.org/main> a owl:Ontology ;
    owl:imports <http://example.org/intersection> .
ex:Y a owl:Class ; rdfs:subClassOf ex:Z .
"#,
    );
    let import = write_ttl(dir, "intersection.ttl", INTERSECTION);
    load_with_imports(&main, &[import]).unwrap()
}

#[test]
fn test_intersection_classification() {
    let mut ontology = load(INTERSECTION);
    let report = reason(&mut ontology, &StructuralReasonerFactory, &ReasonOptions::default()).unwrap();

    assert_eq!(report.reasoner, "structural");
    assert!(ontology.contains_axiom(&Axiom::subclass_of(ex("XA"), ex("XB")), Imports::Excluded));
    assert!(ontology.contains_axiom(&Axiom::subclass_of(ex("XA"), ex("XC")), Imports::Excluded));
}

#[test]
fn test_external_inferences_are_kept_by_default() {
    let dir = TempDir::new().unwrap();
    let mut ontology = with_intersection_import(&dir);
    reason(&mut ontology, &StructuralReasonerFactory, &ReasonOptions::default()).unwrap();

    assert!(ontology.contains_axiom(&Axiom::subclass_of(ex("XA"), ex("XB")), Imports::Excluded));
}

#[test]
fn test_external_inferences_excluded() {
    let dir = TempDir::new().unwrap();
    let mut ontology = with_intersection_import(&dir);
    let options = ReasonOptions {
        exclude_external_entities: true,
        ..ReasonOptions::default()
    };
    reason(&mut ontology, &StructuralReasonerFactory, &options).unwrap();

    assert!(!ontology.contains_axiom(&Axiom::subclass_of(ex("XA"), ex("XB")), Imports::Excluded));
    assert!(!ontology.contains_axiom(&Axiom::subclass_of(ex("XA"), ex("XC")), Imports::Excluded));
    assert!(ontology.contains_axiom(&Axiom::subclass_of(ex("Z"), Class::thing()), Imports::Excluded));
}

#[test]
fn test_annotated_inferences_skip_duplicates() {
    let mut ontology = load(
        r#"
<http://example.org/onto> a owl:Ontology .
ex:A rdfs:subClassOf ex:B .
ex:B rdfs:subClassOf ex:C .
"#,
    );
    let options = ReasonOptions {
        annotate_inferred_axioms: true,
        exclude_duplicate_axioms: true,
        exclude_tautologies: true,
        remove_redundant_subclass_axioms: false,
        ..ReasonOptions::default()
    };
    let report = reason(&mut ontology, &StructuralReasonerFactory, &options).unwrap();

    // A ⊑ B and B ⊑ C are asserted, C ⊑ owl:Thing is a tautology
    assert_eq!(report.added, 0);
    assert_eq!(ontology.axiom_count(), 2);
}

#[test]
fn test_inferred_axioms_are_tagged() {
    let mut ontology = load(INTERSECTION);
    let options = ReasonOptions {
        annotate_inferred_axioms: true,
        exclude_owl_thing: true,
        ..ReasonOptions::default()
    };
    reason(&mut ontology, &StructuralReasonerFactory, &options).unwrap();

    let tag = Annotation::new(vocab::IS_INFERRED.clone(), Literal::new_simple_literal("true"));
    let expected = Axiom::subclass_of(ex("XA"), ex("XB")).annotated([tag]);
    assert!(ontology.contains_axiom(&expected, Imports::Excluded));
    assert!(!ontology
        .axioms(Imports::Excluded)
        .any(|axiom| axiom.as_named_subclass().is_some_and(|(_, sup)| sup.is_thing())));
}

#[test]
fn test_multiple_generators() {
    let mut ontology = load(
        r#"
<http://example.org/onto> a owl:Ontology .
ex:A rdfs:subClassOf ex:B .
ex:B rdfs:subClassOf ex:A .
ex:i a ex:A .
"#,
    );
    let options = ReasonOptions {
        axiom_generators: AxiomGenerator::parse_list("EquivalentClass ClassAssertion").unwrap(),
        remove_redundant_subclass_axioms: false,
        ..ReasonOptions::default()
    };
    reason(&mut ontology, &StructuralReasonerFactory, &options).unwrap();

    let equivalent: Axiom = AxiomKind::EquivalentClasses(vec![ex("A").into(), ex("B").into()]).into();
    assert!(ontology.contains_axiom(&equivalent, Imports::Excluded));
    assert!(ontology.contains_axiom(&Axiom::class_assertion(ex("B"), ex("i")), Imports::Excluded));
}

#[test]
fn test_unsatisfiable_class_stops_reasoning() {
    let mut ontology = load(
        r#"
<http://example.org/onto> a owl:Ontology .
ex:A owl:disjointWith ex:B .
ex:C rdfs:subClassOf ex:A , ex:B .
"#,
    );
    let before = ontology.axiom_count();

    let err = reason(&mut ontology, &StructuralReasonerFactory, &ReasonOptions::default()).unwrap_err();
    assert_eq!(err.to_string(), "Ontology has unsatisfiable classes: http://example.org/C");
    assert_eq!(ontology.axiom_count(), before);
}

#[test]
fn test_inconsistent_ontology_stops_reasoning() {
    let mut ontology = load(
        r#"
<http://example.org/onto> a owl:Ontology .
ex:A owl:disjointWith ex:B .
ex:i a ex:A , ex:B .
"#,
    );
    let err = reason(&mut ontology, &StructuralReasonerFactory, &ReasonOptions::default()).unwrap_err();
    assert!(matches!(err, ExpandError::Inconsistent));
}

#[test]
fn test_redundant_told_subclass_removed() {
    let mut ontology = load(
        r#"
<http://example.org/onto> a owl:Ontology .
ex:A rdfs:subClassOf ex:B , ex:C .
ex:B rdfs:subClassOf ex:C .
"#,
    );
    let report = reason(&mut ontology, &StructuralReasonerFactory, &ReasonOptions::default()).unwrap();

    assert_eq!(report.redundant_removed, 1);
    assert!(!ontology.contains_axiom(&Axiom::subclass_of(ex("A"), ex("C")), Imports::Excluded));
    assert!(ontology.contains_axiom(&Axiom::subclass_of(ex("A"), ex("B")), Imports::Excluded));
    assert!(!ontology.contains_axiom(&Axiom::subclass_of(ex("A"), Class::thing()), Imports::Excluded));
}
