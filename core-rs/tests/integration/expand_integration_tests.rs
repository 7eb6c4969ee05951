//! Integration tests for macro expansion
//!
//! Ontologies are written as Turtle documents, loaded through the io layer
//! and expanded end to end:
//! - no-op expansion under set semantics
//! - provenance stamping
//! - per-template isolation of failures
//! - templates inherited from imports
//! - include / exclude scoping
//! - class patterns over entities that are used but never declared

use ontomacro_core::expand::{expand, ExpandConfig, IriSet};
use ontomacro_core::io::{load_ontology, load_with_imports, save_ontology};
use ontomacro_core::owl::{Annotation, Axiom, AxiomKind, Class, ClassExpression, Imports, ObjectProperty, Ontology};
use ontomacro_core::vocab;
use oxigraph::model::NamedNode;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const PREAMBLE: &str = r#"
@prefix ex: <http://example.org/> .
@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix obo: <http://purl.obolibrary.org/obo/> .
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
    let path = write_ttl(&dir, "onto.ttl", body);
    load_ontology(&path).unwrap()
}

fn no_scope() -> IriSet {
    IriSet::default()
}

const THING_TEMPLATE: &str = r#"
<http://example.org/onto> a owl:Ontology .
ex:A a owl:Thing .
ex:A obo:OMO_defined_by_construct "CONSTRUCT {?x a owl:Thing} WHERE {?x a owl:Thing}" .
"#;

#[test]
fn test_expansion_without_provenance_is_noop() {
    let mut ontology = load(THING_TEMPLATE);
    let before = ontology.axiom_count();
    assert_eq!(before, 2);

    let report = expand(&mut ontology, &ExpandConfig::default(), &no_scope(), &no_scope()).unwrap();

    assert_eq!(report.templates.len(), 1);
    assert!(report.templates[0].is_ok());
    assert_eq!(report.combined, 1);
    assert_eq!(report.added, 0);
    assert_eq!(ontology.axiom_count(), before);
}

#[test]
fn test_expansion_with_provenance_adds_annotated_axiom() {
    let mut ontology = load(THING_TEMPLATE);
    let config = ExpandConfig {
        annotate_expansion_axioms: true,
        ..ExpandConfig::default()
    };

    let report = expand(&mut ontology, &config, &no_scope(), &no_scope()).unwrap();
    assert_eq!(report.added, 1);
    assert_eq!(ontology.axiom_count(), 3);

    let plain = Axiom::class_assertion(Class::thing(), ex("A"));
    let annotated = plain.annotated([Annotation::new(vocab::WAS_DERIVED_FROM.clone(), ex("A"))]);
    assert!(ontology.contains_axiom(&plain, Imports::Excluded));
    assert!(ontology.contains_axiom(&annotated, Imports::Excluded));
}

#[test]
fn test_malformed_template_does_not_block_others() {
    let mut ontology = load(
        r#"
<http://example.org/onto> a owl:Ontology .
ex:Hand a owl:Class .
ex:Broken obo:OMO_defined_by_construct "CONSTRUCT { ?x a owl:Thing WHERE" .
ex:Good obo:OMO_defined_by_construct "CONSTRUCT { ?x rdfs:subClassOf <http://example.org/Part> } WHERE { ?x a owl:Class }" .
"#,
    );

    let report = expand(&mut ontology, &ExpandConfig::default(), &no_scope(), &no_scope()).unwrap();

    assert_eq!(report.templates.len(), 2);
    let failed: Vec<_> = report.failed().map(|o| o.owner.clone()).collect();
    assert_eq!(failed, vec![ex("Broken")]);
    assert_eq!(report.added, 1);
    assert!(ontology.contains_axiom(&Axiom::subclass_of(ex("Hand"), ex("Part")), Imports::Excluded));
}

#[test]
fn test_undeclared_classes_match_class_patterns() {
    let mut ontology = load(
        r#"
<http://example.org/onto> a owl:Ontology .
ex:Hand rdfs:subClassOf ex:Limb .
ex:Tag obo:OMO_defined_by_construct "CONSTRUCT { ?x rdfs:subClassOf <http://example.org/Tagged> } WHERE { ?x a owl:Class }" .
"#,
    );
    assert!(!ontology
        .axioms(Imports::Excluded)
        .any(|axiom| matches!(axiom.kind(), AxiomKind::Declaration(_))));

    let report = expand(&mut ontology, &ExpandConfig::default(), &no_scope(), &no_scope()).unwrap();

    assert!(report.templates[0].is_ok(), "{report:?}");
    assert!(ontology.contains_axiom(&Axiom::subclass_of(ex("Hand"), ex("Tagged")), Imports::Excluded));
    assert!(ontology.contains_axiom(&Axiom::subclass_of(ex("Limb"), ex("Tagged")), Imports::Excluded));
    assert!(!ontology.contains_axiom(&Axiom::subclass_of(Class::thing(), ex("Tagged")), Imports::Excluded));
}

#[test]
fn test_output_that_is_not_owl_is_reported() {
    let mut ontology = load(
        r#"
<http://example.org/onto> a owl:Ontology .
ex:Hand a owl:Class .
ex:Bad obo:OMO_defined_by_construct "CONSTRUCT { ?x rdfs:subClassOf \"not a class\" } WHERE { ?x a owl:Class }" .
"#,
    );
    let before = ontology.axiom_count();

    let report = expand(&mut ontology, &ExpandConfig::default(), &no_scope(), &no_scope()).unwrap();
    assert_eq!(report.failed().count(), 1);
    assert_eq!(ontology.axiom_count(), before);
}

#[test]
fn test_macro_expands_to_restriction() {
    let mut ontology = load(
        r#"
<http://example.org/onto> a owl:Ontology .
ex:partOf a owl:ObjectProperty .
ex:Hand a owl:Class .
ex:Body a owl:Class .
ex:partOfMacro a owl:AnnotationProperty ;
    obo:OMO_defined_by_construct """
        CONSTRUCT {
            ?s rdfs:subClassOf [ a owl:Restriction ;
                                 owl:onProperty ex:partOf ;
                                 owl:someValuesFrom ?o ]
        }
        WHERE { ?s ex:partOfMacro ?o }
    """ .
ex:Hand ex:partOfMacro ex:Body .
"#,
    );
    let config = ExpandConfig {
        prefixes: [("ex".to_string(), "http://example.org/".to_string())].into_iter().collect(),
        ..ExpandConfig::default()
    };

    let report = expand(&mut ontology, &config, &no_scope(), &no_scope()).unwrap();
    assert_eq!(report.added, 1, "{report:?}");

    let expected = Axiom::subclass_of(
        ex("Hand"),
        ClassExpression::some(ObjectProperty::new(ex("partOf")), ex("Body")),
    );
    assert!(ontology.contains_axiom(&expected, Imports::Excluded));
}

#[test]
fn test_templates_in_imports_run_against_merged_graph() {
    let dir = TempDir::new().unwrap();
    let main = write_ttl(
        &dir,
        "main.ttl",
        r#"
<http://example.org/main> a owl:Ontology ;
    owl:imports <http://example.org/macros> .
ex:Finger a owl:Class .
"#,
    );
    let macros = write_ttl(
        &dir,
        "macros.ttl",
        r#"
<http://example.org/macros> a owl:Ontology .
ex:Tag obo:OMO_defined_by_construct "CONSTRUCT { ?x rdfs:subClassOf <http://example.org/Tagged> } WHERE { ?x a owl:Class }" .
"#,
    );

    let mut ontology = load_with_imports(&main, &[macros]).unwrap();
    let report = expand(&mut ontology, &ExpandConfig::default(), &no_scope(), &no_scope()).unwrap();

    assert_eq!(report.templates.len(), 1);
    assert!(ontology.contains_axiom(&Axiom::subclass_of(ex("Finger"), ex("Tagged")), Imports::Excluded));
    assert!(!ontology.imports()[0].contains_axiom(&Axiom::subclass_of(ex("Finger"), ex("Tagged")), Imports::Excluded));
}

#[test]
fn test_include_and_exclude_scope_templates() {
    let body = r#"
<http://example.org/onto> a owl:Ontology .
ex:Hand a owl:Class .
ex:T1 obo:OMO_defined_by_construct "CONSTRUCT { ?x rdfs:subClassOf <http://example.org/One> } WHERE { ?x a owl:Class }" .
ex:T2 obo:OMO_defined_by_construct "CONSTRUCT { ?x rdfs:subClassOf <http://example.org/Two> } WHERE { ?x a owl:Class }" .
"#;
    let include: IriSet = [ex("T1"), ex("T2")].into_iter().collect();
    let exclude: IriSet = [ex("T2")].into_iter().collect();

    let mut ontology = load(body);
    let report = expand(&mut ontology, &ExpandConfig::default(), &include, &exclude).unwrap();
    assert_eq!(report.templates.len(), 1);
    assert_eq!(report.templates[0].owner, ex("T1"));
    assert!(ontology.contains_axiom(&Axiom::subclass_of(ex("Hand"), ex("One")), Imports::Excluded));
    assert!(!ontology.contains_axiom(&Axiom::subclass_of(ex("Hand"), ex("Two")), Imports::Excluded));
}

#[test]
fn test_create_new_ontology_round_trips_through_file() {
    let dir = TempDir::new().unwrap();
    let input = write_ttl(
        &dir,
        "in.ttl",
        r#"
<http://example.org/onto> a owl:Ontology .
ex:Hand a owl:Class .
ex:T obo:OMO_defined_by_construct "CONSTRUCT { ?x rdfs:subClassOf <http://example.org/Limb> } WHERE { ?x a owl:Class }" .
"#,
    );
    let mut ontology = load_ontology(&input).unwrap();
    let config = ExpandConfig {
        create_new_ontology: true,
        annotate_expansion_axioms: true,
        parallel: true,
        ..ExpandConfig::default()
    };
    let report = expand(&mut ontology, &config, &no_scope(), &no_scope()).unwrap();
    assert_eq!(report.removed, 2);
    assert_eq!(ontology.axiom_count(), 1);

    let output = dir.path().join("out.ttl");
    save_ontology(&ontology, &output).unwrap();
    let reloaded = load_ontology(&output).unwrap();

    let expected = Axiom::subclass_of(ex("Hand"), ex("Limb"))
        .annotated([Annotation::new(vocab::WAS_DERIVED_FROM.clone(), ex("T"))]);
    assert_eq!(reloaded.axiom_count(), 1);
    assert!(reloaded.contains_axiom(&expected, Imports::Excluded));
    assert!(matches!(
        reloaded.axioms(Imports::Excluded).next().map(Axiom::kind),
        Some(AxiomKind::SubClassOf { .. })
    ));
}
