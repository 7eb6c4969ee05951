//! Integration tests for ontology documents on disk
//!
//! The axiom set must survive a write/read cycle through every supported
//! syntax, annotations on axioms included.

use ontomacro_core::errors::ExpandError;
use ontomacro_core::io::{format_for_path, load_ontology, save_ontology};
use ontomacro_core::owl::{Annotation, AnnotationProperty, Axiom, AxiomSet, ClassExpression, Imports, ObjectProperty, Ontology};
use ontomacro_core::vocab;
use oxigraph::io::RdfFormat;
use oxigraph::model::{Literal, NamedNode};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const SOURCE: &str = r#"
@prefix ex: <http://example.org/> .
@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix prov: <http://www.w3.org/ns/prov#> .

<http://example.org/onto> a owl:Ontology .
ex:partOf a owl:ObjectProperty , owl:TransitiveProperty .
ex:Hand a owl:Class ;
    rdfs:label "hand"@en ;
    rdfs:subClassOf [ a owl:Restriction ; owl:onProperty ex:partOf ; owl:someValuesFrom ex:Arm ] .
ex:Arm a owl:Class .
ex:Finger a owl:Class ; rdfs:subClassOf ex:Digit .
ex:Digit a owl:Class .

[ a owl:Axiom ;
  owl:annotatedSource ex:Finger ;
  owl:annotatedProperty rdfs:subClassOf ;
  owl:annotatedTarget ex:Digit ;
  prov:wasDerivedFrom ex:DigitMacro ] .
"#;

fn ex(local: &str) -> NamedNode {
    NamedNode::new_unchecked(format!("http://example.org/{local}"))
}

fn axiom_set(ontology: &Ontology) -> AxiomSet {
    ontology.axioms(Imports::Excluded).cloned().collect()
}

fn source(dir: &TempDir) -> Ontology {
    let path = dir.path().join("source.ttl");
    fs::write(&path, SOURCE).unwrap();
    load_ontology(&path).unwrap()
}

fn round_trip(ontology: &Ontology, path: &Path) -> Ontology {
    save_ontology(ontology, path).unwrap();
    load_ontology(path).unwrap()
}

#[test]
fn test_source_is_parsed_with_annotations() {
    let dir = TempDir::new().unwrap();
    let ontology = source(&dir);

    let tagged = Axiom::subclass_of(ex("Finger"), ex("Digit"))
        .annotated([Annotation::new(vocab::WAS_DERIVED_FROM.clone(), ex("DigitMacro"))]);
    assert!(ontology.contains_axiom(&tagged, Imports::Excluded));
    assert!(!ontology.contains_axiom(&Axiom::subclass_of(ex("Finger"), ex("Digit")), Imports::Excluded));

    let restriction = Axiom::subclass_of(
        ex("Hand"),
        ClassExpression::some(ObjectProperty::new(ex("partOf")), ex("Arm")),
    );
    assert!(ontology.contains_axiom(&restriction, Imports::Excluded));

    let label = Axiom::annotation_assertion(
        AnnotationProperty::new(NamedNode::new_unchecked("http://www.w3.org/2000/01/rdf-schema#label")),
        ex("Hand"),
        Literal::new_language_tagged_literal_unchecked("hand", "en"),
    );
    assert!(ontology.contains_axiom(&label, Imports::Excluded));
}

#[test]
fn test_round_trip_preserves_axioms_in_every_syntax() {
    let dir = TempDir::new().unwrap();
    let ontology = source(&dir);
    let expected = axiom_set(&ontology);

    for name in ["out.ttl", "out.nt", "out.owl", "out.rdf"] {
        let reloaded = round_trip(&ontology, &dir.path().join(name));
        assert_eq!(axiom_set(&reloaded), expected, "axioms changed through {name}");
        assert_eq!(reloaded.iri(), ontology.iri(), "ontology IRI changed through {name}");
    }
}

#[test]
fn test_turtle_output_uses_default_prefixes() {
    let dir = TempDir::new().unwrap();
    let ontology = source(&dir);
    let path = dir.path().join("out.ttl");
    save_ontology(&ontology, &path).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("@prefix owl:"));
    assert!(text.contains("owl:Class"));
}

#[test]
fn test_format_follows_extension() {
    assert_eq!(format_for_path(Path::new("a.ttl")).unwrap(), RdfFormat::Turtle);
    assert_eq!(format_for_path(Path::new("a.nt")).unwrap(), RdfFormat::NTriples);
    assert_eq!(format_for_path(Path::new("a.owl")).unwrap(), RdfFormat::RdfXml);
    assert_eq!(format_for_path(Path::new("A.OWL")).unwrap(), RdfFormat::RdfXml);
}

#[test]
fn test_unsupported_extension_is_rejected() {
    let dir = TempDir::new().unwrap();
    let ontology = source(&dir);
    let path = dir.path().join("out.obo");

    let err = save_ontology(&ontology, &path).unwrap_err();
    assert!(matches!(err, ExpandError::UnsupportedFormat(ref ext) if ext == "obo"));
    assert!(!path.exists());
}

#[test]
fn test_missing_input_is_an_io_error() {
    let err = load_ontology(Path::new("/nonexistent/onto.ttl")).unwrap_err();
    assert!(matches!(err, ExpandError::Io(ref e) if e.kind() == std::io::ErrorKind::NotFound));
}

#[test]
fn test_invalid_document_is_a_syntax_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.ttl");
    fs::write(&path, "@prefix ex: <http://example.org/> .\nex:A ex:b").unwrap();

    assert!(matches!(load_ontology(&path), Err(ExpandError::RdfSyntax(_))));
}
