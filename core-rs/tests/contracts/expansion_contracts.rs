// Expansion Contract Tests
//
// These tests pin the observable behaviour of `expand`: which templates fire,
// what provenance looks like, and how failures stay scoped to one template.
//
// **Problem**: a refactor quietly changes template selection or drops the
// provenance annotation from axiom identity
// **Solution**: contracts that exercise the public entry point only

use ontomacro_core::expand::{derived_from, select_templates};
use ontomacro_core::owl::{AnnotationSubject, Axiom, Class, Entity, Imports, Ontology};
use ontomacro_core::{expand, vocab, ExpandConfig, IriSet};
use oxigraph::model::{BlankNode, Literal, NamedNode};

fn iri(s: &str) -> NamedNode {
    NamedNode::new_unchecked(format!("http://example.org/{s}"))
}

fn template(owner: impl Into<AnnotationSubject>, query: &str) -> Axiom {
    Axiom::annotation_assertion(
        vocab::DEFINED_BY_CONSTRUCT.clone(),
        owner,
        Literal::new_simple_literal(query),
    )
}

fn subclass_query(target: &str) -> String {
    format!("CONSTRUCT {{ ?x rdfs:subClassOf <http://example.org/{target}> }} WHERE {{ ?x a owl:Class }}")
}

fn ontology_with(templates: &[(&str, &str)]) -> Ontology {
    let mut ontology = Ontology::new(Some(iri("onto")));
    ontology.add_axiom(Axiom::declaration(Entity::Class(Class::new(iri("Hand")))));
    for (owner, target) in templates {
        ontology.add_axiom(template(iri(owner), &subclass_query(target)));
    }
    ontology
}

fn scope(owners: &[&str]) -> IriSet {
    owners.iter().map(|o| iri(o)).collect()
}

/// WHY: Only literal values on the reserved property with an IRI subject are templates
/// REASON: Other annotations on the same subject are ordinary metadata
/// BREAKS: Arbitrary strings would be executed as queries
#[test]
fn only_reserved_property_literals_on_iris_are_templates() {
    let mut ontology = ontology_with(&[("T", "One")]);
    ontology.add_axiom(template(BlankNode::default(), &subclass_query("Anon")));
    ontology.add_axiom(Axiom::annotation_assertion(
        vocab::DEFINED_BY_CONSTRUCT.clone(),
        iri("IriValued"),
        iri("NotAQuery"),
    ));
    ontology.add_axiom(Axiom::annotation_assertion(
        vocab::WAS_DERIVED_FROM.clone(),
        iri("Other"),
        Literal::new_simple_literal(subclass_query("Other")),
    ));

    let selected = select_templates(&ontology, &IriSet::default(), &IriSet::default());
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].owner, iri("T"));
}

/// WHY: Include is an allow-list when non-empty, exclude always wins
/// REASON: Users narrow expansion to named macros on the command line
/// BREAKS: Excluded macros would fire when also listed for inclusion
#[test]
fn exclude_wins_over_include() {
    let ontology = ontology_with(&[("T1", "One"), ("T2", "Two"), ("T3", "Three")]);

    let all = select_templates(&ontology, &IriSet::default(), &IriSet::default());
    assert_eq!(all.len(), 3);

    let selected = select_templates(&ontology, &scope(&["T1", "T2"]), &scope(&["T2"]));
    let owners: Vec<_> = selected.iter().map(|t| t.owner.clone()).collect();
    assert_eq!(owners, vec![iri("T1")]);

    let none = select_templates(&ontology, &IriSet::default(), &scope(&["T1", "T2", "T3"]));
    assert!(none.is_empty());
}

/// WHY: One owner may carry several templates; each one fires
/// REASON: Templates are keyed by owner and query text, not owner alone
/// BREAKS: Multi-template macros would silently lose rules
#[test]
fn every_template_of_an_owner_fires() {
    let mut ontology = ontology_with(&[("T", "One")]);
    ontology.add_axiom(template(iri("T"), &subclass_query("Two")));

    let report = expand(&mut ontology, &ExpandConfig::default(), &IriSet::default(), &IriSet::default()).unwrap();
    assert_eq!(report.templates.len(), 2);
    assert!(ontology.contains_axiom(&Axiom::subclass_of(iri("Hand"), iri("One")), Imports::Excluded));
    assert!(ontology.contains_axiom(&Axiom::subclass_of(iri("Hand"), iri("Two")), Imports::Excluded));
}

/// WHY: Provenance is part of axiom identity
/// FORMAT: Annotation(prov:wasDerivedFrom <owner>)
/// REASON: Downstream tools find macro output by its derivation
/// BREAKS: Annotated output would collapse into the plain axiom
#[test]
fn provenance_names_the_template_owner() {
    let mut ontology = ontology_with(&[("T", "One")]);
    let config = ExpandConfig {
        annotate_expansion_axioms: true,
        ..ExpandConfig::default()
    };
    expand(&mut ontology, &config, &IriSet::default(), &IriSet::default()).unwrap();

    let plain = Axiom::subclass_of(iri("Hand"), iri("One"));
    let stamped = plain.annotated([derived_from(&iri("T"))]);
    assert_ne!(plain, stamped);
    assert!(ontology.contains_axiom(&stamped, Imports::Excluded));
    assert!(!ontology.contains_axiom(&plain, Imports::Excluded));
    assert_eq!(
        derived_from(&iri("T")).property.iri().as_str(),
        "http://www.w3.org/ns/prov#wasDerivedFrom"
    );
}

/// WHY: A broken template contributes nothing and never aborts the run
/// REASON: Macro libraries are shared; one bad rule must not block the rest
/// BREAKS: Expansion would become all-or-nothing
#[test]
fn failures_are_isolated_per_template() {
    let mut ontology = ontology_with(&[("A", "One"), ("C", "Three")]);
    ontology.add_axiom(template(iri("B"), "CONSTRUCT { ?x ?y"));
    ontology.add_axiom(template(iri("D"), "SELECT ?x WHERE { ?x a owl:Class }"));

    for parallel in [false, true] {
        let mut copy = ontology.clone();
        let config = ExpandConfig {
            parallel,
            ..ExpandConfig::default()
        };
        let report = expand(&mut copy, &config, &IriSet::default(), &IriSet::default()).unwrap();

        let failed: Vec<_> = report.failed().map(|o| o.owner.clone()).collect();
        assert_eq!(failed, vec![iri("B"), iri("D")]);
        assert_eq!(report.added, 2);
        assert!(copy.contains_axiom(&Axiom::subclass_of(iri("Hand"), iri("One")), Imports::Excluded));
        assert!(copy.contains_axiom(&Axiom::subclass_of(iri("Hand"), iri("Three")), Imports::Excluded));
    }
}

/// WHY: Augment keeps every input axiom, replace keeps only the expansion
/// REASON: create-new-ontology produces a standalone macro output module
/// BREAKS: Users would lose their ontology or get a polluted output
#[test]
fn augment_keeps_input_and_replace_drops_it() {
    let source = ontology_with(&[("T", "One")]);
    let before: Vec<Axiom> = source.axioms(Imports::Excluded).cloned().collect();

    let mut augmented = source.clone();
    expand(&mut augmented, &ExpandConfig::default(), &IriSet::default(), &IriSet::default()).unwrap();
    for axiom in &before {
        assert!(augmented.contains_axiom(axiom, Imports::Excluded));
    }
    assert_eq!(augmented.axiom_count(), before.len() + 1);

    let mut replaced = source.clone();
    let config = ExpandConfig {
        create_new_ontology: true,
        ..ExpandConfig::default()
    };
    let report = expand(&mut replaced, &config, &IriSet::default(), &IriSet::default()).unwrap();
    assert_eq!(report.removed, before.len());
    assert_eq!(replaced.axiom_count(), 1);
    assert!(replaced.contains_axiom(&Axiom::subclass_of(iri("Hand"), iri("One")), Imports::Excluded));
}

/// WHY: Expanding twice without provenance adds nothing the second time
/// REASON: Templates read the ontology, output is added with set semantics
/// BREAKS: Build pipelines that re-run expansion would grow the ontology
#[test]
fn plain_expansion_is_idempotent() {
    let mut ontology = ontology_with(&[("T", "One")]);
    let first = expand(&mut ontology, &ExpandConfig::default(), &IriSet::default(), &IriSet::default()).unwrap();
    let count = ontology.axiom_count();
    let second = expand(&mut ontology, &ExpandConfig::default(), &IriSet::default(), &IriSet::default()).unwrap();

    assert_eq!(first.added, 1);
    assert_eq!(second.added, 0);
    assert_eq!(ontology.axiom_count(), count);
}
