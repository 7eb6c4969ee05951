/// Example: Expand a partOf macro and classify the result
///
/// Builds a small anatomy ontology whose `partOfMacro` annotation property is
/// defined by a CONSTRUCT template, expands it into existential restrictions,
/// then materializes the inferred class hierarchy.
///
/// Usage:
///   cargo run --example expand_macros
///   cargo run --example expand_macros -- out.ttl

use ontomacro_core::io::save_ontology;
use ontomacro_core::owl::{Axiom, Class, Entity, Imports, ObjectProperty};
use ontomacro_core::vocab;
use ontomacro_core::{expand, reason, ExpandConfig, IriSet, Ontology, ReasonOptions, StructuralReasonerFactory};
use oxigraph::model::{Literal, NamedNode};
use std::env;
use std::path::PathBuf;

const PART_OF_MACRO: &str = r#"
PREFIX ex: <http://example.org/>
CONSTRUCT {
    ?s rdfs:subClassOf [ a owl:Restriction ; owl:onProperty ex:partOf ; owl:someValuesFrom ?o ]
}
WHERE { ?s ex:partOfMacro ?o }
"#;

fn ex(local: &str) -> NamedNode {
    NamedNode::new_unchecked(format!("http://example.org/{local}"))
}

fn anatomy() -> Ontology {
    let mut ontology = Ontology::new(Some(ex("anatomy")));
    ontology.add_axiom(Axiom::declaration(Entity::ObjectProperty(ObjectProperty::new(ex("partOf")))));
    for class in ["Hand", "Arm", "Finger", "Limb"] {
        ontology.add_axiom(Axiom::declaration(Entity::Class(Class::new(ex(class)))));
    }
    ontology.add_axiom(Axiom::subclass_of(ex("Arm"), ex("Limb")));
    ontology.add_axiom(Axiom::annotation_assertion(
        vocab::DEFINED_BY_CONSTRUCT.clone(),
        ex("partOfMacro"),
        Literal::new_simple_literal(PART_OF_MACRO),
    ));

    let part_of = ontomacro_core::owl::AnnotationProperty::new(ex("partOfMacro"));
    ontology.add_axiom(Axiom::annotation_assertion(part_of.clone(), ex("Hand"), ex("Arm")));
    ontology.add_axiom(Axiom::annotation_assertion(part_of, ex("Finger"), ex("Hand")));
    ontology
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut ontology = anatomy();
    println!("Input: {} axioms", ontology.axiom_count());

    let config = ExpandConfig {
        annotate_expansion_axioms: true,
        ..ExpandConfig::default()
    };
    let report = expand(&mut ontology, &config, &IriSet::default(), &IriSet::default())?;
    for outcome in &report.templates {
        match &outcome.result {
            Ok(count) => println!("  {} -> {} axioms", outcome.owner, count),
            Err(e) => println!("  {} FAILED: {}", outcome.owner, e),
        }
    }
    println!("Expansion added {} axioms", report.added);

    let options = ReasonOptions {
        exclude_tautologies: true,
        ..ReasonOptions::default()
    };
    let reasoned = reason(&mut ontology, &StructuralReasonerFactory, &options)?;
    println!(
        "Reasoner '{}' added {} axioms, removed {} redundant",
        reasoned.reasoner, reasoned.added, reasoned.redundant_removed
    );

    println!();
    for axiom in ontology.axioms(Imports::Excluded).filter(|a| a.is_logical()) {
        println!("{axiom}");
    }

    if let Some(path) = env::args().nth(1).map(PathBuf::from) {
        save_ontology(&ontology, &path)?;
        println!("\nWrote {}", path.display());
    }
    Ok(())
}
