//! Vocabulary constants
//!
//! OWL terms used by the RDF mapping, plus the reserved annotation
//! properties that drive expansion, provenance and inference tagging.
//! Reserved properties are process-wide read-only values built once.

use oxigraph::model::{NamedNode, NamedNodeRef};
use once_cell::sync::Lazy;
use std::collections::BTreeMap;

use crate::owl::AnnotationProperty;

/// Annotation property whose literal values are SPARQL CONSTRUCT templates.
pub const DEFINED_BY_CONSTRUCT_IRI: &str = "http://purl.obolibrary.org/obo/OMO_defined_by_construct";

/// PROV-O derivation property used to tag expansion output.
pub const WAS_DERIVED_FROM_IRI: &str = "http://www.w3.org/ns/prov#wasDerivedFrom";

/// oboInOwl flag attached to reasoner output.
pub const IS_INFERRED_IRI: &str = "http://www.geneontology.org/formats/oboInOwl#is_inferred";

pub static DEFINED_BY_CONSTRUCT: Lazy<AnnotationProperty> =
    Lazy::new(|| AnnotationProperty::new(NamedNode::new_unchecked(DEFINED_BY_CONSTRUCT_IRI)));

pub static WAS_DERIVED_FROM: Lazy<AnnotationProperty> =
    Lazy::new(|| AnnotationProperty::new(NamedNode::new_unchecked(WAS_DERIVED_FROM_IRI)));

pub static IS_INFERRED: Lazy<AnnotationProperty> =
    Lazy::new(|| AnnotationProperty::new(NamedNode::new_unchecked(IS_INFERRED_IRI)));

/// Prefixes every template and command line term may use without declaring them.
pub static DEFAULT_PREFIXES: Lazy<BTreeMap<&'static str, &'static str>> = Lazy::new(|| {
    BTreeMap::from([
        ("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
        ("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
        ("owl", "http://www.w3.org/2002/07/owl#"),
        ("xsd", "http://www.w3.org/2001/XMLSchema#"),
        ("obo", "http://purl.obolibrary.org/obo/"),
        ("oboInOwl", "http://www.geneontology.org/formats/oboInOwl#"),
        ("prov", "http://www.w3.org/ns/prov#"),
        ("skos", "http://www.w3.org/2004/02/skos/core#"),
        ("dcterms", "http://purl.org/dc/terms/"),
    ])
});

/// OWL 2 RDF mapping vocabulary.
pub mod owl {
    use super::NamedNodeRef;

    pub const ONTOLOGY: NamedNodeRef<'static> = NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#Ontology");
    pub const IMPORTS: NamedNodeRef<'static> = NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#imports");
    pub const VERSION_IRI: NamedNodeRef<'static> = NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#versionIRI");

    pub const CLASS: NamedNodeRef<'static> = NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#Class");
    pub const THING: NamedNodeRef<'static> = NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#Thing");
    pub const NOTHING: NamedNodeRef<'static> = NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#Nothing");
    pub const OBJECT_PROPERTY: NamedNodeRef<'static> = NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#ObjectProperty");
    pub const DATATYPE_PROPERTY: NamedNodeRef<'static> = NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#DatatypeProperty");
    pub const ANNOTATION_PROPERTY: NamedNodeRef<'static> = NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#AnnotationProperty");
    pub const NAMED_INDIVIDUAL: NamedNodeRef<'static> = NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#NamedIndividual");

    pub const RESTRICTION: NamedNodeRef<'static> = NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#Restriction");
    pub const ON_PROPERTY: NamedNodeRef<'static> = NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#onProperty");
    pub const SOME_VALUES_FROM: NamedNodeRef<'static> = NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#someValuesFrom");
    pub const ALL_VALUES_FROM: NamedNodeRef<'static> = NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#allValuesFrom");
    pub const HAS_VALUE: NamedNodeRef<'static> = NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#hasValue");
    pub const INTERSECTION_OF: NamedNodeRef<'static> = NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#intersectionOf");
    pub const UNION_OF: NamedNodeRef<'static> = NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#unionOf");
    pub const COMPLEMENT_OF: NamedNodeRef<'static> = NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#complementOf");

    // Constructs the parser recognises but does not model
    pub const CARDINALITY: NamedNodeRef<'static> = NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#cardinality");
    pub const MIN_CARDINALITY: NamedNodeRef<'static> = NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#minCardinality");
    pub const MAX_CARDINALITY: NamedNodeRef<'static> = NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#maxCardinality");
    pub const QUALIFIED_CARDINALITY: NamedNodeRef<'static> = NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#qualifiedCardinality");
    pub const ONE_OF: NamedNodeRef<'static> = NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#oneOf");
    pub const HAS_SELF: NamedNodeRef<'static> = NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#hasSelf");

    pub const EQUIVALENT_CLASS: NamedNodeRef<'static> = NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#equivalentClass");
    pub const DISJOINT_WITH: NamedNodeRef<'static> = NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#disjointWith");
    pub const EQUIVALENT_PROPERTY: NamedNodeRef<'static> = NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#equivalentProperty");
    pub const INVERSE_OF: NamedNodeRef<'static> = NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#inverseOf");
    pub const SAME_AS: NamedNodeRef<'static> = NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#sameAs");
    pub const DIFFERENT_FROM: NamedNodeRef<'static> = NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#differentFrom");

    pub const AXIOM: NamedNodeRef<'static> = NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#Axiom");
    pub const ANNOTATED_SOURCE: NamedNodeRef<'static> = NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#annotatedSource");
    pub const ANNOTATED_PROPERTY: NamedNodeRef<'static> = NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#annotatedProperty");
    pub const ANNOTATED_TARGET: NamedNodeRef<'static> = NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#annotatedTarget");

    pub const FUNCTIONAL_PROPERTY: NamedNodeRef<'static> = NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#FunctionalProperty");
    pub const INVERSE_FUNCTIONAL_PROPERTY: NamedNodeRef<'static> = NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#InverseFunctionalProperty");
    pub const TRANSITIVE_PROPERTY: NamedNodeRef<'static> = NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#TransitiveProperty");
    pub const SYMMETRIC_PROPERTY: NamedNodeRef<'static> = NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#SymmetricProperty");
    pub const ASYMMETRIC_PROPERTY: NamedNodeRef<'static> = NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#AsymmetricProperty");
    pub const REFLEXIVE_PROPERTY: NamedNodeRef<'static> = NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#ReflexiveProperty");
    pub const IRREFLEXIVE_PROPERTY: NamedNodeRef<'static> = NamedNodeRef::new_unchecked("http://www.w3.org/2002/07/owl#IrreflexiveProperty");
}
