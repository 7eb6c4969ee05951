//! OWL 2 to RDF mapping.
//!
//! Inverse of [`super::OntologyParser`]. N-ary equivalences are written
//! pairwise from their first operand, disjointness and difference as all
//! pairs. Annotated axioms get one `owl:Axiom` reification per main triple.

use oxigraph::model::vocab::{rdf, rdfs};
use oxigraph::model::{BlankNode, Graph, NamedNode, NamedNodeRef, Subject, Term, Triple};
use rustc_hash::FxHashSet;

use super::axiom::{Axiom, AxiomKind};
use super::model::{AnnotationSubject, ClassExpression, Entity, Individual};
use super::ontology::{Imports, Ontology};
use crate::vocab::owl;

pub struct OntologySerializer {
    graph: Graph,
}

impl OntologySerializer {
    /// Serializes the ontology header and axioms. With [`Imports::Included`]
    /// the axioms of the imports closure are inlined under the same header.
    pub fn to_graph(ontology: &Ontology, imports: Imports) -> Graph {
        let mut serializer = Self { graph: Graph::new() };
        serializer.write_header(ontology);
        for axiom in ontology.axioms(imports) {
            serializer.write_axiom(axiom);
        }
        serializer.graph
    }

    /// Same as [`Self::to_graph`], plus an `rdf:type` triple for every
    /// entity of the signature that has no declaration. Patterns such as
    /// `?x a owl:Class` then match entities that are only used, not declared.
    /// Built-in vocabulary is never typed.
    pub fn to_typed_graph(ontology: &Ontology, imports: Imports) -> Graph {
        let mut serializer = Self { graph: Self::to_graph(ontology, imports) };
        for entity in undeclared_entities(ontology, imports) {
            serializer.write_axiom(&Axiom::declaration(entity));
        }
        serializer.graph
    }

    /// Serializes loose axioms under an anonymous header.
    pub fn axioms_to_graph<'a>(axioms: impl IntoIterator<Item = &'a Axiom>) -> Graph {
        let mut serializer = Self { graph: Graph::new() };
        serializer.insert(BlankNode::default(), rdf::TYPE, owl::ONTOLOGY);
        for axiom in axioms {
            serializer.write_axiom(axiom);
        }
        serializer.graph
    }

    fn insert(&mut self, subject: impl Into<Subject>, predicate: impl Into<NamedNode>, object: impl Into<Term>) {
        self.graph.insert(&Triple::new(subject, predicate, object));
    }

    fn write_header(&mut self, ontology: &Ontology) {
        let header: Subject = match ontology.iri() {
            Some(iri) => iri.clone().into(),
            None => BlankNode::default().into(),
        };
        self.insert(header.clone(), rdf::TYPE, owl::ONTOLOGY);
        if let Some(version) = ontology.version_iri() {
            self.insert(header.clone(), owl::VERSION_IRI, version.clone());
        }
        for import in ontology.import_declarations() {
            self.insert(header.clone(), owl::IMPORTS, import.clone());
        }
        for annotation in ontology.annotations() {
            self.insert(
                header.clone(),
                annotation.property.iri().clone(),
                Term::from(annotation.value.clone()),
            );
        }
    }

    fn write_axiom(&mut self, axiom: &Axiom) {
        let main = self.main_triples(axiom.kind());
        for triple in main {
            self.graph.insert(&triple);
            if axiom.is_annotated() {
                let node = BlankNode::default();
                self.insert(node.clone(), rdf::TYPE, owl::AXIOM);
                self.insert(node.clone(), owl::ANNOTATED_SOURCE, Term::from(triple.subject.clone()));
                self.insert(node.clone(), owl::ANNOTATED_PROPERTY, triple.predicate.clone());
                self.insert(node.clone(), owl::ANNOTATED_TARGET, triple.object.clone());
                for annotation in axiom.annotations() {
                    self.insert(
                        node.clone(),
                        annotation.property.iri().clone(),
                        Term::from(annotation.value.clone()),
                    );
                }
            }
        }
    }

    /// Triples that carry the axiom itself. Auxiliary structure for
    /// anonymous expressions is written to the graph as a side effect.
    fn main_triples(&mut self, kind: &AxiomKind) -> Vec<Triple> {
        match kind {
            AxiomKind::Declaration(entity) => {
                let type_iri = match entity {
                    Entity::Class(_) => owl::CLASS,
                    Entity::ObjectProperty(_) => owl::OBJECT_PROPERTY,
                    Entity::DataProperty(_) => owl::DATATYPE_PROPERTY,
                    Entity::AnnotationProperty(_) => owl::ANNOTATION_PROPERTY,
                    Entity::NamedIndividual(_) => owl::NAMED_INDIVIDUAL,
                };
                vec![Triple::new(entity.iri().clone(), rdf::TYPE, type_iri)]
            }
            AxiomKind::SubClassOf { sub, sup } => {
                let sub = self.expression(sub);
                let sup = self.expression(sup);
                vec![Triple::new(sub, rdfs::SUB_CLASS_OF, sup)]
            }
            AxiomKind::EquivalentClasses(operands) => {
                let operands: Vec<Subject> = operands.iter().map(|o| self.expression(o)).collect();
                chained(&operands, owl::EQUIVALENT_CLASS)
            }
            AxiomKind::DisjointClasses(operands) => {
                let operands: Vec<Subject> = operands.iter().map(|o| self.expression(o)).collect();
                all_pairs(&operands, owl::DISJOINT_WITH)
            }
            AxiomKind::SubObjectPropertyOf { sub, sup } => {
                vec![Triple::new(sub.iri().clone(), rdfs::SUB_PROPERTY_OF, sup.iri().clone())]
            }
            AxiomKind::EquivalentObjectProperties(properties) => {
                let properties: Vec<Subject> = properties.iter().map(|p| p.iri().clone().into()).collect();
                chained(&properties, owl::EQUIVALENT_PROPERTY)
            }
            AxiomKind::InverseObjectProperties(first, second) => {
                vec![Triple::new(first.iri().clone(), owl::INVERSE_OF, second.iri().clone())]
            }
            AxiomKind::ObjectPropertyDomain { property, domain } => {
                let domain = self.expression(domain);
                vec![Triple::new(property.iri().clone(), rdfs::DOMAIN, domain)]
            }
            AxiomKind::ObjectPropertyRange { property, range } => {
                let range = self.expression(range);
                vec![Triple::new(property.iri().clone(), rdfs::RANGE, range)]
            }
            AxiomKind::ObjectPropertyCharacteristic { property, characteristic } => {
                vec![Triple::new(property.iri().clone(), rdf::TYPE, characteristic.rdf_type())]
            }
            AxiomKind::SubDataPropertyOf { sub, sup } => {
                vec![Triple::new(sub.iri().clone(), rdfs::SUB_PROPERTY_OF, sup.iri().clone())]
            }
            AxiomKind::EquivalentDataProperties(properties) => {
                let properties: Vec<Subject> = properties.iter().map(|p| p.iri().clone().into()).collect();
                chained(&properties, owl::EQUIVALENT_PROPERTY)
            }
            AxiomKind::DataPropertyDomain { property, domain } => {
                let domain = self.expression(domain);
                vec![Triple::new(property.iri().clone(), rdfs::DOMAIN, domain)]
            }
            AxiomKind::DataPropertyRange { property, datatype } => {
                vec![Triple::new(property.iri().clone(), rdfs::RANGE, datatype.clone())]
            }
            AxiomKind::FunctionalDataProperty(property) => {
                vec![Triple::new(property.iri().clone(), rdf::TYPE, owl::FUNCTIONAL_PROPERTY)]
            }
            AxiomKind::ClassAssertion { class, individual } => {
                let class = self.expression(class);
                vec![Triple::new(individual_subject(individual), rdf::TYPE, class)]
            }
            AxiomKind::ObjectPropertyAssertion { property, subject, object } => vec![Triple::new(
                individual_subject(subject),
                property.iri().clone(),
                individual_subject(object),
            )],
            AxiomKind::DataPropertyAssertion { property, subject, value } => {
                vec![Triple::new(individual_subject(subject), property.iri().clone(), value.clone())]
            }
            AxiomKind::SameIndividual(individuals) => {
                let individuals: Vec<Subject> = individuals.iter().map(individual_subject).collect();
                chained(&individuals, owl::SAME_AS)
            }
            AxiomKind::DifferentIndividuals(individuals) => {
                let individuals: Vec<Subject> = individuals.iter().map(individual_subject).collect();
                all_pairs(&individuals, owl::DIFFERENT_FROM)
            }
            AxiomKind::AnnotationAssertion { property, subject, value } => {
                let subject: Subject = match subject {
                    AnnotationSubject::Iri(iri) => iri.clone().into(),
                    AnnotationSubject::Anonymous(node) => node.clone().into(),
                };
                vec![Triple::new(subject, property.iri().clone(), Term::from(value.clone()))]
            }
            AxiomKind::SubAnnotationPropertyOf { sub, sup } => {
                vec![Triple::new(sub.iri().clone(), rdfs::SUB_PROPERTY_OF, sup.iri().clone())]
            }
            AxiomKind::AnnotationPropertyDomain { property, domain } => {
                vec![Triple::new(property.iri().clone(), rdfs::DOMAIN, domain.clone())]
            }
            AxiomKind::AnnotationPropertyRange { property, range } => {
                vec![Triple::new(property.iri().clone(), rdfs::RANGE, range.clone())]
            }
        }
    }

    fn expression(&mut self, expression: &ClassExpression) -> Subject {
        let (restriction_property, constructor, value): (_, NamedNodeRef<'static>, Term) = match expression {
            ClassExpression::Class(class) => return class.iri().clone().into(),
            ClassExpression::ObjectSomeValuesFrom { property, filler } => {
                let filler = self.expression(filler);
                (Some(property), owl::SOME_VALUES_FROM, filler.into())
            }
            ClassExpression::ObjectAllValuesFrom { property, filler } => {
                let filler = self.expression(filler);
                (Some(property), owl::ALL_VALUES_FROM, filler.into())
            }
            ClassExpression::ObjectHasValue { property, value } => {
                (Some(property), owl::HAS_VALUE, individual_subject(value).into())
            }
            ClassExpression::ObjectIntersectionOf(operands) => {
                let list = self.class_list(operands);
                (None, owl::INTERSECTION_OF, list)
            }
            ClassExpression::ObjectUnionOf(operands) => {
                let list = self.class_list(operands);
                (None, owl::UNION_OF, list)
            }
            ClassExpression::ObjectComplementOf(inner) => {
                let inner = self.expression(inner);
                (None, owl::COMPLEMENT_OF, inner.into())
            }
        };

        let node = BlankNode::default();
        match restriction_property {
            Some(property) => {
                self.insert(node.clone(), rdf::TYPE, owl::RESTRICTION);
                self.insert(node.clone(), owl::ON_PROPERTY, property.iri().clone());
            }
            None => self.insert(node.clone(), rdf::TYPE, owl::CLASS),
        }
        self.insert(node.clone(), constructor, value);
        node.into()
    }

    fn class_list(&mut self, operands: &[ClassExpression]) -> Term {
        let items: Vec<Term> = operands.iter().map(|o| self.expression(o).into()).collect();
        let mut head = Term::from(rdf::NIL);
        for item in items.into_iter().rev() {
            let node = BlankNode::default();
            self.insert(node.clone(), rdf::FIRST, item);
            self.insert(node.clone(), rdf::REST, head);
            head = node.into();
        }
        head
    }
}

fn individual_subject(individual: &Individual) -> Subject {
    match individual {
        Individual::Named(iri) => iri.clone().into(),
        Individual::Anonymous(node) => node.clone().into(),
    }
}

fn chained(operands: &[Subject], predicate: NamedNodeRef<'static>) -> Vec<Triple> {
    let Some((first, rest)) = operands.split_first() else {
        return Vec::new();
    };
    rest.iter()
        .map(|other| Triple::new(first.clone(), predicate, Term::from(other.clone())))
        .collect()
}

fn all_pairs(operands: &[Subject], predicate: NamedNodeRef<'static>) -> Vec<Triple> {
    let mut triples = Vec::new();
    for (i, first) in operands.iter().enumerate() {
        for second in &operands[i + 1..] {
            triples.push(Triple::new(first.clone(), predicate, Term::from(second.clone())));
        }
    }
    triples
}

fn undeclared_entities(ontology: &Ontology, imports: Imports) -> Vec<Entity> {
    let declared: FxHashSet<&Entity> = ontology
        .axioms(imports)
        .filter_map(|axiom| match axiom.kind() {
            AxiomKind::Declaration(entity) => Some(entity),
            _ => None,
        })
        .collect();
    let mut seen = FxHashSet::default();
    ontology
        .axioms(imports)
        .flat_map(Axiom::signature)
        .filter(|entity| !declared.contains(entity) && !is_builtin(entity.iri().as_str()))
        .filter(|entity| seen.insert(entity.clone()))
        .collect()
}

const BUILTIN_NAMESPACES: [&str; 4] = [
    "http://www.w3.org/2002/07/owl#",
    "http://www.w3.org/1999/02/22-rdf-syntax-ns#",
    "http://www.w3.org/2000/01/rdf-schema#",
    "http://www.w3.org/2001/XMLSchema#",
];

fn is_builtin(iri: &str) -> bool {
    BUILTIN_NAMESPACES.iter().any(|ns| iri.starts_with(ns))
}
