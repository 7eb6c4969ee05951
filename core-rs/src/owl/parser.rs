//! OWL 2 parser from RDF triples.
//!
//! Maps a triple collection back to an [`Ontology`]: header, declarations,
//! class and property axioms, individual assertions, annotation assertions
//! and reified axiom annotations. Anonymous class expressions and RDF lists
//! are read from their blank-node structures; any such structure that no
//! axiom refers to is reported instead of being silently dropped.

use oxigraph::model::vocab::{rdf, rdfs};
use oxigraph::model::{BlankNode, Graph, NamedNode, NamedNodeRef, Subject, Term, Triple};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::warn;

use super::axiom::{Axiom, AxiomKind, PropertyCharacteristic};
use super::error::{OwlParseError, ParseErrorKind};
use super::model::{
    Annotation, AnnotationProperty, AnnotationSubject, AnnotationValue, Class, ClassExpression,
    DataProperty, Entity, Individual, ObjectProperty,
};
use super::ontology::Ontology;
use crate::vocab::owl;

type ParseResult<T> = Result<T, OwlParseError>;

/// Predicates that only ever describe anonymous expressions, lists and reifications.
const STRUCTURAL_PREDICATES: [NamedNodeRef<'static>; 18] = [
    owl::ON_PROPERTY,
    owl::SOME_VALUES_FROM,
    owl::ALL_VALUES_FROM,
    owl::HAS_VALUE,
    owl::INTERSECTION_OF,
    owl::UNION_OF,
    owl::COMPLEMENT_OF,
    owl::ONE_OF,
    owl::CARDINALITY,
    owl::MIN_CARDINALITY,
    owl::MAX_CARDINALITY,
    owl::QUALIFIED_CARDINALITY,
    owl::HAS_SELF,
    rdf::FIRST,
    rdf::REST,
    owl::ANNOTATED_SOURCE,
    owl::ANNOTATED_PROPERTY,
    owl::ANNOTATED_TARGET,
];

/// Parser configuration.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Maximum nesting of anonymous class expressions.
    pub max_depth: usize,
    /// Maximum length of an RDF list.
    pub max_list_length: usize,
    /// Skip unsupported or malformed shapes with a warning instead of failing.
    pub lenient: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_depth: 100,
            max_list_length: 10_000,
            lenient: false,
        }
    }
}

impl ParserConfig {
    pub fn lenient(mut self) -> Self {
        self.lenient = true;
        self
    }
}

/// Entity types a named node is declared with in the graph.
#[derive(Debug, Clone, Copy, Default)]
struct Declared {
    object_property: bool,
    data_property: bool,
    annotation_property: bool,
}

/// Parses an [`Ontology`] from RDF triples.
pub struct OntologyParser {
    config: ParserConfig,
    triples: Vec<Triple>,
    by_subject: FxHashMap<Subject, Vec<usize>>,
    declared: FxHashMap<NamedNode, Declared>,
    structural: FxHashSet<BlankNode>,
    reification_nodes: FxHashSet<BlankNode>,
    consumed: FxHashSet<BlankNode>,
}

impl OntologyParser {
    pub fn new(triples: impl IntoIterator<Item = Triple>) -> Self {
        let triples: Vec<Triple> = triples.into_iter().collect();
        let mut by_subject: FxHashMap<Subject, Vec<usize>> = FxHashMap::default();
        for (index, triple) in triples.iter().enumerate() {
            by_subject.entry(triple.subject.clone()).or_default().push(index);
        }
        Self {
            config: ParserConfig::default(),
            triples,
            by_subject,
            declared: FxHashMap::default(),
            structural: FxHashSet::default(),
            reification_nodes: FxHashSet::default(),
            consumed: FxHashSet::default(),
        }
    }

    pub fn from_graph(graph: &Graph) -> Self {
        Self::new(graph.iter().map(|triple| triple.into_owned()))
    }

    pub fn with_config(mut self, config: ParserConfig) -> Self {
        self.config = config;
        self
    }

    /// Types property IRIs as if these entities were declared in the graph.
    /// No declaration axioms are produced for them.
    pub fn with_declarations<'a>(mut self, entities: impl IntoIterator<Item = &'a Entity>) -> Self {
        for entity in entities {
            let entry = self.declared.entry(entity.iri().clone()).or_default();
            match entity {
                Entity::ObjectProperty(_) => entry.object_property = true,
                Entity::DataProperty(_) => entry.data_property = true,
                Entity::AnnotationProperty(_) => entry.annotation_property = true,
                Entity::Class(_) | Entity::NamedIndividual(_) => {}
            }
        }
        self
    }

    /// Parses the triples into an ontology.
    pub fn parse(mut self) -> ParseResult<Ontology> {
        let mut ontology = Ontology::new(None);
        let headers = self.parse_header(&mut ontology)?;
        self.index_declarations();
        self.index_structural_nodes();
        let mut reifications = self.parse_reifications()?;

        for index in 0..self.triples.len() {
            let triple = self.triples[index].clone();
            if headers.contains(&triple.subject) || self.is_structural_triple(&triple) {
                continue;
            }
            let kind = match self.triple_to_axiom(&triple) {
                Ok(Some(kind)) => kind,
                Ok(None) => continue,
                Err(e) => {
                    self.recover(e)?;
                    continue;
                }
            };
            match reifications.remove(&triple) {
                Some(annotation_sets) => {
                    for annotations in annotation_sets {
                        ontology.add_axiom(Axiom::new(kind.clone(), annotations));
                    }
                }
                None => {
                    ontology.add_axiom(Axiom::new(kind, Vec::new()));
                }
            }
        }

        if let Some(orphan) = reifications.keys().next() {
            let e = OwlParseError::new(
                ParseErrorKind::MalformedReification,
                format!("owl:Axiom annotates a triple that is not asserted: {orphan}"),
            );
            self.recover(e)?;
        }

        let mut dangling: Vec<String> = self
            .structural
            .difference(&self.consumed)
            .map(|node| node.to_string())
            .collect();
        if !dangling.is_empty() {
            dangling.sort();
            let e = OwlParseError::new(
                ParseErrorKind::DanglingExpression,
                format!("anonymous structure not used by any axiom: {}", dangling.join(", ")),
            );
            self.recover(e)?;
        }

        Ok(ontology)
    }

    /// Lenient mode logs and continues; strict mode propagates.
    fn recover(&self, e: OwlParseError) -> ParseResult<()> {
        if self.config.lenient {
            warn!(error = %e, "Skipping triples that do not map to OWL");
            Ok(())
        } else {
            Err(e)
        }
    }

    fn outgoing(&self, subject: &Subject) -> Vec<Triple> {
        self.by_subject
            .get(subject)
            .map(|indexes| indexes.iter().map(|&i| self.triples[i].clone()).collect())
            .unwrap_or_default()
    }

    fn object(&self, subject: &Subject, predicate: NamedNodeRef<'_>) -> Option<Term> {
        self.by_subject.get(subject).and_then(|indexes| {
            indexes
                .iter()
                .map(|&i| &self.triples[i])
                .find(|t| t.predicate.as_ref() == predicate)
                .map(|t| t.object.clone())
        })
    }

    fn has_type(&self, subject: &Subject, class: NamedNodeRef<'_>) -> bool {
        self.by_subject.get(subject).is_some_and(|indexes| {
            indexes.iter().map(|&i| &self.triples[i]).any(|t| {
                t.predicate.as_ref() == rdf::TYPE && matches!(&t.object, Term::NamedNode(o) if o.as_ref() == class)
            })
        })
    }

    fn parse_header(&mut self, ontology: &mut Ontology) -> ParseResult<FxHashSet<Subject>> {
        let headers: FxHashSet<Subject> = self
            .triples
            .iter()
            .filter(|t| {
                t.predicate.as_ref() == rdf::TYPE
                    && matches!(&t.object, Term::NamedNode(o) if o.as_ref() == owl::ONTOLOGY)
            })
            .map(|t| t.subject.clone())
            .collect();
        if headers.is_empty() {
            return Err(OwlParseError::new(
                ParseErrorKind::MissingOntologyHeader,
                "no rdf:type owl:Ontology triple in graph",
            ));
        }

        for header in &headers {
            if let Subject::NamedNode(iri) = header {
                if ontology.iri().is_none() {
                    ontology.set_iri(Some(iri.clone()));
                }
            }
            for triple in self.outgoing(header) {
                let predicate = triple.predicate.as_ref();
                if predicate == rdf::TYPE {
                    continue;
                }
                match &triple.object {
                    Term::NamedNode(iri) if predicate == owl::IMPORTS => {
                        ontology.add_import_declaration(iri.clone())
                    }
                    Term::NamedNode(iri) if predicate == owl::VERSION_IRI => {
                        ontology.set_version_iri(Some(iri.clone()))
                    }
                    object => {
                        let value = annotation_value(object)?;
                        ontology.add_annotation(Annotation::new(
                            AnnotationProperty::new(triple.predicate.clone()),
                            value,
                        ));
                    }
                }
            }
        }
        Ok(headers)
    }

    fn index_declarations(&mut self) {
        for triple in &self.triples {
            if triple.predicate.as_ref() != rdf::TYPE {
                continue;
            }
            let (Subject::NamedNode(subject), Term::NamedNode(object)) = (&triple.subject, &triple.object) else {
                continue;
            };
            let entry = self.declared.entry(subject.clone()).or_default();
            let object = object.as_ref();
            if object == owl::OBJECT_PROPERTY {
                entry.object_property = true;
            } else if object == owl::DATATYPE_PROPERTY {
                entry.data_property = true;
            } else if object == owl::ANNOTATION_PROPERTY {
                entry.annotation_property = true;
            }
        }
    }

    fn index_structural_nodes(&mut self) {
        for triple in &self.triples {
            let Subject::BlankNode(node) = &triple.subject else {
                continue;
            };
            let predicate = triple.predicate.as_ref();
            if STRUCTURAL_PREDICATES.contains(&predicate) {
                self.structural.insert(node.clone());
                if predicate == owl::ANNOTATED_SOURCE {
                    self.reification_nodes.insert(node.clone());
                }
            } else if predicate == rdf::TYPE {
                if let Term::NamedNode(object) = &triple.object {
                    let object = object.as_ref();
                    if object == owl::RESTRICTION || object == owl::CLASS {
                        self.structural.insert(node.clone());
                    } else if object == owl::AXIOM {
                        self.structural.insert(node.clone());
                        self.reification_nodes.insert(node.clone());
                    }
                }
            }
        }
    }

    fn is_structural_triple(&self, triple: &Triple) -> bool {
        let Subject::BlankNode(node) = &triple.subject else {
            return false;
        };
        if self.reification_nodes.contains(node) {
            return true;
        }
        self.structural.contains(node)
            && (triple.predicate.as_ref() == rdf::TYPE || STRUCTURAL_PREDICATES.contains(&triple.predicate.as_ref()))
    }

    /// Collects `owl:Axiom` annotation sets keyed by the triple they annotate.
    fn parse_reifications(&mut self) -> ParseResult<FxHashMap<Triple, Vec<Vec<Annotation>>>> {
        let mut reifications: FxHashMap<Triple, Vec<Vec<Annotation>>> = FxHashMap::default();
        let mut nodes: Vec<BlankNode> = self.reification_nodes.iter().cloned().collect();
        nodes.sort_by_cached_key(|node| node.to_string());

        for node in nodes {
            self.consumed.insert(node.clone());
            match self.parse_reification(&node) {
                Ok((triple, annotations)) => reifications.entry(triple).or_default().push(annotations),
                Err(e) => self.recover(e)?,
            }
        }
        Ok(reifications)
    }

    fn parse_reification(&self, node: &BlankNode) -> ParseResult<(Triple, Vec<Annotation>)> {
        let subject = Subject::BlankNode(node.clone());
        let source = self.object(&subject, owl::ANNOTATED_SOURCE);
        let property = self.object(&subject, owl::ANNOTATED_PROPERTY);
        let target = self.object(&subject, owl::ANNOTATED_TARGET);
        let (Some(source), Some(Term::NamedNode(property)), Some(target)) = (source, property, target) else {
            return Err(OwlParseError::new(
                ParseErrorKind::MalformedReification,
                format!("{node} lacks owl:annotatedSource, owl:annotatedProperty or owl:annotatedTarget"),
            ));
        };
        let source: Subject = match source {
            Term::NamedNode(iri) => iri.into(),
            Term::BlankNode(blank) => blank.into(),
            other => {
                return Err(OwlParseError::new(
                    ParseErrorKind::MalformedReification,
                    format!("{other} cannot be an annotated source"),
                ))
            }
        };

        let mut annotations = Vec::new();
        for triple in self.outgoing(&subject) {
            let predicate = triple.predicate.as_ref();
            if predicate == rdf::TYPE
                || predicate == owl::ANNOTATED_SOURCE
                || predicate == owl::ANNOTATED_PROPERTY
                || predicate == owl::ANNOTATED_TARGET
            {
                continue;
            }
            annotations.push(Annotation::new(
                AnnotationProperty::new(triple.predicate.clone()),
                annotation_value(&triple.object)?,
            ));
        }
        Ok((Triple::new(source, property, target), annotations))
    }

    fn declared(&self, iri: &NamedNode) -> Declared {
        self.declared.get(iri).copied().unwrap_or_default()
    }

    fn triple_to_axiom(&mut self, triple: &Triple) -> ParseResult<Option<AxiomKind>> {
        let predicate = triple.predicate.as_ref();
        let subject_term = Term::from(triple.subject.clone());

        if predicate == rdf::TYPE {
            return self.type_triple(triple);
        }
        if predicate == rdfs::SUB_CLASS_OF {
            let sub = self.class_expression(&subject_term, 0)?;
            let sup = self.class_expression(&triple.object, 0)?;
            return Ok(Some(AxiomKind::SubClassOf { sub, sup }));
        }
        if predicate == owl::EQUIVALENT_CLASS {
            let first = self.class_expression(&subject_term, 0)?;
            let second = self.class_expression(&triple.object, 0)?;
            return Ok(Some(AxiomKind::EquivalentClasses(vec![first, second])));
        }
        if predicate == owl::DISJOINT_WITH {
            let first = self.class_expression(&subject_term, 0)?;
            let second = self.class_expression(&triple.object, 0)?;
            return Ok(Some(AxiomKind::DisjointClasses(vec![first, second])));
        }
        if predicate == rdfs::SUB_PROPERTY_OF {
            let (sub, sup) = property_pair(triple)?;
            let declared = (self.declared(&sub), self.declared(&sup));
            return Ok(Some(if declared.0.annotation_property || declared.1.annotation_property {
                AxiomKind::SubAnnotationPropertyOf {
                    sub: sub.into(),
                    sup: sup.into(),
                }
            } else if declared.0.data_property || declared.1.data_property {
                AxiomKind::SubDataPropertyOf {
                    sub: sub.into(),
                    sup: sup.into(),
                }
            } else {
                AxiomKind::SubObjectPropertyOf {
                    sub: sub.into(),
                    sup: sup.into(),
                }
            }));
        }
        if predicate == owl::EQUIVALENT_PROPERTY {
            let (first, second) = property_pair(triple)?;
            return Ok(Some(
                if self.declared(&first).data_property || self.declared(&second).data_property {
                    AxiomKind::EquivalentDataProperties(vec![first.into(), second.into()])
                } else {
                    AxiomKind::EquivalentObjectProperties(vec![first.into(), second.into()])
                },
            ));
        }
        if predicate == owl::INVERSE_OF {
            let (first, second) = property_pair(triple)?;
            return Ok(Some(AxiomKind::InverseObjectProperties(first.into(), second.into())));
        }
        if predicate == rdfs::DOMAIN || predicate == rdfs::RANGE {
            return self.domain_or_range(triple).map(Some);
        }
        if predicate == owl::SAME_AS || predicate == owl::DIFFERENT_FROM {
            let first = self.individual_from_subject(&triple.subject)?;
            let second = self.individual_from_term(&triple.object)?;
            return Ok(Some(if predicate == owl::SAME_AS {
                AxiomKind::SameIndividual(vec![first, second])
            } else {
                AxiomKind::DifferentIndividuals(vec![first, second])
            }));
        }
        if STRUCTURAL_PREDICATES.contains(&predicate) || predicate == owl::IMPORTS || predicate == owl::VERSION_IRI {
            return Err(OwlParseError::new(
                ParseErrorKind::UnsupportedConstruct,
                format!("{predicate} used outside of its construct on {}", triple.subject),
            ));
        }
        self.assertion(triple).map(Some)
    }

    fn type_triple(&mut self, triple: &Triple) -> ParseResult<Option<AxiomKind>> {
        let object = match &triple.object {
            Term::NamedNode(object) => object.clone(),
            Term::Literal(literal) => {
                return Err(OwlParseError::new(
                    ParseErrorKind::UnexpectedLiteral,
                    format!("{literal} used as the type of {}", triple.subject),
                ))
            }
            anonymous => {
                let class = self.class_expression(anonymous, 0)?;
                let individual = self.individual_from_subject(&triple.subject)?;
                return Ok(Some(AxiomKind::ClassAssertion { class, individual }));
            }
        };
        let type_iri = object.as_ref();

        let declaration = |entity: fn(NamedNode) -> Entity| -> ParseResult<Option<AxiomKind>> {
            match &triple.subject {
                Subject::NamedNode(iri) => Ok(Some(AxiomKind::Declaration(entity(iri.clone())))),
                other => Err(OwlParseError::new(
                    ParseErrorKind::UnsupportedConstruct,
                    format!("declaration of anonymous entity {other}"),
                )),
            }
        };
        if type_iri == owl::CLASS {
            return declaration(|iri: NamedNode| Entity::Class(Class::new(iri)));
        }
        if type_iri == owl::OBJECT_PROPERTY {
            return declaration(|iri: NamedNode| Entity::ObjectProperty(ObjectProperty::new(iri)));
        }
        if type_iri == owl::DATATYPE_PROPERTY {
            return declaration(|iri: NamedNode| Entity::DataProperty(DataProperty::new(iri)));
        }
        if type_iri == owl::ANNOTATION_PROPERTY {
            return declaration(|iri: NamedNode| Entity::AnnotationProperty(AnnotationProperty::new(iri)));
        }
        if type_iri == owl::NAMED_INDIVIDUAL {
            return declaration(Entity::NamedIndividual);
        }

        if let Some(characteristic) = PropertyCharacteristic::ALL.iter().find(|c| c.rdf_type() == type_iri) {
            let Subject::NamedNode(property) = &triple.subject else {
                return Err(OwlParseError::new(
                    ParseErrorKind::UnsupportedConstruct,
                    format!("property characteristic on anonymous property {}", triple.subject),
                ));
            };
            if *characteristic == PropertyCharacteristic::Functional && self.declared(property).data_property {
                return Ok(Some(AxiomKind::FunctionalDataProperty(property.clone().into())));
            }
            return Ok(Some(AxiomKind::ObjectPropertyCharacteristic {
                property: property.clone().into(),
                characteristic: *characteristic,
            }));
        }

        if type_iri == owl::RESTRICTION || type_iri == owl::AXIOM || type_iri == owl::ONTOLOGY {
            return Err(OwlParseError::new(
                ParseErrorKind::UnsupportedConstruct,
                format!("{} typed as {type_iri}", triple.subject),
            ));
        }

        let individual = self.individual_from_subject(&triple.subject)?;
        Ok(Some(AxiomKind::ClassAssertion {
            class: ClassExpression::Class(Class::new(object)),
            individual,
        }))
    }

    fn domain_or_range(&mut self, triple: &Triple) -> ParseResult<AxiomKind> {
        let is_domain = triple.predicate.as_ref() == rdfs::DOMAIN;
        let Subject::NamedNode(property) = &triple.subject else {
            return Err(OwlParseError::new(
                ParseErrorKind::UnsupportedConstruct,
                format!("domain or range of anonymous property {}", triple.subject),
            ));
        };
        let declared = self.declared(property);

        if declared.annotation_property {
            let Term::NamedNode(target) = &triple.object else {
                return Err(OwlParseError::new(
                    ParseErrorKind::UnsupportedConstruct,
                    format!("annotation property {property} needs a named domain or range"),
                ));
            };
            let property = AnnotationProperty::new(property.clone());
            return Ok(if is_domain {
                AxiomKind::AnnotationPropertyDomain {
                    property,
                    domain: target.clone(),
                }
            } else {
                AxiomKind::AnnotationPropertyRange {
                    property,
                    range: target.clone(),
                }
            });
        }

        if declared.data_property {
            let property = DataProperty::new(property.clone());
            if is_domain {
                let domain = self.class_expression(&triple.object, 0)?;
                return Ok(AxiomKind::DataPropertyDomain { property, domain });
            }
            return match &triple.object {
                Term::NamedNode(datatype) => Ok(AxiomKind::DataPropertyRange {
                    property,
                    datatype: datatype.clone(),
                }),
                other => Err(OwlParseError::new(
                    ParseErrorKind::UnsupportedConstruct,
                    format!("data range {other} is not a named datatype"),
                )),
            };
        }

        let property = ObjectProperty::new(property.clone());
        let expression = self.class_expression(&triple.object, 0)?;
        Ok(if is_domain {
            AxiomKind::ObjectPropertyDomain {
                property,
                domain: expression,
            }
        } else {
            AxiomKind::ObjectPropertyRange {
                property,
                range: expression,
            }
        })
    }

    /// Non-vocabulary predicate: property assertion if the predicate is
    /// declared as one, annotation assertion otherwise.
    fn assertion(&self, triple: &Triple) -> ParseResult<AxiomKind> {
        let declared = self.declared(&triple.predicate);
        if declared.object_property {
            return Ok(AxiomKind::ObjectPropertyAssertion {
                property: triple.predicate.clone().into(),
                subject: self.individual_from_subject(&triple.subject)?,
                object: self.individual_from_term(&triple.object)?,
            });
        }
        if declared.data_property {
            let Term::Literal(value) = &triple.object else {
                return Err(OwlParseError::new(
                    ParseErrorKind::UnsupportedConstruct,
                    format!("data property {} used with non-literal {}", triple.predicate, triple.object),
                ));
            };
            return Ok(AxiomKind::DataPropertyAssertion {
                property: triple.predicate.clone().into(),
                subject: self.individual_from_subject(&triple.subject)?,
                value: value.clone(),
            });
        }
        let subject = match &triple.subject {
            Subject::NamedNode(iri) => AnnotationSubject::Iri(iri.clone()),
            Subject::BlankNode(node) => AnnotationSubject::Anonymous(node.clone()),
            #[allow(unreachable_patterns)]
            other => {
                return Err(OwlParseError::new(
                    ParseErrorKind::UnsupportedConstruct,
                    format!("annotation on quoted triple {other}"),
                ))
            }
        };
        Ok(AxiomKind::AnnotationAssertion {
            property: triple.predicate.clone().into(),
            subject,
            value: annotation_value(&triple.object)?,
        })
    }

    fn individual_from_subject(&self, subject: &Subject) -> ParseResult<Individual> {
        self.individual_from_term(&Term::from(subject.clone()))
    }

    fn individual_from_term(&self, term: &Term) -> ParseResult<Individual> {
        match term {
            Term::NamedNode(iri) => Ok(Individual::Named(iri.clone())),
            Term::BlankNode(node) if !self.structural.contains(node) => Ok(Individual::Anonymous(node.clone())),
            Term::Literal(literal) => Err(OwlParseError::new(
                ParseErrorKind::UnexpectedLiteral,
                format!("{literal} used as an individual"),
            )),
            other => Err(OwlParseError::new(
                ParseErrorKind::UnsupportedConstruct,
                format!("{other} used as an individual"),
            )),
        }
    }

    fn class_expression(&mut self, term: &Term, depth: usize) -> ParseResult<ClassExpression> {
        match term {
            Term::NamedNode(iri) => Ok(ClassExpression::Class(Class::new(iri.clone()))),
            Term::BlankNode(node) => self.anonymous_class(node, depth),
            Term::Literal(literal) => Err(OwlParseError::new(
                ParseErrorKind::UnexpectedLiteral,
                format!("{literal} used as a class expression"),
            )),
            #[allow(unreachable_patterns)]
            other => Err(OwlParseError::new(
                ParseErrorKind::UnsupportedConstruct,
                format!("{other} used as a class expression"),
            )),
        }
    }

    fn anonymous_class(&mut self, node: &BlankNode, depth: usize) -> ParseResult<ClassExpression> {
        if depth >= self.config.max_depth {
            return Err(OwlParseError::new(
                ParseErrorKind::DepthLimitExceeded,
                format!("class expression nesting exceeds {}", self.config.max_depth),
            ));
        }
        self.consumed.insert(node.clone());
        let subject = Subject::BlankNode(node.clone());

        if let Some(property) = self.object(&subject, owl::ON_PROPERTY) {
            let Term::NamedNode(property) = property else {
                return Err(OwlParseError::new(
                    ParseErrorKind::MalformedRestriction,
                    format!("owl:onProperty of {node} must be a named object property"),
                ));
            };
            let property = ObjectProperty::new(property);
            if let Some(filler) = self.object(&subject, owl::SOME_VALUES_FROM) {
                let filler = self.class_expression(&filler, depth + 1)?;
                return Ok(ClassExpression::some(property, filler));
            }
            if let Some(filler) = self.object(&subject, owl::ALL_VALUES_FROM) {
                let filler = self.class_expression(&filler, depth + 1)?;
                return Ok(ClassExpression::only(property, filler));
            }
            if let Some(value) = self.object(&subject, owl::HAS_VALUE) {
                let value = self.individual_from_term(&value)?;
                return Ok(ClassExpression::ObjectHasValue { property, value });
            }
            for unsupported in [
                owl::CARDINALITY,
                owl::MIN_CARDINALITY,
                owl::MAX_CARDINALITY,
                owl::QUALIFIED_CARDINALITY,
                owl::HAS_SELF,
            ] {
                if self.object(&subject, unsupported).is_some() {
                    return Err(OwlParseError::new(
                        ParseErrorKind::UnsupportedConstruct,
                        format!("{unsupported} restriction on {property}"),
                    ));
                }
            }
            return Err(OwlParseError::new(
                ParseErrorKind::MalformedRestriction,
                format!("restriction {node} on {property} has no filler"),
            ));
        }

        if self.has_type(&subject, owl::RESTRICTION) {
            return Err(OwlParseError::new(
                ParseErrorKind::MalformedRestriction,
                format!("restriction {node} has no owl:onProperty"),
            ));
        }

        if let Some(list) = self.object(&subject, owl::INTERSECTION_OF) {
            let operands = self.class_list(&list, depth)?;
            return Ok(ClassExpression::ObjectIntersectionOf(operands));
        }
        if let Some(list) = self.object(&subject, owl::UNION_OF) {
            let operands = self.class_list(&list, depth)?;
            return Ok(ClassExpression::ObjectUnionOf(operands));
        }
        if let Some(inner) = self.object(&subject, owl::COMPLEMENT_OF) {
            let inner = self.class_expression(&inner, depth + 1)?;
            return Ok(ClassExpression::ObjectComplementOf(Box::new(inner)));
        }
        if self.object(&subject, owl::ONE_OF).is_some() {
            return Err(OwlParseError::new(
                ParseErrorKind::UnsupportedConstruct,
                format!("enumeration {node}"),
            ));
        }
        Err(OwlParseError::new(
            ParseErrorKind::UnsupportedConstruct,
            format!("anonymous class {node} has no constructor"),
        ))
    }

    fn class_list(&mut self, head: &Term, depth: usize) -> ParseResult<Vec<ClassExpression>> {
        let items = self.list(head)?;
        items
            .iter()
            .map(|item| self.class_expression(item, depth + 1))
            .collect()
    }

    fn list(&mut self, head: &Term) -> ParseResult<Vec<Term>> {
        let mut items = Vec::new();
        let mut seen = FxHashSet::default();
        let mut current = head.clone();
        loop {
            let node = match &current {
                Term::NamedNode(iri) if iri.as_ref() == rdf::NIL => return Ok(items),
                Term::BlankNode(node) => node.clone(),
                other => {
                    return Err(OwlParseError::new(
                        ParseErrorKind::MalformedList,
                        format!("{other} is not an RDF list node"),
                    ))
                }
            };
            if !seen.insert(node.clone()) {
                return Err(OwlParseError::new(ParseErrorKind::MalformedList, format!("cycle at {node}")));
            }
            if items.len() >= self.config.max_list_length {
                return Err(OwlParseError::new(
                    ParseErrorKind::MalformedList,
                    format!("list longer than {}", self.config.max_list_length),
                ));
            }
            self.consumed.insert(node.clone());
            let subject = Subject::BlankNode(node.clone());
            let first = self.object(&subject, rdf::FIRST).ok_or_else(|| {
                OwlParseError::new(ParseErrorKind::MalformedList, format!("{node} has no rdf:first"))
            })?;
            let rest = self.object(&subject, rdf::REST).ok_or_else(|| {
                OwlParseError::new(ParseErrorKind::MalformedList, format!("{node} has no rdf:rest"))
            })?;
            items.push(first);
            current = rest;
        }
    }
}

fn property_pair(triple: &Triple) -> ParseResult<(NamedNode, NamedNode)> {
    match (&triple.subject, &triple.object) {
        (Subject::NamedNode(first), Term::NamedNode(second)) => Ok((first.clone(), second.clone())),
        (_, Term::Literal(literal)) => Err(OwlParseError::new(
            ParseErrorKind::UnexpectedLiteral,
            format!("{literal} used as a property with {}", triple.predicate),
        )),
        _ => Err(OwlParseError::new(
            ParseErrorKind::UnsupportedConstruct,
            format!("anonymous property expression in {triple}"),
        )),
    }
}

fn annotation_value(term: &Term) -> ParseResult<AnnotationValue> {
    match term {
        Term::NamedNode(iri) => Ok(AnnotationValue::Iri(iri.clone())),
        Term::Literal(literal) => Ok(AnnotationValue::Literal(literal.clone())),
        Term::BlankNode(node) => Ok(AnnotationValue::Anonymous(node.clone())),
        #[allow(unreachable_patterns)]
        other => Err(OwlParseError::new(
            ParseErrorKind::UnsupportedConstruct,
            format!("{other} used as an annotation value"),
        )),
    }
}
