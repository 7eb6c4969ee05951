//! OWL 2 axioms.
//!
//! An [`Axiom`] is a kind plus a canonical set of axiom annotations. The
//! annotations take part in equality: the same fact stated with and without
//! a provenance annotation is two different axioms.

use oxigraph::model::{Literal, NamedNode, NamedNodeRef};
use std::fmt;

use crate::vocab::owl;

use super::model::{
    canonical_sort, write_joined, Annotation, AnnotationProperty, AnnotationSubject, AnnotationValue,
    Class, ClassExpression, DataProperty, Entity, Individual, ObjectProperty,
};

/// Characteristics an object property can be declared to have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyCharacteristic {
    Functional,
    InverseFunctional,
    Transitive,
    Symmetric,
    Asymmetric,
    Reflexive,
    Irreflexive,
}

impl PropertyCharacteristic {
    pub const ALL: [PropertyCharacteristic; 7] = [
        Self::Functional,
        Self::InverseFunctional,
        Self::Transitive,
        Self::Symmetric,
        Self::Asymmetric,
        Self::Reflexive,
        Self::Irreflexive,
    ];

    /// The `rdf:type` that states this characteristic in RDF.
    pub fn rdf_type(self) -> NamedNodeRef<'static> {
        match self {
            Self::Functional => owl::FUNCTIONAL_PROPERTY,
            Self::InverseFunctional => owl::INVERSE_FUNCTIONAL_PROPERTY,
            Self::Transitive => owl::TRANSITIVE_PROPERTY,
            Self::Symmetric => owl::SYMMETRIC_PROPERTY,
            Self::Asymmetric => owl::ASYMMETRIC_PROPERTY,
            Self::Reflexive => owl::REFLEXIVE_PROPERTY,
            Self::Irreflexive => owl::IRREFLEXIVE_PROPERTY,
        }
    }

    fn keyword(self) -> &'static str {
        match self {
            Self::Functional => "FunctionalObjectProperty",
            Self::InverseFunctional => "InverseFunctionalObjectProperty",
            Self::Transitive => "TransitiveObjectProperty",
            Self::Symmetric => "SymmetricObjectProperty",
            Self::Asymmetric => "AsymmetricObjectProperty",
            Self::Reflexive => "ReflexiveObjectProperty",
            Self::Irreflexive => "IrreflexiveObjectProperty",
        }
    }
}

/// The logical or annotation content of an axiom.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AxiomKind {
    Declaration(Entity),

    SubClassOf {
        sub: ClassExpression,
        sup: ClassExpression,
    },
    EquivalentClasses(Vec<ClassExpression>),
    DisjointClasses(Vec<ClassExpression>),

    SubObjectPropertyOf {
        sub: ObjectProperty,
        sup: ObjectProperty,
    },
    EquivalentObjectProperties(Vec<ObjectProperty>),
    InverseObjectProperties(ObjectProperty, ObjectProperty),
    ObjectPropertyDomain {
        property: ObjectProperty,
        domain: ClassExpression,
    },
    ObjectPropertyRange {
        property: ObjectProperty,
        range: ClassExpression,
    },
    ObjectPropertyCharacteristic {
        property: ObjectProperty,
        characteristic: PropertyCharacteristic,
    },

    SubDataPropertyOf {
        sub: DataProperty,
        sup: DataProperty,
    },
    EquivalentDataProperties(Vec<DataProperty>),
    DataPropertyDomain {
        property: DataProperty,
        domain: ClassExpression,
    },
    /// Range restricted to a named datatype.
    DataPropertyRange {
        property: DataProperty,
        datatype: NamedNode,
    },
    FunctionalDataProperty(DataProperty),

    ClassAssertion {
        class: ClassExpression,
        individual: Individual,
    },
    ObjectPropertyAssertion {
        property: ObjectProperty,
        subject: Individual,
        object: Individual,
    },
    DataPropertyAssertion {
        property: DataProperty,
        subject: Individual,
        value: Literal,
    },
    SameIndividual(Vec<Individual>),
    DifferentIndividuals(Vec<Individual>),

    AnnotationAssertion {
        property: AnnotationProperty,
        subject: AnnotationSubject,
        value: AnnotationValue,
    },
    SubAnnotationPropertyOf {
        sub: AnnotationProperty,
        sup: AnnotationProperty,
    },
    AnnotationPropertyDomain {
        property: AnnotationProperty,
        domain: NamedNode,
    },
    AnnotationPropertyRange {
        property: AnnotationProperty,
        range: NamedNode,
    },
}

impl AxiomKind {
    /// Puts n-ary operands into a stable order so that equality is
    /// insensitive to how the axiom was written.
    pub fn canonical(self) -> Self {
        match self {
            Self::SubClassOf { sub, sup } => Self::SubClassOf {
                sub: sub.canonical(),
                sup: sup.canonical(),
            },
            Self::EquivalentClasses(operands) => Self::EquivalentClasses(canonical_expressions(operands)),
            Self::DisjointClasses(operands) => Self::DisjointClasses(canonical_expressions(operands)),
            Self::EquivalentObjectProperties(mut properties) => {
                canonical_sort(&mut properties);
                Self::EquivalentObjectProperties(properties)
            }
            Self::InverseObjectProperties(first, second) => {
                if first.to_string() <= second.to_string() {
                    Self::InverseObjectProperties(first, second)
                } else {
                    Self::InverseObjectProperties(second, first)
                }
            }
            Self::ObjectPropertyDomain { property, domain } => Self::ObjectPropertyDomain {
                property,
                domain: domain.canonical(),
            },
            Self::ObjectPropertyRange { property, range } => Self::ObjectPropertyRange {
                property,
                range: range.canonical(),
            },
            Self::EquivalentDataProperties(mut properties) => {
                canonical_sort(&mut properties);
                Self::EquivalentDataProperties(properties)
            }
            Self::DataPropertyDomain { property, domain } => Self::DataPropertyDomain {
                property,
                domain: domain.canonical(),
            },
            Self::ClassAssertion { class, individual } => Self::ClassAssertion {
                class: class.canonical(),
                individual,
            },
            Self::SameIndividual(mut individuals) => {
                canonical_sort(&mut individuals);
                Self::SameIndividual(individuals)
            }
            Self::DifferentIndividuals(mut individuals) => {
                canonical_sort(&mut individuals);
                Self::DifferentIndividuals(individuals)
            }
            other => other,
        }
    }

    fn keyword(&self) -> &'static str {
        match self {
            Self::Declaration(_) => "Declaration",
            Self::SubClassOf { .. } => "SubClassOf",
            Self::EquivalentClasses(_) => "EquivalentClasses",
            Self::DisjointClasses(_) => "DisjointClasses",
            Self::SubObjectPropertyOf { .. } => "SubObjectPropertyOf",
            Self::EquivalentObjectProperties(_) => "EquivalentObjectProperties",
            Self::InverseObjectProperties(..) => "InverseObjectProperties",
            Self::ObjectPropertyDomain { .. } => "ObjectPropertyDomain",
            Self::ObjectPropertyRange { .. } => "ObjectPropertyRange",
            Self::ObjectPropertyCharacteristic { characteristic, .. } => characteristic.keyword(),
            Self::SubDataPropertyOf { .. } => "SubDataPropertyOf",
            Self::EquivalentDataProperties(_) => "EquivalentDataProperties",
            Self::DataPropertyDomain { .. } => "DataPropertyDomain",
            Self::DataPropertyRange { .. } => "DataPropertyRange",
            Self::FunctionalDataProperty(_) => "FunctionalDataProperty",
            Self::ClassAssertion { .. } => "ClassAssertion",
            Self::ObjectPropertyAssertion { .. } => "ObjectPropertyAssertion",
            Self::DataPropertyAssertion { .. } => "DataPropertyAssertion",
            Self::SameIndividual(_) => "SameIndividual",
            Self::DifferentIndividuals(_) => "DifferentIndividuals",
            Self::AnnotationAssertion { .. } => "AnnotationAssertion",
            Self::SubAnnotationPropertyOf { .. } => "SubAnnotationPropertyOf",
            Self::AnnotationPropertyDomain { .. } => "AnnotationPropertyDomain",
            Self::AnnotationPropertyRange { .. } => "AnnotationPropertyRange",
        }
    }

    fn write_operands(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Declaration(entity) => write!(f, "{entity}"),
            Self::SubClassOf { sub, sup } => write!(f, "{sub} {sup}"),
            Self::EquivalentClasses(operands) | Self::DisjointClasses(operands) => write_joined(f, operands),
            Self::SubObjectPropertyOf { sub, sup } => write!(f, "{sub} {sup}"),
            Self::EquivalentObjectProperties(properties) => write_joined(f, properties),
            Self::InverseObjectProperties(first, second) => write!(f, "{first} {second}"),
            Self::ObjectPropertyDomain { property, domain } => write!(f, "{property} {domain}"),
            Self::ObjectPropertyRange { property, range } => write!(f, "{property} {range}"),
            Self::ObjectPropertyCharacteristic { property, .. } => write!(f, "{property}"),
            Self::SubDataPropertyOf { sub, sup } => write!(f, "{sub} {sup}"),
            Self::EquivalentDataProperties(properties) => write_joined(f, properties),
            Self::DataPropertyDomain { property, domain } => write!(f, "{property} {domain}"),
            Self::DataPropertyRange { property, datatype } => write!(f, "{property} {datatype}"),
            Self::FunctionalDataProperty(property) => write!(f, "{property}"),
            Self::ClassAssertion { class, individual } => write!(f, "{class} {individual}"),
            Self::ObjectPropertyAssertion { property, subject, object } => {
                write!(f, "{property} {subject} {object}")
            }
            Self::DataPropertyAssertion { property, subject, value } => {
                write!(f, "{property} {subject} {value}")
            }
            Self::SameIndividual(individuals) | Self::DifferentIndividuals(individuals) => {
                write_joined(f, individuals)
            }
            Self::AnnotationAssertion { property, subject, value } => {
                write!(f, "{property} {subject} {value}")
            }
            Self::SubAnnotationPropertyOf { sub, sup } => write!(f, "{sub} {sup}"),
            Self::AnnotationPropertyDomain { property, domain } => write!(f, "{property} {domain}"),
            Self::AnnotationPropertyRange { property, range } => write!(f, "{property} {range}"),
        }
    }
}

fn canonical_expressions(operands: Vec<ClassExpression>) -> Vec<ClassExpression> {
    let mut operands: Vec<_> = operands.into_iter().map(ClassExpression::canonical).collect();
    canonical_sort(&mut operands);
    operands
}

/// An OWL 2 axiom: an immutable structured statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Axiom {
    kind: AxiomKind,
    annotations: Vec<Annotation>,
}

impl Axiom {
    pub fn new(kind: AxiomKind, annotations: Vec<Annotation>) -> Self {
        let mut annotations = annotations;
        canonical_sort(&mut annotations);
        Self {
            kind: kind.canonical(),
            annotations,
        }
    }

    pub fn kind(&self) -> &AxiomKind {
        &self.kind
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn is_annotated(&self) -> bool {
        !self.annotations.is_empty()
    }

    /// Returns a copy carrying `extra` on top of the existing annotations.
    pub fn annotated(&self, extra: impl IntoIterator<Item = Annotation>) -> Self {
        let mut annotations = self.annotations.clone();
        annotations.extend(extra);
        canonical_sort(&mut annotations);
        Self {
            kind: self.kind.clone(),
            annotations,
        }
    }

    pub fn without_annotations(&self) -> Self {
        Self {
            kind: self.kind.clone(),
            annotations: Vec::new(),
        }
    }

    /// Logical axioms are the ones a reasoner takes into account.
    pub fn is_logical(&self) -> bool {
        !matches!(
            self.kind,
            AxiomKind::Declaration(_)
                | AxiomKind::AnnotationAssertion { .. }
                | AxiomKind::SubAnnotationPropertyOf { .. }
                | AxiomKind::AnnotationPropertyDomain { .. }
                | AxiomKind::AnnotationPropertyRange { .. }
        )
    }

    /// Named entities referenced by the axiom, annotations excluded.
    pub fn signature(&self) -> Vec<Entity> {
        let mut signature = Vec::new();
        match &self.kind {
            AxiomKind::Declaration(entity) => signature.push(entity.clone()),
            AxiomKind::SubClassOf { sub, sup } => {
                sub.collect_signature(&mut signature);
                sup.collect_signature(&mut signature);
            }
            AxiomKind::EquivalentClasses(operands) | AxiomKind::DisjointClasses(operands) => {
                for operand in operands {
                    operand.collect_signature(&mut signature);
                }
            }
            AxiomKind::SubObjectPropertyOf { sub, sup } => {
                signature.push(Entity::ObjectProperty(sub.clone()));
                signature.push(Entity::ObjectProperty(sup.clone()));
            }
            AxiomKind::EquivalentObjectProperties(properties) => {
                signature.extend(properties.iter().cloned().map(Entity::ObjectProperty));
            }
            AxiomKind::InverseObjectProperties(first, second) => {
                signature.push(Entity::ObjectProperty(first.clone()));
                signature.push(Entity::ObjectProperty(second.clone()));
            }
            AxiomKind::ObjectPropertyDomain { property, domain: expr }
            | AxiomKind::ObjectPropertyRange { property, range: expr } => {
                signature.push(Entity::ObjectProperty(property.clone()));
                expr.collect_signature(&mut signature);
            }
            AxiomKind::ObjectPropertyCharacteristic { property, .. } => {
                signature.push(Entity::ObjectProperty(property.clone()));
            }
            AxiomKind::SubDataPropertyOf { sub, sup } => {
                signature.push(Entity::DataProperty(sub.clone()));
                signature.push(Entity::DataProperty(sup.clone()));
            }
            AxiomKind::EquivalentDataProperties(properties) => {
                signature.extend(properties.iter().cloned().map(Entity::DataProperty));
            }
            AxiomKind::DataPropertyDomain { property, domain } => {
                signature.push(Entity::DataProperty(property.clone()));
                domain.collect_signature(&mut signature);
            }
            AxiomKind::DataPropertyRange { property, .. } | AxiomKind::FunctionalDataProperty(property) => {
                signature.push(Entity::DataProperty(property.clone()));
            }
            AxiomKind::ClassAssertion { class, individual } => {
                class.collect_signature(&mut signature);
                push_individual(&mut signature, individual);
            }
            AxiomKind::ObjectPropertyAssertion { property, subject, object } => {
                signature.push(Entity::ObjectProperty(property.clone()));
                push_individual(&mut signature, subject);
                push_individual(&mut signature, object);
            }
            AxiomKind::DataPropertyAssertion { property, subject, .. } => {
                signature.push(Entity::DataProperty(property.clone()));
                push_individual(&mut signature, subject);
            }
            AxiomKind::SameIndividual(individuals) | AxiomKind::DifferentIndividuals(individuals) => {
                for individual in individuals {
                    push_individual(&mut signature, individual);
                }
            }
            AxiomKind::AnnotationAssertion { property, .. }
            | AxiomKind::AnnotationPropertyDomain { property, .. }
            | AxiomKind::AnnotationPropertyRange { property, .. } => {
                signature.push(Entity::AnnotationProperty(property.clone()));
            }
            AxiomKind::SubAnnotationPropertyOf { sub, sup } => {
                signature.push(Entity::AnnotationProperty(sub.clone()));
                signature.push(Entity::AnnotationProperty(sup.clone()));
            }
        }
        signature
    }

    pub fn declaration(entity: Entity) -> Self {
        Self::new(AxiomKind::Declaration(entity), Vec::new())
    }

    pub fn subclass_of(sub: impl Into<ClassExpression>, sup: impl Into<ClassExpression>) -> Self {
        Self::new(
            AxiomKind::SubClassOf {
                sub: sub.into(),
                sup: sup.into(),
            },
            Vec::new(),
        )
    }

    pub fn class_assertion(class: impl Into<ClassExpression>, individual: impl Into<Individual>) -> Self {
        Self::new(
            AxiomKind::ClassAssertion {
                class: class.into(),
                individual: individual.into(),
            },
            Vec::new(),
        )
    }

    pub fn annotation_assertion(
        property: AnnotationProperty,
        subject: impl Into<AnnotationSubject>,
        value: impl Into<AnnotationValue>,
    ) -> Self {
        Self::new(
            AxiomKind::AnnotationAssertion {
                property,
                subject: subject.into(),
                value: value.into(),
            },
            Vec::new(),
        )
    }

    /// Named superclass of a `SubClassOf(A B)` between named classes.
    pub fn as_named_subclass(&self) -> Option<(&Class, &Class)> {
        match &self.kind {
            AxiomKind::SubClassOf { sub, sup } => Some((sub.as_class()?, sup.as_class()?)),
            _ => None,
        }
    }
}

fn push_individual(signature: &mut Vec<Entity>, individual: &Individual) {
    if let Individual::Named(iri) = individual {
        signature.push(Entity::NamedIndividual(iri.clone()));
    }
}

impl From<AxiomKind> for Axiom {
    fn from(kind: AxiomKind) -> Self {
        Self::new(kind, Vec::new())
    }
}

impl fmt::Display for Axiom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.kind.keyword())?;
        for annotation in &self.annotations {
            write!(f, "{annotation} ")?;
        }
        self.kind.write_operands(f)?;
        write!(f, ")")
    }
}
