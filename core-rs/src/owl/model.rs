//! OWL 2 entities, class expressions and annotations.
//!
//! Everything here is an immutable value: equality and hashing are
//! structural, which is what set semantics over axioms rely on.

use oxigraph::model::{BlankNode, Literal, NamedNode, Term};
use std::fmt;

use crate::vocab::owl as owl_vocab;

macro_rules! named_entity {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(NamedNode);

        impl $name {
            #[inline]
            pub fn new(iri: NamedNode) -> Self {
                Self(iri)
            }

            /// Builds the entity from an IRI string, validating it.
            pub fn from_iri(iri: impl Into<String>) -> Result<Self, oxigraph::model::IriParseError> {
                Ok(Self(NamedNode::new(iri)?))
            }

            #[inline]
            pub fn iri(&self) -> &NamedNode {
                &self.0
            }

            #[inline]
            pub fn into_inner(self) -> NamedNode {
                self.0
            }
        }

        impl From<NamedNode> for $name {
            fn from(iri: NamedNode) -> Self {
                Self(iri)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

named_entity!(
    /// An OWL class (`owl:Class`).
    Class
);
named_entity!(
    /// An object property (`owl:ObjectProperty`).
    ObjectProperty
);
named_entity!(
    /// A data property (`owl:DatatypeProperty`).
    DataProperty
);
named_entity!(
    /// An annotation property (`owl:AnnotationProperty`).
    AnnotationProperty
);

impl Class {
    pub fn thing() -> Self {
        Self(owl_vocab::THING.into_owned())
    }

    pub fn nothing() -> Self {
        Self(owl_vocab::NOTHING.into_owned())
    }

    pub fn is_thing(&self) -> bool {
        self.0.as_ref() == owl_vocab::THING
    }

    pub fn is_nothing(&self) -> bool {
        self.0.as_ref() == owl_vocab::NOTHING
    }
}

/// An individual, either named by an IRI or anonymous (blank node).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Individual {
    Named(NamedNode),
    Anonymous(BlankNode),
}

impl Individual {
    pub fn as_named(&self) -> Option<&NamedNode> {
        match self {
            Self::Named(iri) => Some(iri),
            Self::Anonymous(_) => None,
        }
    }
}

impl From<NamedNode> for Individual {
    fn from(iri: NamedNode) -> Self {
        Self::Named(iri)
    }
}

impl From<BlankNode> for Individual {
    fn from(node: BlankNode) -> Self {
        Self::Anonymous(node)
    }
}

impl fmt::Display for Individual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(iri) => write!(f, "{iri}"),
            Self::Anonymous(node) => write!(f, "{node}"),
        }
    }
}

/// A named entity, as it appears in declarations and signatures.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Entity {
    Class(Class),
    ObjectProperty(ObjectProperty),
    DataProperty(DataProperty),
    AnnotationProperty(AnnotationProperty),
    NamedIndividual(NamedNode),
}

impl Entity {
    pub fn iri(&self) -> &NamedNode {
        match self {
            Self::Class(c) => c.iri(),
            Self::ObjectProperty(p) => p.iri(),
            Self::DataProperty(p) => p.iri(),
            Self::AnnotationProperty(p) => p.iri(),
            Self::NamedIndividual(iri) => iri,
        }
    }

    /// Functional-syntax keyword of the entity type.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Class(_) => "Class",
            Self::ObjectProperty(_) => "ObjectProperty",
            Self::DataProperty(_) => "DataProperty",
            Self::AnnotationProperty(_) => "AnnotationProperty",
            Self::NamedIndividual(_) => "NamedIndividual",
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.keyword(), self.iri())
    }
}

/// An OWL 2 class expression.
///
/// Operand lists of intersections and unions have set semantics; use
/// [`ClassExpression::canonical`] (applied by [`crate::owl::Axiom::new`]) to
/// put them in a stable order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ClassExpression {
    Class(Class),
    ObjectSomeValuesFrom {
        property: ObjectProperty,
        filler: Box<ClassExpression>,
    },
    ObjectAllValuesFrom {
        property: ObjectProperty,
        filler: Box<ClassExpression>,
    },
    ObjectHasValue {
        property: ObjectProperty,
        value: Individual,
    },
    ObjectIntersectionOf(Vec<ClassExpression>),
    ObjectUnionOf(Vec<ClassExpression>),
    ObjectComplementOf(Box<ClassExpression>),
}

impl ClassExpression {
    pub fn some(property: ObjectProperty, filler: impl Into<ClassExpression>) -> Self {
        Self::ObjectSomeValuesFrom {
            property,
            filler: Box::new(filler.into()),
        }
    }

    pub fn only(property: ObjectProperty, filler: impl Into<ClassExpression>) -> Self {
        Self::ObjectAllValuesFrom {
            property,
            filler: Box::new(filler.into()),
        }
    }

    pub fn as_class(&self) -> Option<&Class> {
        match self {
            Self::Class(c) => Some(c),
            _ => None,
        }
    }

    pub fn is_anonymous(&self) -> bool {
        !matches!(self, Self::Class(_))
    }

    /// Returns the expression with every n-ary operand list sorted and deduplicated.
    pub fn canonical(self) -> Self {
        match self {
            Self::Class(_) | Self::ObjectHasValue { .. } => self,
            Self::ObjectSomeValuesFrom { property, filler } => Self::ObjectSomeValuesFrom {
                property,
                filler: Box::new(filler.canonical()),
            },
            Self::ObjectAllValuesFrom { property, filler } => Self::ObjectAllValuesFrom {
                property,
                filler: Box::new(filler.canonical()),
            },
            Self::ObjectIntersectionOf(operands) => {
                Self::ObjectIntersectionOf(canonical_operands(operands))
            }
            Self::ObjectUnionOf(operands) => Self::ObjectUnionOf(canonical_operands(operands)),
            Self::ObjectComplementOf(inner) => Self::ObjectComplementOf(Box::new(inner.canonical())),
        }
    }

    /// Collects the named entities this expression mentions.
    pub fn collect_signature(&self, into: &mut Vec<Entity>) {
        match self {
            Self::Class(c) => into.push(Entity::Class(c.clone())),
            Self::ObjectSomeValuesFrom { property, filler }
            | Self::ObjectAllValuesFrom { property, filler } => {
                into.push(Entity::ObjectProperty(property.clone()));
                filler.collect_signature(into);
            }
            Self::ObjectHasValue { property, value } => {
                into.push(Entity::ObjectProperty(property.clone()));
                if let Individual::Named(iri) = value {
                    into.push(Entity::NamedIndividual(iri.clone()));
                }
            }
            Self::ObjectIntersectionOf(operands) | Self::ObjectUnionOf(operands) => {
                for operand in operands {
                    operand.collect_signature(into);
                }
            }
            Self::ObjectComplementOf(inner) => inner.collect_signature(into),
        }
    }
}

fn canonical_operands(operands: Vec<ClassExpression>) -> Vec<ClassExpression> {
    let mut operands: Vec<_> = operands.into_iter().map(ClassExpression::canonical).collect();
    canonical_sort(&mut operands);
    operands
}

/// Sorts by functional-syntax rendering and drops duplicates.
pub(crate) fn canonical_sort<T: fmt::Display + PartialEq>(items: &mut Vec<T>) {
    items.sort_by_cached_key(|item| item.to_string());
    items.dedup();
}

impl From<Class> for ClassExpression {
    fn from(class: Class) -> Self {
        Self::Class(class)
    }
}

impl From<NamedNode> for ClassExpression {
    fn from(iri: NamedNode) -> Self {
        Self::Class(Class::new(iri))
    }
}

impl fmt::Display for ClassExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class(c) => write!(f, "{c}"),
            Self::ObjectSomeValuesFrom { property, filler } => {
                write!(f, "ObjectSomeValuesFrom({property} {filler})")
            }
            Self::ObjectAllValuesFrom { property, filler } => {
                write!(f, "ObjectAllValuesFrom({property} {filler})")
            }
            Self::ObjectHasValue { property, value } => write!(f, "ObjectHasValue({property} {value})"),
            Self::ObjectIntersectionOf(operands) => {
                write!(f, "ObjectIntersectionOf(")?;
                write_joined(f, operands)?;
                write!(f, ")")
            }
            Self::ObjectUnionOf(operands) => {
                write!(f, "ObjectUnionOf(")?;
                write_joined(f, operands)?;
                write!(f, ")")
            }
            Self::ObjectComplementOf(inner) => write!(f, "ObjectComplementOf({inner})"),
        }
    }
}

pub(crate) fn write_joined<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, " ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

/// Subject of an annotation assertion.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AnnotationSubject {
    Iri(NamedNode),
    Anonymous(BlankNode),
}

impl AnnotationSubject {
    pub fn as_iri(&self) -> Option<&NamedNode> {
        match self {
            Self::Iri(iri) => Some(iri),
            Self::Anonymous(_) => None,
        }
    }
}

impl From<NamedNode> for AnnotationSubject {
    fn from(iri: NamedNode) -> Self {
        Self::Iri(iri)
    }
}

impl From<BlankNode> for AnnotationSubject {
    fn from(node: BlankNode) -> Self {
        Self::Anonymous(node)
    }
}

impl fmt::Display for AnnotationSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iri(iri) => write!(f, "{iri}"),
            Self::Anonymous(node) => write!(f, "{node}"),
        }
    }
}

/// Value of an annotation: an IRI, a literal or an anonymous individual.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AnnotationValue {
    Iri(NamedNode),
    Literal(Literal),
    Anonymous(BlankNode),
}

impl AnnotationValue {
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Self::Literal(literal) => Some(literal),
            _ => None,
        }
    }

    pub fn as_iri(&self) -> Option<&NamedNode> {
        match self {
            Self::Iri(iri) => Some(iri),
            _ => None,
        }
    }
}

impl From<NamedNode> for AnnotationValue {
    fn from(iri: NamedNode) -> Self {
        Self::Iri(iri)
    }
}

impl From<Literal> for AnnotationValue {
    fn from(literal: Literal) -> Self {
        Self::Literal(literal)
    }
}

impl From<AnnotationValue> for Term {
    fn from(value: AnnotationValue) -> Self {
        match value {
            AnnotationValue::Iri(iri) => iri.into(),
            AnnotationValue::Literal(literal) => literal.into(),
            AnnotationValue::Anonymous(node) => node.into(),
        }
    }
}

impl fmt::Display for AnnotationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iri(iri) => write!(f, "{iri}"),
            Self::Literal(literal) => write!(f, "{literal}"),
            Self::Anonymous(node) => write!(f, "{node}"),
        }
    }
}

/// An annotation `(property, value)`, attached to an axiom or an ontology.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Annotation {
    pub property: AnnotationProperty,
    pub value: AnnotationValue,
}

impl Annotation {
    pub fn new(property: AnnotationProperty, value: impl Into<AnnotationValue>) -> Self {
        Self {
            property,
            value: value.into(),
        }
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Annotation({} {})", self.property, self.value)
    }
}
