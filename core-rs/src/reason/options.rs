//! Reasoning options and axiom generator selection.

use std::fmt;
use std::str::FromStr;

use crate::errors::{ExpandError, Result};

/// Kinds of inferred axioms a reasoner is asked to materialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AxiomGenerator {
    SubClass,
    EquivalentClass,
    DisjointClasses,
    ClassAssertion,
    PropertyAssertion,
    SubObjectProperty,
    EquivalentObjectProperty,
    InverseObjectProperties,
    SubDataProperty,
    EquivalentDataProperties,
}

impl AxiomGenerator {
    pub const ALL: [AxiomGenerator; 10] = [
        Self::SubClass,
        Self::EquivalentClass,
        Self::DisjointClasses,
        Self::ClassAssertion,
        Self::PropertyAssertion,
        Self::SubObjectProperty,
        Self::EquivalentObjectProperty,
        Self::InverseObjectProperties,
        Self::SubDataProperty,
        Self::EquivalentDataProperties,
    ];

    /// Name used on the command line and in configuration files.
    pub fn name(self) -> &'static str {
        match self {
            Self::SubClass => "Subclass",
            Self::EquivalentClass => "EquivalentClass",
            Self::DisjointClasses => "DisjointClasses",
            Self::ClassAssertion => "ClassAssertion",
            Self::PropertyAssertion => "PropertyAssertion",
            Self::SubObjectProperty => "SubObjectProperty",
            Self::EquivalentObjectProperty => "EquivalentObjectProperty",
            Self::InverseObjectProperties => "InverseObjectProperties",
            Self::SubDataProperty => "SubDataProperty",
            Self::EquivalentDataProperties => "EquivalentDataProperties",
        }
    }

    /// Parses a whitespace separated list such as `"EquivalentClass Subclass"`.
    pub fn parse_list(list: &str) -> Result<Vec<AxiomGenerator>> {
        let mut generators = Vec::new();
        for name in list.split_whitespace() {
            let generator: AxiomGenerator = name.parse()?;
            if !generators.contains(&generator) {
                generators.push(generator);
            }
        }
        Ok(generators)
    }
}

impl FromStr for AxiomGenerator {
    type Err = ExpandError;

    /// Names match case-insensitively, so `SubClass` and `Subclass` both work.
    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|generator| generator.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| ExpandError::UnknownAxiomGenerator(s.to_string()))
    }
}

impl fmt::Display for AxiomGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReasonOptions {
    /// Replace the ontology's axioms with the inferred ones.
    pub create_new_ontology: bool,
    /// Tag inferred axioms with `oboInOwl:is_inferred "true"`.
    pub annotate_inferred_axioms: bool,
    /// Drop inferred axioms already asserted in the imports closure.
    pub exclude_duplicate_axioms: bool,
    /// Remove asserted named subclass axioms implied by another superclass.
    pub remove_redundant_subclass_axioms: bool,
    /// Drop `SubClassOf(X owl:Thing)`, `SubClassOf(owl:Nothing X)`,
    /// `SubClassOf(X X)` and `ClassAssertion(owl:Thing x)`.
    pub exclude_tautologies: bool,
    /// Drop inferred axioms whose entities all come from imports.
    pub exclude_external_entities: bool,
    /// Drop inferred axioms mentioning `owl:Thing`.
    pub exclude_owl_thing: bool,
    pub axiom_generators: Vec<AxiomGenerator>,
}

impl Default for ReasonOptions {
    fn default() -> Self {
        Self {
            create_new_ontology: false,
            annotate_inferred_axioms: false,
            exclude_duplicate_axioms: false,
            remove_redundant_subclass_axioms: true,
            exclude_tautologies: false,
            exclude_external_entities: false,
            exclude_owl_thing: false,
            axiom_generators: vec![AxiomGenerator::SubClass],
        }
    }
}
