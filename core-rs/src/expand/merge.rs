//! Union of per-template results.
//!
//! [`ResultSet::combine`] is set union: commutative, associative and
//! idempotent with [`ResultSet::empty`] as identity. That makes a sequential
//! fold and a parallel reduction over templates give the same set.

use rayon::prelude::*;

use crate::owl::{Axiom, AxiomSet};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    axioms: AxiomSet,
}

impl ResultSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.axioms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.axioms.is_empty()
    }

    pub fn contains(&self, axiom: &Axiom) -> bool {
        self.axioms.contains(axiom)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Axiom> + '_ {
        self.axioms.iter()
    }

    pub fn into_axioms(self) -> AxiomSet {
        self.axioms
    }

    pub fn combine(self, other: Self) -> Self {
        // extend the larger side
        let (mut larger, smaller) = if self.axioms.len() >= other.axioms.len() {
            (self, other)
        } else {
            (other, self)
        };
        larger.axioms.extend(smaller.axioms);
        larger
    }
}

impl From<AxiomSet> for ResultSet {
    fn from(axioms: AxiomSet) -> Self {
        Self { axioms }
    }
}

impl FromIterator<Axiom> for ResultSet {
    fn from_iter<I: IntoIterator<Item = Axiom>>(iter: I) -> Self {
        Self {
            axioms: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ResultSet {
    type Item = Axiom;
    type IntoIter = std::collections::hash_set::IntoIter<Axiom>;

    fn into_iter(self) -> Self::IntoIter {
        self.axioms.into_iter()
    }
}

pub fn combine(a: ResultSet, b: ResultSet) -> ResultSet {
    a.combine(b)
}

/// Folds any number of result sets; zero sets give the empty set.
pub fn combine_all(sets: impl IntoIterator<Item = ResultSet>) -> ResultSet {
    sets.into_iter().fold(ResultSet::empty(), combine)
}

/// Parallel reduction with the same result as [`combine_all`].
pub fn par_combine_all(sets: Vec<ResultSet>) -> ResultSet {
    sets.into_par_iter().reduce(ResultSet::empty, combine)
}
