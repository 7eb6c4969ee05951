// Result Combination Contract Tests
//
// Per-template results are combined by set union. Parallel expansion relies
// on the union being a commutative monoid: any reduction order gives the
// same set.

use ontomacro_core::expand::{combine, combine_all, par_combine_all};
use ontomacro_core::owl::Axiom;
use ontomacro_core::ResultSet;
use oxigraph::model::NamedNode;

fn iri(s: &str) -> NamedNode {
    NamedNode::new_unchecked(format!("http://example.org/{s}"))
}

fn set(pairs: &[(&str, &str)]) -> ResultSet {
    pairs
        .iter()
        .map(|(sub, sup)| Axiom::subclass_of(iri(sub), iri(sup)))
        .collect()
}

fn samples() -> Vec<ResultSet> {
    vec![
        set(&[("A", "B"), ("B", "C")]),
        set(&[("B", "C"), ("C", "D")]),
        set(&[]),
        set(&[("X", "Y")]),
    ]
}

/// WHY: Order of template completion must not matter
/// REASON: rayon reduces in an unspecified order
/// BREAKS: Parallel and sequential runs would disagree
#[test]
fn union_is_commutative_and_associative() {
    let sets = samples();
    for a in &sets {
        for b in &sets {
            assert_eq!(combine(a.clone(), b.clone()), combine(b.clone(), a.clone()));
            for c in &sets {
                let left = combine(combine(a.clone(), b.clone()), c.clone());
                let right = combine(a.clone(), combine(b.clone(), c.clone()));
                assert_eq!(left, right);
            }
        }
    }
}

/// WHY: The empty result is the identity, combining a set with itself is a no-op
/// REASON: Failed templates contribute the empty set
/// BREAKS: A failing template would change the output of the others
#[test]
fn empty_is_identity_and_union_is_idempotent() {
    for a in samples() {
        assert_eq!(combine(a.clone(), ResultSet::empty()), a);
        assert_eq!(combine(ResultSet::empty(), a.clone()), a);
        assert_eq!(combine(a.clone(), a.clone()), a);
    }
    assert!(combine_all(Vec::new()).is_empty());
}

/// WHY: Parallel reduction equals the sequential fold
/// REASON: The parallel flag is a performance switch only
/// BREAKS: Output would depend on thread scheduling
#[test]
fn parallel_and_sequential_folds_agree() {
    let sequential = combine_all(samples());
    let parallel = par_combine_all(samples());
    assert_eq!(sequential, parallel);
    assert_eq!(sequential.len(), 4);
}
