/**
 * reason/mod.rs
 * Uniform reasoner entry point: check consistency, materialize inferred
 * axioms through pluggable reasoner backends, filter and annotate them
 */

pub mod options;
pub mod structural;

pub use options::{AxiomGenerator, ReasonOptions};
pub use structural::{StructuralReasoner, StructuralReasonerFactory};

use oxigraph::model::Literal;
use rustc_hash::FxHashSet;
use tracing::{debug, info, warn};

use crate::errors::{ExpandError, Result};
use crate::expand::{apply, ResultSet};
use crate::owl::{Annotation, Axiom, AxiomKind, AxiomSet, Class, ClassExpression, Entity, Imports, Ontology};
use crate::vocab;

/// Answers entailment questions about one ontology.
pub trait Reasoner: Send + Sync {
    fn is_consistent(&self) -> bool;

    /// Named classes equivalent to `owl:Nothing`, `owl:Nothing` excluded.
    fn unsatisfiable_classes(&self) -> Vec<Class>;

    /// Entailed named superclasses. With `direct`, only the most specific ones.
    fn super_classes(&self, class: &Class, direct: bool) -> Vec<Class>;

    fn equivalent_classes(&self, class: &Class) -> Vec<Class>;

    /// Axioms of the given kind entailed by the ontology, asserted ones included.
    fn infer(&self, generator: AxiomGenerator) -> AxiomSet;
}

/// Builds reasoners; one factory per backend.
pub trait ReasonerFactory: Send + Sync {
    fn name(&self) -> &str;

    fn create(&self, ontology: &Ontology) -> Result<Box<dyn Reasoner>>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReasonReport {
    pub reasoner: String,
    /// Axioms produced by the generators before filtering.
    pub inferred: usize,
    pub added: usize,
    pub removed: usize,
    pub redundant_removed: usize,
}

/// Classifies the ontology and writes the inferred axioms back into it.
///
/// Fails with [`ExpandError::Inconsistent`] or
/// [`ExpandError::UnsatisfiableClasses`] before touching the ontology.
pub fn reason(ontology: &mut Ontology, factory: &dyn ReasonerFactory, options: &ReasonOptions) -> Result<ReasonReport> {
    info!(ontology = %ontology, reasoner = factory.name(), "Reasoning over ontology");
    let reasoner = factory.create(ontology)?;

    if !reasoner.is_consistent() {
        return Err(ExpandError::Inconsistent);
    }
    let unsatisfiable = reasoner.unsatisfiable_classes();
    if !unsatisfiable.is_empty() {
        warn!(count = unsatisfiable.len(), "Ontology has unsatisfiable classes");
        return Err(ExpandError::UnsatisfiableClasses(
            unsatisfiable.iter().map(|c| c.iri().as_str().to_string()).collect(),
        ));
    }

    let mut inferred = AxiomSet::default();
    for generator in &options.axiom_generators {
        let axioms = reasoner.infer(*generator);
        debug!(generator = %generator, axioms = axioms.len(), "Generated inferred axioms");
        inferred.extend(axioms);
    }
    let produced = inferred.len();

    let filter = InferenceFilter::new(ontology, options);
    let kept: ResultSet = inferred
        .into_iter()
        .filter(|axiom| filter.keep(axiom))
        .map(|axiom| {
            if options.annotate_inferred_axioms {
                axiom.annotated([is_inferred()])
            } else {
                axiom
            }
        })
        .collect();
    debug!(produced, kept = kept.len(), "Filtered inferred axioms");

    let applied = apply(ontology, kept, options.create_new_ontology)?;

    let redundant_removed = if options.remove_redundant_subclass_axioms {
        remove_redundant_subclass_axioms(ontology, reasoner.as_ref())
    } else {
        0
    };

    info!(
        inferred = produced,
        added = applied.added,
        removed = applied.removed,
        redundant_removed,
        "Reasoning applied"
    );
    Ok(ReasonReport {
        reasoner: factory.name().to_string(),
        inferred: produced,
        added: applied.added,
        removed: applied.removed,
        redundant_removed,
    })
}

fn is_inferred() -> Annotation {
    Annotation::new(vocab::IS_INFERRED.clone(), Literal::new_simple_literal("true"))
}

struct InferenceFilter<'a> {
    ontology: &'a Ontology,
    options: &'a ReasonOptions,
    own_signature: FxHashSet<Entity>,
}

impl<'a> InferenceFilter<'a> {
    fn new(ontology: &'a Ontology, options: &'a ReasonOptions) -> Self {
        let own_signature = if options.exclude_external_entities {
            ontology
                .axioms(Imports::Excluded)
                .flat_map(Axiom::signature)
                .collect()
        } else {
            FxHashSet::default()
        };
        Self {
            ontology,
            options,
            own_signature,
        }
    }

    fn keep(&self, axiom: &Axiom) -> bool {
        if self.options.exclude_tautologies && is_tautology(axiom) {
            return false;
        }
        if self.options.exclude_owl_thing && mentions_thing(axiom) {
            return false;
        }
        if self.options.exclude_external_entities && self.is_external(axiom) {
            return false;
        }
        if self.options.exclude_duplicate_axioms
            && self.ontology.contains_axiom(&axiom.without_annotations(), Imports::Included)
        {
            return false;
        }
        true
    }

    /// No entity of the axiom, builtins aside, appears in the ontology itself.
    fn is_external(&self, axiom: &Axiom) -> bool {
        let mut entities = axiom
            .signature()
            .into_iter()
            .filter(|entity| !is_builtin(entity))
            .peekable();
        entities.peek().is_some() && entities.all(|entity| !self.own_signature.contains(&entity))
    }
}

fn is_builtin(entity: &Entity) -> bool {
    matches!(entity, Entity::Class(class) if class.is_thing() || class.is_nothing())
}

fn mentions_thing(axiom: &Axiom) -> bool {
    axiom
        .signature()
        .iter()
        .any(|entity| matches!(entity, Entity::Class(class) if class.is_thing()))
}

fn is_tautology(axiom: &Axiom) -> bool {
    let is = |expression: &ClassExpression, check: fn(&Class) -> bool| expression.as_class().is_some_and(check);
    match axiom.kind() {
        AxiomKind::SubClassOf { sub, sup } => {
            sub == sup || is(sup, Class::is_thing) || is(sub, Class::is_nothing)
        }
        AxiomKind::ClassAssertion { class, .. } => is(class, Class::is_thing),
        AxiomKind::EquivalentClasses(operands) => operands.len() < 2,
        _ => false,
    }
}

/// Removes asserted `SubClassOf(A B)` between named classes when `B` is
/// entailed through another superclass of `A`. Annotated axioms are kept.
fn remove_redundant_subclass_axioms(ontology: &mut Ontology, reasoner: &dyn Reasoner) -> usize {
    let redundant: Vec<Axiom> = ontology
        .axioms(Imports::Excluded)
        .filter(|axiom| !axiom.is_annotated())
        .filter(|axiom| {
            let Some((sub, sup)) = axiom.as_named_subclass() else {
                return false;
            };
            if sub == sup || reasoner.equivalent_classes(sub).contains(sup) {
                return false;
            }
            !reasoner.super_classes(sub, true).contains(sup)
        })
        .cloned()
        .collect();
    for axiom in &redundant {
        debug!(axiom = %axiom, "Removing redundant subclass axiom");
    }
    ontology.remove_axioms(&redundant)
}
