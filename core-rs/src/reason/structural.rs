//! Built-in structural reasoner.
//!
//! Saturates the told structure of an ontology: named class hierarchy with
//! equivalences, conjunctions and existential restrictions over named
//! fillers, property hierarchies, inverse, symmetric and transitive
//! properties, domains and ranges, and disjointness. Anything outside that
//! fragment is ignored, so entailments are sound but not complete.

use oxigraph::model::Literal;
use rustc_hash::{FxHashMap, FxHashSet};
use std::hash::Hash;
use tracing::debug;

use super::options::AxiomGenerator;
use super::{Reasoner, ReasonerFactory};
use crate::errors::Result;
use crate::owl::{
    Axiom, AxiomKind, AxiomSet, Class, ClassExpression, DataProperty, Entity, Imports, Individual,
    ObjectProperty, Ontology, PropertyCharacteristic,
};

type Closure<T> = FxHashMap<T, FxHashSet<T>>;

#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralReasonerFactory;

impl ReasonerFactory for StructuralReasonerFactory {
    fn name(&self) -> &str {
        "structural"
    }

    fn create(&self, ontology: &Ontology) -> Result<Box<dyn Reasoner>> {
        Ok(Box::new(StructuralReasoner::new(ontology)))
    }
}

/// `conjuncts ⊓ ∃r.F ⊓ ...` implies `target`.
#[derive(Debug, Clone)]
struct Definition {
    conjuncts: Vec<Class>,
    existentials: Vec<(ObjectProperty, Class)>,
    target: Class,
}

/// Splits an expression into named conjuncts and `∃r.Named` parts.
/// Returns false if some part could not be represented.
fn decompose(
    expression: &ClassExpression,
    conjuncts: &mut Vec<Class>,
    existentials: &mut Vec<(ObjectProperty, Class)>,
) -> bool {
    match expression {
        ClassExpression::Class(class) => {
            conjuncts.push(class.clone());
            true
        }
        ClassExpression::ObjectSomeValuesFrom { property, filler } => match filler.as_class() {
            Some(filler) => {
                existentials.push((property.clone(), filler.clone()));
                true
            }
            None => false,
        },
        ClassExpression::ObjectIntersectionOf(operands) => {
            let mut complete = true;
            for operand in operands {
                complete &= decompose(operand, conjuncts, existentials);
            }
            complete
        }
        _ => false,
    }
}

fn transitive_closure<T: Clone + Eq + Hash>(nodes: &[T], edges: &FxHashMap<T, FxHashSet<T>>) -> Closure<T> {
    let mut closure = Closure::default();
    for node in nodes {
        let mut reached = FxHashSet::default();
        let mut stack = vec![node.clone()];
        while let Some(current) = stack.pop() {
            if let Some(next) = edges.get(&current) {
                stack.extend(next.iter().filter(|n| !reached.contains(*n)).cloned());
            }
            reached.insert(current);
        }
        closure.insert(node.clone(), reached);
    }
    closure
}

/// Members of the closure that reach back to `item`, `item` included.
fn equivalents_in<T: Clone + Eq + Hash>(item: &T, closure: &Closure<T>) -> FxHashSet<T> {
    let Some(supers) = closure.get(item) else {
        return FxHashSet::default();
    };
    supers
        .iter()
        .filter(|s| closure.get(*s).is_some_and(|back| back.contains(item)))
        .cloned()
        .collect()
}

/// Strict supers with nothing strictly between them and `item`.
fn direct_in<T: Clone + Eq + Hash>(item: &T, closure: &Closure<T>) -> Vec<T> {
    let Some(supers) = closure.get(item) else {
        return Vec::new();
    };
    let equivalent = equivalents_in(item, closure);
    let candidates: Vec<&T> = supers.iter().filter(|s| !equivalent.contains(*s)).collect();
    let strictly_below = |lower: &T, upper: &T| {
        closure.get(lower).is_some_and(|s| s.contains(upper))
            && !closure.get(upper).is_some_and(|s| s.contains(lower))
    };
    candidates
        .iter()
        .filter(|candidate| {
            !candidates
                .iter()
                .any(|other| strictly_below(other, candidate))
        })
        .map(|candidate| (*candidate).clone())
        .collect()
}

/// Groups of two or more mutually subsuming items.
fn equivalence_groups<T: Clone + Eq + Hash>(items: &[T], closure: &Closure<T>) -> Vec<Vec<T>> {
    let mut seen: FxHashSet<T> = FxHashSet::default();
    let mut groups = Vec::new();
    for item in items {
        if seen.contains(item) {
            continue;
        }
        let group: Vec<T> = equivalents_in(item, closure).into_iter().collect();
        seen.extend(group.iter().cloned());
        if group.len() > 1 {
            groups.push(group);
        }
    }
    groups
}

/// Saturated told structure of one ontology and its imports.
pub struct StructuralReasoner {
    classes: Vec<Class>,
    class_supers: Closure<Class>,
    object_properties: Vec<ObjectProperty>,
    object_supers: Closure<ObjectProperty>,
    data_properties: Vec<DataProperty>,
    data_supers: Closure<DataProperty>,
    inverses: FxHashSet<(ObjectProperty, ObjectProperty)>,
    disjoint: Vec<(Class, Class)>,
    types: FxHashMap<Individual, FxHashSet<Class>>,
    object_assertions: FxHashSet<(ObjectProperty, Individual, Individual)>,
    data_assertions: FxHashSet<(DataProperty, Individual, Literal)>,
    consistent: bool,
}

impl StructuralReasoner {
    pub fn new(ontology: &Ontology) -> Self {
        let axioms: Vec<&Axiom> = ontology.axioms(Imports::Included).collect();

        let mut classes: FxHashSet<Class> = [Class::thing(), Class::nothing()].into_iter().collect();
        let mut object_properties: FxHashSet<ObjectProperty> = FxHashSet::default();
        let mut data_properties: FxHashSet<DataProperty> = FxHashSet::default();
        let mut individuals: FxHashSet<Individual> = FxHashSet::default();
        for axiom in &axioms {
            for entity in axiom.signature() {
                match entity {
                    Entity::Class(class) => {
                        classes.insert(class);
                    }
                    Entity::ObjectProperty(property) => {
                        object_properties.insert(property);
                    }
                    Entity::DataProperty(property) => {
                        data_properties.insert(property);
                    }
                    Entity::NamedIndividual(iri) => {
                        individuals.insert(Individual::Named(iri));
                    }
                    Entity::AnnotationProperty(_) => {}
                }
            }
        }

        let mut class_edges: FxHashMap<Class, FxHashSet<Class>> = FxHashMap::default();
        let mut told_existentials: FxHashMap<Class, Vec<(ObjectProperty, Class)>> = FxHashMap::default();
        let mut definitions: Vec<Definition> = Vec::new();
        let mut disjoint: Vec<(Class, Class)> = Vec::new();
        let mut object_edges: FxHashMap<ObjectProperty, FxHashSet<ObjectProperty>> = FxHashMap::default();
        let mut data_edges: FxHashMap<DataProperty, FxHashSet<DataProperty>> = FxHashMap::default();
        let mut told_inverses: Vec<(ObjectProperty, ObjectProperty)> = Vec::new();
        let mut symmetric: FxHashSet<ObjectProperty> = FxHashSet::default();
        let mut transitive: FxHashSet<ObjectProperty> = FxHashSet::default();
        let mut irreflexive: FxHashSet<ObjectProperty> = FxHashSet::default();
        let mut asymmetric: FxHashSet<ObjectProperty> = FxHashSet::default();
        let mut object_domains: FxHashMap<ObjectProperty, Vec<Class>> = FxHashMap::default();
        let mut object_ranges: FxHashMap<ObjectProperty, Vec<Class>> = FxHashMap::default();
        let mut data_domains: FxHashMap<DataProperty, Vec<Class>> = FxHashMap::default();
        let mut types: FxHashMap<Individual, FxHashSet<Class>> = FxHashMap::default();
        let mut object_assertions: FxHashSet<(ObjectProperty, Individual, Individual)> = FxHashSet::default();
        let mut data_assertions: FxHashSet<(DataProperty, Individual, Literal)> = FxHashSet::default();

        let mut subsumptions: Vec<(&ClassExpression, &ClassExpression)> = Vec::new();

        for axiom in &axioms {
            match axiom.kind() {
                AxiomKind::SubClassOf { sub, sup } => subsumptions.push((sub, sup)),
                AxiomKind::EquivalentClasses(operands) => {
                    for first in operands {
                        for second in operands {
                            if first != second {
                                subsumptions.push((first, second));
                            }
                        }
                    }
                }
                AxiomKind::DisjointClasses(operands) => {
                    let named: Vec<&Class> = operands.iter().filter_map(|o| o.as_class()).collect();
                    for (i, first) in named.iter().enumerate() {
                        for second in &named[i + 1..] {
                            disjoint.push(((*first).clone(), (*second).clone()));
                        }
                    }
                }
                AxiomKind::SubObjectPropertyOf { sub, sup } => {
                    object_edges.entry(sub.clone()).or_default().insert(sup.clone());
                }
                AxiomKind::EquivalentObjectProperties(properties) => {
                    for first in properties {
                        object_edges.entry(first.clone()).or_default().extend(properties.iter().cloned());
                    }
                }
                AxiomKind::InverseObjectProperties(first, second) => {
                    told_inverses.push((first.clone(), second.clone()));
                }
                AxiomKind::ObjectPropertyDomain { property, domain } => {
                    let mut conjuncts = Vec::new();
                    decompose(domain, &mut conjuncts, &mut Vec::new());
                    object_domains.entry(property.clone()).or_default().extend(conjuncts);
                }
                AxiomKind::ObjectPropertyRange { property, range } => {
                    let mut conjuncts = Vec::new();
                    decompose(range, &mut conjuncts, &mut Vec::new());
                    object_ranges.entry(property.clone()).or_default().extend(conjuncts);
                }
                AxiomKind::ObjectPropertyCharacteristic { property, characteristic } => {
                    let target = match characteristic {
                        PropertyCharacteristic::Symmetric => &mut symmetric,
                        PropertyCharacteristic::Transitive => &mut transitive,
                        PropertyCharacteristic::Irreflexive => &mut irreflexive,
                        PropertyCharacteristic::Asymmetric => &mut asymmetric,
                        _ => continue,
                    };
                    target.insert(property.clone());
                }
                AxiomKind::SubDataPropertyOf { sub, sup } => {
                    data_edges.entry(sub.clone()).or_default().insert(sup.clone());
                }
                AxiomKind::EquivalentDataProperties(properties) => {
                    for first in properties {
                        data_edges.entry(first.clone()).or_default().extend(properties.iter().cloned());
                    }
                }
                AxiomKind::DataPropertyDomain { property, domain } => {
                    let mut conjuncts = Vec::new();
                    decompose(domain, &mut conjuncts, &mut Vec::new());
                    data_domains.entry(property.clone()).or_default().extend(conjuncts);
                }
                AxiomKind::ClassAssertion { class, individual } => {
                    let mut conjuncts = Vec::new();
                    decompose(class, &mut conjuncts, &mut Vec::new());
                    types.entry(individual.clone()).or_default().extend(conjuncts);
                    individuals.insert(individual.clone());
                }
                AxiomKind::ObjectPropertyAssertion { property, subject, object } => {
                    object_assertions.insert((property.clone(), subject.clone(), object.clone()));
                    individuals.insert(subject.clone());
                    individuals.insert(object.clone());
                }
                AxiomKind::DataPropertyAssertion { property, subject, value } => {
                    data_assertions.insert((property.clone(), subject.clone(), value.clone()));
                    individuals.insert(subject.clone());
                }
                _ => {}
            }
        }

        for (sub, sup) in subsumptions {
            if let Some(sub) = sub.as_class() {
                if let ClassExpression::ObjectComplementOf(inner) = sup {
                    if let Some(other) = inner.as_class() {
                        disjoint.push((sub.clone(), other.clone()));
                    }
                    continue;
                }
                let mut conjuncts = Vec::new();
                let mut existentials = Vec::new();
                decompose(sup, &mut conjuncts, &mut existentials);
                class_edges.entry(sub.clone()).or_default().extend(conjuncts);
                told_existentials.entry(sub.clone()).or_default().extend(existentials);
            } else if let Some(target) = sup.as_class() {
                // general concept inclusion with a named right-hand side
                let mut conjuncts = Vec::new();
                let mut existentials = Vec::new();
                if decompose(sub, &mut conjuncts, &mut existentials) {
                    definitions.push(Definition {
                        conjuncts,
                        existentials,
                        target: target.clone(),
                    });
                }
            }
        }

        let object_properties: Vec<ObjectProperty> = object_properties.into_iter().collect();
        let object_supers = transitive_closure(&object_properties, &object_edges);
        let data_properties: Vec<DataProperty> = data_properties.into_iter().collect();
        let data_supers = transitive_closure(&data_properties, &data_edges);

        let mut inverses = FxHashSet::default();
        for (first, second) in &told_inverses {
            for p in equivalents_in(first, &object_supers) {
                for q in equivalents_in(second, &object_supers) {
                    inverses.insert((p.clone(), q.clone()));
                    inverses.insert((q, p.clone()));
                }
            }
        }
        for property in &symmetric {
            inverses.insert((property.clone(), property.clone()));
        }

        // Existentials whose property has a domain imply the domain.
        let property_domains = |property: &ObjectProperty| -> Vec<Class> {
            object_supers
                .get(property)
                .into_iter()
                .flatten()
                .filter_map(|p| object_domains.get(p))
                .flatten()
                .cloned()
                .collect()
        };
        for (class, existentials) in &told_existentials {
            for (property, _) in existentials {
                class_edges.entry(class.clone()).or_default().extend(property_domains(property));
            }
        }

        let classes: Vec<Class> = classes.into_iter().collect();
        let thing = Class::thing();
        let nothing = Class::nothing();
        for class in &classes {
            class_edges.entry(class.clone()).or_default().insert(thing.clone());
        }

        let clashes = |supers: &FxHashSet<Class>| {
            supers.contains(&nothing) || disjoint.iter().any(|(a, b)| supers.contains(a) && supers.contains(b))
        };
        let existential_holds = |owned: &[(ObjectProperty, Class)],
                                 required: &(ObjectProperty, Class),
                                 class_supers: &Closure<Class>| {
            owned.iter().any(|(property, filler)| {
                object_supers.get(property).is_some_and(|s| s.contains(&required.0))
                    && class_supers.get(filler).is_some_and(|s| s.contains(&required.1))
            })
        };

        let class_supers = loop {
            let closure = transitive_closure(&classes, &class_edges);
            let mut changed = false;
            for class in &classes {
                let supers = &closure[class];
                let owned: Vec<(ObjectProperty, Class)> = supers
                    .iter()
                    .filter_map(|s| told_existentials.get(s))
                    .flatten()
                    .cloned()
                    .collect();
                for definition in &definitions {
                    if supers.contains(&definition.target) {
                        continue;
                    }
                    let holds = definition.conjuncts.iter().all(|c| supers.contains(c))
                        && definition
                            .existentials
                            .iter()
                            .all(|required| existential_holds(owned.as_slice(), required, &closure));
                    if holds {
                        class_edges.entry(class.clone()).or_default().insert(definition.target.clone());
                        changed = true;
                    }
                }
                if !supers.contains(&nothing) && clashes(supers) {
                    class_edges.entry(class.clone()).or_default().insert(nothing.clone());
                    changed = true;
                }
            }
            if !changed {
                break closure;
            }
        };

        // Individuals: property closure, typing, definitions, until stable.
        for individual in &individuals {
            types.entry(individual.clone()).or_default().insert(thing.clone());
        }
        loop {
            let mut next_assertions = object_assertions.clone();
            for (property, subject, object) in &object_assertions {
                for sup in object_supers.get(property).into_iter().flatten() {
                    next_assertions.insert((sup.clone(), subject.clone(), object.clone()));
                }
            }
            for (property, subject, object) in next_assertions.clone() {
                for (p, q) in &inverses {
                    if *p == property {
                        next_assertions.insert((q.clone(), object.clone(), subject.clone()));
                    }
                }
            }
            for property in &transitive {
                let pairs: Vec<(Individual, Individual)> = next_assertions
                    .iter()
                    .filter(|(p, _, _)| p == property)
                    .map(|(_, s, o)| (s.clone(), o.clone()))
                    .collect();
                for (a, b) in &pairs {
                    for (c, d) in &pairs {
                        if b == c {
                            next_assertions.insert((property.clone(), a.clone(), d.clone()));
                        }
                    }
                }
            }

            let mut next_types = types.clone();
            for (property, subject, object) in &next_assertions {
                next_types.entry(subject.clone()).or_default().extend(property_domains(property));
                for sup in object_supers.get(property).into_iter().flatten() {
                    if let Some(ranges) = object_ranges.get(sup) {
                        next_types.entry(object.clone()).or_default().extend(ranges.iter().cloned());
                    }
                }
            }
            let mut next_data = data_assertions.clone();
            for (property, subject, value) in &data_assertions {
                for sup in data_supers.get(property).into_iter().flatten() {
                    next_data.insert((sup.clone(), subject.clone(), value.clone()));
                    if let Some(domains) = data_domains.get(sup) {
                        next_types.entry(subject.clone()).or_default().extend(domains.iter().cloned());
                    }
                }
            }
            for known in next_types.values_mut() {
                let closed: FxHashSet<Class> = known
                    .iter()
                    .filter_map(|c| class_supers.get(c))
                    .flatten()
                    .cloned()
                    .collect();
                known.extend(closed);
            }
            let snapshot = next_types.clone();
            for (individual, known) in next_types.iter_mut() {
                for definition in &definitions {
                    if known.contains(&definition.target) || !definition.conjuncts.iter().all(|c| known.contains(c)) {
                        continue;
                    }
                    let existentials_hold = definition.existentials.iter().all(|(required, filler)| {
                        next_assertions.iter().any(|(property, subject, object)| {
                            subject == individual
                                && object_supers.get(property).is_some_and(|s| s.contains(required))
                                && snapshot.get(object).is_some_and(|t| t.contains(filler))
                        })
                    });
                    if existentials_hold {
                        known.extend(class_supers.get(&definition.target).into_iter().flatten().cloned());
                        known.insert(definition.target.clone());
                    }
                }
            }

            let stable = next_assertions.len() == object_assertions.len()
                && next_data.len() == data_assertions.len()
                && next_types.values().map(FxHashSet::len).sum::<usize>()
                    == types.values().map(FxHashSet::len).sum::<usize>();
            object_assertions = next_assertions;
            data_assertions = next_data;
            types = next_types;
            if stable {
                break;
            }
        }

        let clashing_individual = types.values().any(|known| clashes(known));
        let irreflexive_violated = object_assertions
            .iter()
            .any(|(p, s, o)| s == o && irreflexive.contains(p));
        let asymmetric_violated = object_assertions.iter().any(|(p, s, o)| {
            asymmetric.contains(p) && object_assertions.contains(&(p.clone(), o.clone(), s.clone()))
        });
        let consistent = !clashing_individual && !irreflexive_violated && !asymmetric_violated;

        debug!(
            classes = classes.len(),
            object_properties = object_properties.len(),
            individuals = types.len(),
            consistent,
            "Structural reasoner saturated"
        );

        Self {
            classes,
            class_supers,
            object_properties,
            object_supers,
            data_properties,
            data_supers,
            inverses,
            disjoint,
            types,
            object_assertions,
            data_assertions,
            consistent,
        }
    }

    fn is_unsatisfiable(&self, class: &Class) -> bool {
        self.class_supers
            .get(class)
            .is_some_and(|supers| supers.contains(&Class::nothing()))
    }

    fn satisfiable_classes(&self) -> impl Iterator<Item = &Class> + '_ {
        self.classes.iter().filter(|c| !self.is_unsatisfiable(c))
    }

    fn disjoint_with(&self, first: &Class, second: &Class) -> bool {
        let (Some(a), Some(b)) = (self.class_supers.get(first), self.class_supers.get(second)) else {
            return false;
        };
        self.disjoint
            .iter()
            .any(|(x, y)| (a.contains(x) && b.contains(y)) || (a.contains(y) && b.contains(x)))
    }
}

impl Reasoner for StructuralReasoner {
    fn is_consistent(&self) -> bool {
        self.consistent
    }

    fn unsatisfiable_classes(&self) -> Vec<Class> {
        let mut unsatisfiable: Vec<Class> = self
            .classes
            .iter()
            .filter(|c| !c.is_nothing() && self.is_unsatisfiable(c))
            .cloned()
            .collect();
        unsatisfiable.sort_by(|a, b| a.iri().as_str().cmp(b.iri().as_str()));
        unsatisfiable
    }

    fn super_classes(&self, class: &Class, direct: bool) -> Vec<Class> {
        if direct {
            return direct_in(class, &self.class_supers);
        }
        let equivalent = equivalents_in(class, &self.class_supers);
        self.class_supers
            .get(class)
            .into_iter()
            .flatten()
            .filter(|s| !equivalent.contains(*s))
            .cloned()
            .collect()
    }

    fn equivalent_classes(&self, class: &Class) -> Vec<Class> {
        equivalents_in(class, &self.class_supers)
            .into_iter()
            .filter(|c| c != class)
            .collect()
    }

    fn infer(&self, generator: AxiomGenerator) -> AxiomSet {
        let mut inferred = AxiomSet::default();
        match generator {
            AxiomGenerator::SubClass => {
                for class in self.satisfiable_classes().filter(|c| !c.is_thing()) {
                    for sup in direct_in(class, &self.class_supers) {
                        inferred.insert(Axiom::subclass_of(class.clone(), sup));
                    }
                }
            }
            AxiomGenerator::EquivalentClass => {
                let satisfiable: Vec<Class> = self.satisfiable_classes().cloned().collect();
                for group in equivalence_groups(&satisfiable, &self.class_supers) {
                    inferred.insert(AxiomKind::EquivalentClasses(group.into_iter().map(Into::into).collect()).into());
                }
            }
            AxiomGenerator::DisjointClasses => {
                let candidates: Vec<&Class> = self
                    .satisfiable_classes()
                    .filter(|c| !c.is_thing())
                    .collect();
                for (i, first) in candidates.iter().enumerate() {
                    for second in &candidates[i + 1..] {
                        if self.disjoint_with(first, second) {
                            inferred.insert(
                                AxiomKind::DisjointClasses(vec![(*first).clone().into(), (*second).clone().into()]).into(),
                            );
                        }
                    }
                }
            }
            AxiomGenerator::ClassAssertion => {
                for (individual, known) in &self.types {
                    if individual.as_named().is_none() {
                        continue;
                    }
                    for class in known.iter().filter(|c| !c.is_thing()) {
                        inferred.insert(Axiom::class_assertion(class.clone(), individual.clone()));
                    }
                }
            }
            AxiomGenerator::PropertyAssertion => {
                for (property, subject, object) in &self.object_assertions {
                    if subject.as_named().is_some() && object.as_named().is_some() {
                        inferred.insert(
                            AxiomKind::ObjectPropertyAssertion {
                                property: property.clone(),
                                subject: subject.clone(),
                                object: object.clone(),
                            }
                            .into(),
                        );
                    }
                }
                for (property, subject, value) in &self.data_assertions {
                    if subject.as_named().is_some() {
                        inferred.insert(
                            AxiomKind::DataPropertyAssertion {
                                property: property.clone(),
                                subject: subject.clone(),
                                value: value.clone(),
                            }
                            .into(),
                        );
                    }
                }
            }
            AxiomGenerator::SubObjectProperty => {
                for property in &self.object_properties {
                    for sup in direct_in(property, &self.object_supers) {
                        inferred.insert(
                            AxiomKind::SubObjectPropertyOf {
                                sub: property.clone(),
                                sup,
                            }
                            .into(),
                        );
                    }
                }
            }
            AxiomGenerator::EquivalentObjectProperty => {
                for group in equivalence_groups(&self.object_properties, &self.object_supers) {
                    inferred.insert(AxiomKind::EquivalentObjectProperties(group).into());
                }
            }
            AxiomGenerator::InverseObjectProperties => {
                for (first, second) in &self.inverses {
                    if first != second {
                        inferred.insert(AxiomKind::InverseObjectProperties(first.clone(), second.clone()).into());
                    }
                }
            }
            AxiomGenerator::SubDataProperty => {
                for property in &self.data_properties {
                    for sup in direct_in(property, &self.data_supers) {
                        inferred.insert(
                            AxiomKind::SubDataPropertyOf {
                                sub: property.clone(),
                                sup,
                            }
                            .into(),
                        );
                    }
                }
            }
            AxiomGenerator::EquivalentDataProperties => {
                for group in equivalence_groups(&self.data_properties, &self.data_supers) {
                    inferred.insert(AxiomKind::EquivalentDataProperties(group).into());
                }
            }
        }
        inferred
    }
}
