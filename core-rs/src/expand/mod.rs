/**
 * expand/mod.rs
 * Macro expansion: run the SPARQL CONSTRUCT templates an ontology carries
 * on `OMO_defined_by_construct` and write their output back as axioms
 */

pub mod apply;
pub mod convert;
pub mod executor;
pub mod merge;
pub mod provenance;
pub mod template;

pub use apply::{apply, Applied, AxiomStore};
pub use convert::{convert, Converter};
pub use executor::QueryExecutor;
pub use merge::{combine, combine_all, par_combine_all, ResultSet};
pub use provenance::{annotate, derived_from};
pub use template::{select_templates, QueryTemplate};

use oxigraph::model::NamedNode;
use rayon::prelude::*;
use rustc_hash::FxHashSet;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::errors::{Result, TemplateError};
use crate::graph::GraphView;
use crate::owl::{Imports, Ontology};

/// A set of IRIs used for template and property scoping.
pub type IriSet = FxHashSet<NamedNode>;

#[derive(Debug, Clone, Default)]
pub struct ExpandConfig {
    /// Replace the ontology's axioms with the expansion instead of adding to them.
    pub create_new_ontology: bool,
    /// Stamp every produced axiom with `prov:wasDerivedFrom <template>`.
    pub annotate_expansion_axioms: bool,
    /// Carried for property-level scoping; template selection does not read it.
    pub expand_properties: IriSet,
    /// Carried for property-level scoping; template selection does not read it.
    pub exclude_properties: IriSet,
    /// Run templates on the rayon pool.
    pub parallel: bool,
    /// Per-template deadline.
    pub timeout: Option<Duration>,
    /// Prefixes templates may use without declaring them.
    pub prefixes: BTreeMap<String, String>,
}

/// How one template fared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateOutcome {
    pub owner: NamedNode,
    /// Number of axioms contributed, or why the template contributed nothing.
    pub result: std::result::Result<usize, TemplateError>,
}

impl TemplateOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionReport {
    /// One entry per selected template, ordered by owner IRI.
    pub templates: Vec<TemplateOutcome>,
    /// Size of the combined result before it was applied.
    pub combined: usize,
    pub added: usize,
    pub removed: usize,
}

impl ExpansionReport {
    pub fn failed(&self) -> impl Iterator<Item = &TemplateOutcome> + '_ {
        self.templates.iter().filter(|outcome| !outcome.is_ok())
    }
}

/// Per-template outcomes paired with the axioms they produced. Combining
/// concatenates outcomes and unions axioms.
#[derive(Default)]
struct Expansion {
    outcomes: Vec<TemplateOutcome>,
    result: ResultSet,
}

impl Expansion {
    fn empty() -> Self {
        Self::default()
    }

    fn combine(mut self, other: Self) -> Self {
        self.outcomes.extend(other.outcomes);
        Self {
            outcomes: self.outcomes,
            result: self.result.combine(other.result),
        }
    }
}

struct TemplateRunner<'a> {
    view: &'a GraphView,
    executor: &'a QueryExecutor,
    converter: &'a Converter,
    annotate: bool,
}

impl TemplateRunner<'_> {
    fn run(&self, template: &QueryTemplate) -> Expansion {
        debug!(template = %template, "Running template");
        let produced = self
            .executor
            .execute(self.view, template)
            .and_then(|graph| self.converter.convert(graph))
            .map(|axioms| annotate(axioms, &template.owner, self.annotate));

        match produced {
            Ok(axioms) => {
                debug!(template = %template, axioms = axioms.len(), "Template produced axioms");
                Expansion {
                    outcomes: vec![TemplateOutcome {
                        owner: template.owner.clone(),
                        result: Ok(axioms.len()),
                    }],
                    result: ResultSet::from(axioms),
                }
            }
            Err(e) => {
                warn!(template = %template, error = %e, "Template failed, contributing no axioms");
                Expansion {
                    outcomes: vec![TemplateOutcome {
                        owner: template.owner.clone(),
                        result: Err(e),
                    }],
                    result: ResultSet::empty(),
                }
            }
        }
    }
}

/// Expands the ontology's macro templates.
///
/// A template that fails to run or whose output is not valid OWL is
/// reported in its outcome and skipped. Failing to build the graph view or
/// to mutate the ontology is fatal and leaves nothing partially applied
/// beyond what the store reported.
pub fn expand(
    ontology: &mut Ontology,
    config: &ExpandConfig,
    include: &IriSet,
    exclude: &IriSet,
) -> Result<ExpansionReport> {
    if !config.expand_properties.is_empty() || !config.exclude_properties.is_empty() {
        debug!(
            expand_properties = config.expand_properties.len(),
            exclude_properties = config.exclude_properties.len(),
            "Property scoping is not consulted by template selection"
        );
    }

    let view = GraphView::from_ontology(ontology, Imports::Included)?;
    let templates = select_templates(ontology, include, exclude);
    info!(ontology = %ontology, templates = templates.len(), triples = view.len()?, "Expanding ontology");

    let executor = QueryExecutor::new()
        .with_timeout(config.timeout)
        .with_prefixes(config.prefixes.clone());
    let converter = Converter::for_ontology(ontology);
    let runner = TemplateRunner {
        view: &view,
        executor: &executor,
        converter: &converter,
        annotate: config.annotate_expansion_axioms,
    };

    let Expansion { mut outcomes, result } = if config.parallel {
        templates
            .par_iter()
            .map(|template| runner.run(template))
            .reduce(Expansion::empty, Expansion::combine)
    } else {
        templates
            .iter()
            .map(|template| runner.run(template))
            .fold(Expansion::empty(), Expansion::combine)
    };
    outcomes.sort_by(|a, b| a.owner.as_str().cmp(b.owner.as_str()));

    let combined = result.len();
    let applied = apply(ontology, result, config.create_new_ontology)?;
    let failed = outcomes.iter().filter(|outcome| !outcome.is_ok()).count();
    info!(
        combined,
        added = applied.added,
        removed = applied.removed,
        failed,
        "Expansion applied"
    );

    Ok(ExpansionReport {
        templates: outcomes,
        combined,
        added: applied.added,
        removed: applied.removed,
    })
}
