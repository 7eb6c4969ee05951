/**
 * config.rs
 * Parser for omx configuration files (YAML format)
 *
 * Format:
 * ```yaml
 * prefixes:
 *   ex: http://example.org/
 * expand:
 *   annotate-expansion-axioms: true
 *   expand-terms: [ex:PartOfMacro]
 *   parallel: true
 *   timeout-secs: 30
 * reason:
 *   reasoner: structural
 *   axiom-generators: Subclass EquivalentClass
 *   exclude-tautologies: true
 * ```
 */

use oxigraph::model::NamedNode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::errors::{ExpandError, Result};
use crate::expand::{ExpandConfig, IriSet};
use crate::reason::{AxiomGenerator, ReasonOptions, ReasonerFactory, StructuralReasonerFactory};
use crate::vocab::DEFAULT_PREFIXES;

/// Whole configuration file. Every section is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct OmxConfig {
    pub prefixes: BTreeMap<String, String>,
    pub expand: ExpandSettings,
    pub reason: ReasonSettings,
}

/// `expand:` section
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ExpandSettings {
    pub create_new_ontology: bool,
    pub annotate_expansion_axioms: bool,
    /// Template owners to run; empty runs all of them.
    pub expand_terms: Vec<String>,
    pub exclude_terms: Vec<String>,
    pub expand_properties: Vec<String>,
    pub exclude_properties: Vec<String>,
    pub parallel: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// `reason:` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ReasonSettings {
    pub reasoner: String,
    pub create_new_ontology: bool,
    pub annotate_inferred_axioms: bool,
    pub exclude_duplicate_axioms: bool,
    pub remove_redundant_subclass_axioms: bool,
    pub exclude_tautologies: bool,
    pub exclude_external_entities: bool,
    pub exclude_owl_thing: bool,
    /// Space separated generator names, e.g. `"Subclass EquivalentClass"`.
    pub axiom_generators: String,
}

impl Default for ReasonSettings {
    fn default() -> Self {
        let options = ReasonOptions::default();
        Self {
            reasoner: StructuralReasonerFactory.name().to_string(),
            create_new_ontology: options.create_new_ontology,
            annotate_inferred_axioms: options.annotate_inferred_axioms,
            exclude_duplicate_axioms: options.exclude_duplicate_axioms,
            remove_redundant_subclass_axioms: options.remove_redundant_subclass_axioms,
            exclude_tautologies: options.exclude_tautologies,
            exclude_external_entities: options.exclude_external_entities,
            exclude_owl_thing: options.exclude_owl_thing,
            axiom_generators: options
                .axiom_generators
                .iter()
                .map(|g| g.name())
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

impl OmxConfig {
    /// Load a configuration file and validate it.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ExpandError::Config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = fs::read_to_string(path)?;
        let config: OmxConfig = serde_yaml::from_str(&content)?;
        config.validate()?;

        debug!(path = %path.display(), prefixes = config.prefixes.len(), "Loaded configuration");
        Ok(config)
    }

    /// Prefix IRIs must be absolute; generator names and the reasoner must exist.
    pub fn validate(&self) -> Result<()> {
        for (name, iri) in &self.prefixes {
            NamedNode::new(iri.as_str())
                .map_err(|e| ExpandError::Config(format!("Invalid IRI for prefix '{name}': {e}")))?;
        }
        AxiomGenerator::parse_list(&self.reason.axiom_generators)?;
        self.reason.factory()?;
        Ok(())
    }

    /// Default prefixes overlaid with the configured ones.
    pub fn prefix_map(&self) -> PrefixMap {
        PrefixMap::with_overrides(&self.prefixes)
    }
}

/// Resolves CURIEs such as `ex:A` against known prefixes.
#[derive(Debug, Clone, PartialEq)]
pub struct PrefixMap {
    prefixes: BTreeMap<String, String>,
}

impl Default for PrefixMap {
    fn default() -> Self {
        Self {
            prefixes: DEFAULT_PREFIXES
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl PrefixMap {
    pub fn with_overrides(overrides: &BTreeMap<String, String>) -> Self {
        let mut map = Self::default();
        map.prefixes.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
        map
    }

    /// Accepts `<iri>`, an absolute IRI, or `prefix:local`.
    pub fn expand(&self, term: &str) -> Result<NamedNode> {
        let term = term.trim();
        if let Some(iri) = term.strip_prefix('<').and_then(|t| t.strip_suffix('>')) {
            return Ok(NamedNode::new(iri)?);
        }
        let Some((prefix, local)) = term.split_once(':') else {
            return Err(ExpandError::Config(format!("Not an IRI or CURIE: {term}")));
        };
        if local.starts_with("//") {
            return Ok(NamedNode::new(term)?);
        }
        match self.prefixes.get(prefix) {
            Some(namespace) => Ok(NamedNode::new(format!("{namespace}{local}"))?),
            None if prefix == "urn" => Ok(NamedNode::new(term)?),
            None => Err(ExpandError::Config(format!("Unknown prefix '{prefix}' in {term}"))),
        }
    }

    pub fn expand_all(&self, terms: &[String]) -> Result<IriSet> {
        terms.iter().map(|t| self.expand(t)).collect()
    }

    /// Only the configured prefixes that differ from the defaults, for query prologues.
    pub fn overrides(&self) -> BTreeMap<String, String> {
        self.prefixes
            .iter()
            .filter(|(k, v)| DEFAULT_PREFIXES.get(k.as_str()) != Some(&v.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

impl ExpandSettings {
    pub fn to_config(&self, prefixes: &PrefixMap) -> Result<ExpandConfig> {
        Ok(ExpandConfig {
            create_new_ontology: self.create_new_ontology,
            annotate_expansion_axioms: self.annotate_expansion_axioms,
            expand_properties: prefixes.expand_all(&self.expand_properties)?,
            exclude_properties: prefixes.expand_all(&self.exclude_properties)?,
            parallel: self.parallel,
            timeout: self.timeout_secs.map(Duration::from_secs),
            prefixes: prefixes.overrides(),
        })
    }

    /// Include and exclude sets for template selection.
    pub fn template_scope(&self, prefixes: &PrefixMap) -> Result<(IriSet, IriSet)> {
        Ok((
            prefixes.expand_all(&self.expand_terms)?,
            prefixes.expand_all(&self.exclude_terms)?,
        ))
    }
}

impl ReasonSettings {
    pub fn to_options(&self) -> Result<ReasonOptions> {
        Ok(ReasonOptions {
            create_new_ontology: self.create_new_ontology,
            annotate_inferred_axioms: self.annotate_inferred_axioms,
            exclude_duplicate_axioms: self.exclude_duplicate_axioms,
            remove_redundant_subclass_axioms: self.remove_redundant_subclass_axioms,
            exclude_tautologies: self.exclude_tautologies,
            exclude_external_entities: self.exclude_external_entities,
            exclude_owl_thing: self.exclude_owl_thing,
            axiom_generators: AxiomGenerator::parse_list(&self.axiom_generators)?,
        })
    }

    /// Looks up the reasoner backend by name.
    pub fn factory(&self) -> Result<Box<dyn ReasonerFactory>> {
        match self.reasoner.to_ascii_lowercase().as_str() {
            "structural" => Ok(Box::new(StructuralReasonerFactory)),
            other => Err(ExpandError::Config(format!("Unknown reasoner: {other}"))),
        }
    }
}
