/**
 * graph/mod.rs
 * Triple-store view of an ontology, the execution substrate for templates
 */

use oxigraph::io::{RdfFormat, RdfSerializer};
use oxigraph::model::{Graph, GraphName, GraphNameRef, Triple};
use oxigraph::store::Store;
use std::io::{Read, Write};
use tracing::debug;

use crate::errors::Result;
use crate::owl::{Imports, Ontology, OntologyParser, OntologySerializer};

/// Read-only RDF view of an ontology held in an in-memory oxigraph store.
///
/// Cloning is cheap and clones share the same store, so one view can be
/// handed to every template executing concurrently.
#[derive(Clone)]
pub struct GraphView {
    store: Store,
}

impl GraphView {
    /// Serializes the ontology (and its imports closure when requested)
    /// into the default graph of a fresh store. Entities used without a
    /// declaration are typed as if they had one.
    pub fn from_ontology(ontology: &Ontology, imports: Imports) -> Result<Self> {
        let graph = OntologySerializer::to_typed_graph(ontology, imports);
        debug!(ontology = %ontology, triples = graph.len(), ?imports, "Building graph view");
        Self::from_graph(&graph)
    }

    pub fn from_graph(graph: &Graph) -> Result<Self> {
        let store = Store::new()?;
        store.extend(
            graph
                .iter()
                .map(|triple| triple.into_owned().in_graph(GraphName::DefaultGraph)),
        )?;
        Ok(Self { store })
    }

    /// Parses an RDF document into the default graph of a fresh store.
    pub fn from_reader(format: RdfFormat, reader: impl Read) -> Result<Self> {
        let store = Store::new()?;
        store.load_from_reader(format, reader)?;
        debug!(?format, triples = store.len()?, "Loaded RDF document");
        Ok(Self { store })
    }

    /// Writes the default graph. Formats without prefix support ignore `prefixes`.
    pub fn write<'a, W: Write>(
        &self,
        format: RdfFormat,
        prefixes: impl IntoIterator<Item = (&'a str, &'a str)>,
        writer: W,
    ) -> Result<W> {
        let mut serializer = RdfSerializer::from_format(format);
        for (name, iri) in prefixes {
            serializer = serializer.with_prefix(name, iri)?;
        }
        Ok(self
            .store
            .dump_graph_to_writer(GraphNameRef::DefaultGraph, serializer, writer)?)
    }

    /// Number of triples in the view.
    pub fn len(&self) -> Result<usize> {
        Ok(self.store.len()?)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.store.is_empty()?)
    }

    pub fn contains(&self, triple: &Triple) -> Result<bool> {
        Ok(self
            .store
            .contains(triple.as_ref().in_graph(GraphNameRef::DefaultGraph))?)
    }

    /// Copies the view back out as a plain triple collection.
    pub fn to_graph(&self) -> Result<Graph> {
        let mut graph = Graph::new();
        for quad in self
            .store
            .quads_for_pattern(None, None, None, Some(GraphNameRef::DefaultGraph))
        {
            graph.insert(&Triple::from(quad?));
        }
        Ok(graph)
    }

    /// Reads the view back as an ontology; imported axioms come back inlined.
    pub fn to_ontology(&self) -> Result<Ontology> {
        let graph = self.to_graph()?;
        Ok(OntologyParser::from_graph(&graph).parse()?)
    }

    pub(crate) fn store(&self) -> &Store {
        &self.store
    }
}
