//! Runs one template's CONSTRUCT query against the graph view.

use oxigraph::model::Graph;
use oxigraph::sparql::QueryResults;
use oxigraph::store::Store;
use std::collections::BTreeMap;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

use super::template::QueryTemplate;
use crate::errors::TemplateError;
use crate::graph::GraphView;
use crate::vocab::DEFAULT_PREFIXES;

/// Executes templates with an optional per-template deadline.
///
/// Template text may use the default prefixes (`owl:`, `rdfs:`, `obo:`, ...)
/// and any configured extra prefix without declaring them; a declaration
/// inside the template takes precedence.
#[derive(Debug, Clone, Default)]
pub struct QueryExecutor {
    timeout: Option<Duration>,
    prefixes: BTreeMap<String, String>,
}

impl QueryExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_prefixes(mut self, prefixes: BTreeMap<String, String>) -> Self {
        self.prefixes = prefixes;
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    fn prologue(&self) -> String {
        let mut prologue = String::new();
        for (prefix, namespace) in DEFAULT_PREFIXES.iter() {
            if !self.prefixes.contains_key(*prefix) {
                prologue.push_str(&format!("PREFIX {prefix}: <{namespace}>\n"));
            }
        }
        for (prefix, namespace) in &self.prefixes {
            prologue.push_str(&format!("PREFIX {prefix}: <{namespace}>\n"));
        }
        prologue
    }

    /// Runs the template and collects the constructed triples.
    ///
    /// SELECT and ASK queries are rejected; DESCRIBE is accepted since it
    /// also yields triples. With a deadline the query runs on its own thread
    /// and the caller stops waiting once the deadline passes, even if
    /// evaluation has not produced a single triple yet. The abandoned thread
    /// stops at its next triple or when evaluation finishes.
    pub fn execute(&self, view: &GraphView, template: &QueryTemplate) -> Result<Graph, TemplateError> {
        let started = Instant::now();
        let query = format!("{}{}", self.prologue(), template.query);

        let graph = match self.timeout {
            None => construct(view.store(), &query, started, None)?,
            Some(limit) => {
                let store = view.store().clone();
                let (sender, receiver) = mpsc::channel();
                thread::spawn(move || {
                    // nobody listens once the deadline passed
                    let _ = sender.send(construct(&store, &query, started, Some(limit)));
                });
                match receiver.recv_timeout(limit.saturating_sub(started.elapsed())) {
                    Ok(result) => result?,
                    Err(RecvTimeoutError::Timeout) => {
                        debug!(template = %template, timeout_ms = limit.as_millis() as u64, "Template abandoned at deadline");
                        return Err(TemplateError::Timeout(limit));
                    }
                    Err(RecvTimeoutError::Disconnected) => {
                        return Err(TemplateError::Query("query evaluation stopped unexpectedly".to_string()));
                    }
                }
            }
        };
        debug!(template = %template, triples = graph.len(), elapsed_ms = started.elapsed().as_millis() as u64, "Template executed");
        Ok(graph)
    }
}

/// Evaluates a CONSTRUCT query, giving up between triples once `timeout`
/// has elapsed since `started`.
fn construct(store: &Store, query: &str, started: Instant, timeout: Option<Duration>) -> Result<Graph, TemplateError> {
    let QueryResults::Graph(triples) = store.query(query)? else {
        return Err(TemplateError::NotConstruct);
    };

    let mut graph = Graph::new();
    for triple in triples {
        graph.insert(&triple?);
        if let Some(limit) = timeout {
            if started.elapsed() >= limit {
                return Err(TemplateError::Timeout(limit));
            }
        }
    }
    Ok(graph)
}
