/**
 * io.rs
 * Ontology documents on disk: Turtle, N-Triples and RDF/XML in and out
 */

use oxigraph::io::RdfFormat;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

use crate::errors::{ExpandError, Result};
use crate::graph::GraphView;
use crate::owl::{Imports, Ontology, OntologyParser, OntologySerializer, ParserConfig};
use crate::vocab::DEFAULT_PREFIXES;

/// Picks the RDF syntax from a file extension. `.owl` is read as RDF/XML.
pub fn format_for_path(path: &Path) -> Result<RdfFormat> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .ok_or_else(|| ExpandError::UnsupportedFormat(path.display().to_string()))?;

    match extension.as_str() {
        "owl" | "rdf" | "xml" => Ok(RdfFormat::RdfXml),
        "ttl" => Ok(RdfFormat::Turtle),
        "nt" => Ok(RdfFormat::NTriples),
        other => Err(ExpandError::UnsupportedFormat(other.to_string())),
    }
}

/// Reads an ontology document.
///
/// Constructs outside the supported OWL fragment are skipped with a
/// warning rather than failing the load.
pub fn load_ontology(path: &Path) -> Result<Ontology> {
    let format = format_for_path(path)?;
    if !path.exists() {
        return Err(ExpandError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Ontology file not found: {}", path.display()),
        )));
    }

    let reader = BufReader::new(File::open(path)?);
    let view = GraphView::from_reader(format, reader)?;
    let graph = view.to_graph()?;
    let ontology = OntologyParser::from_graph(&graph)
        .with_config(ParserConfig::default().lenient())
        .parse()?;

    info!(
        path = %path.display(),
        ontology = %ontology,
        triples = graph.len(),
        "Loaded ontology"
    );
    Ok(ontology)
}

/// Reads an ontology and attaches the given documents as its imports.
pub fn load_with_imports(path: &Path, imports: &[impl AsRef<Path>]) -> Result<Ontology> {
    let mut ontology = load_ontology(path)?;
    for import in imports {
        let imported = load_ontology(import.as_ref())?;
        debug!(ontology = %ontology, import = %imported, "Attaching import");
        ontology.add_import(imported);
    }
    Ok(ontology)
}

/// Writes the ontology without its imports, in the syntax its extension names.
pub fn save_ontology(ontology: &Ontology, path: &Path) -> Result<()> {
    let format = format_for_path(path)?;
    let graph = OntologySerializer::to_graph(ontology, Imports::Excluded);
    let view = GraphView::from_graph(&graph)?;

    let writer = BufWriter::new(File::create(path)?);
    let mut writer = view.write(format, DEFAULT_PREFIXES.iter().map(|(k, v)| (*k, *v)), writer)?;
    writer.flush()?;

    info!(path = %path.display(), ontology = %ontology, triples = graph.len(), "Saved ontology");
    Ok(())
}
