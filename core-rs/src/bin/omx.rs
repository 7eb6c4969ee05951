//! omx - ontology macro expansion CLI
//!
//! `omx expand` runs the CONSTRUCT templates an ontology carries,
//! `omx reason` materializes inferences with a reasoner backend.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use ontomacro_core::config::OmxConfig;
use ontomacro_core::{expand, io, reason, ExpansionReport, Ontology, ReasonReport};

#[derive(Parser)]
#[command(name = "omx")]
#[command(version)]
#[command(about = "Ontology macro expansion and reasoning", long_about = None)]
struct Cli {
    /// YAML configuration file; flags override its values
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Expand OMO_defined_by_construct templates into axioms
    Expand(ExpandArgs),
    /// Add inferred axioms using a reasoner
    Reason(ReasonArgs),
}

#[derive(Args)]
struct IoArgs {
    /// Input ontology (.ttl, .nt, .owl/.rdf)
    #[arg(long, short = 'i')]
    input: PathBuf,

    /// Imported ontology documents (repeatable)
    #[arg(long = "import")]
    imports: Vec<PathBuf>,

    /// Output ontology; format follows the extension
    #[arg(long, short = 'o')]
    output: PathBuf,

    /// Report format printed to stdout
    #[arg(long, value_enum, default_value_t = ReportFormat::Table)]
    report: ReportFormat,
}

#[derive(Args)]
struct ExpandArgs {
    #[command(flatten)]
    io: IoArgs,

    /// Only expand templates owned by these terms (IRI or CURIE, repeatable)
    #[arg(long = "expand-term")]
    expand_terms: Vec<String>,

    /// Skip templates owned by these terms
    #[arg(long = "exclude-term")]
    exclude_terms: Vec<String>,

    /// Keep only the expansion output
    #[arg(long)]
    create_new_ontology: bool,

    /// Tag each produced axiom with prov:wasDerivedFrom its template owner
    #[arg(long)]
    annotate_expansion_axioms: bool,

    /// Run templates in parallel
    #[arg(long)]
    parallel: bool,

    /// Per-template deadline in seconds
    #[arg(long)]
    timeout: Option<u64>,
}

#[derive(Args)]
struct ReasonArgs {
    #[command(flatten)]
    io: IoArgs,

    /// Reasoner backend
    #[arg(long, short = 'r')]
    reasoner: Option<String>,

    /// Space separated generators, e.g. "Subclass EquivalentClass"
    #[arg(long)]
    axiom_generators: Option<String>,

    #[arg(long)]
    create_new_ontology: bool,

    #[arg(long)]
    annotate_inferred_axioms: bool,

    #[arg(long)]
    exclude_duplicate_axioms: bool,

    #[arg(long)]
    remove_redundant_subclass_axioms: Option<bool>,

    #[arg(long)]
    exclude_tautologies: bool,

    #[arg(long)]
    exclude_external_entities: bool,

    #[arg(long)]
    exclude_owl_thing: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum ReportFormat {
    Table,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => OmxConfig::load(path)
            .with_context(|| format!("Failed to load configuration {}", path.display()))?,
        None => OmxConfig::default(),
    };

    match cli.command {
        Commands::Expand(args) => run_expand(args, config),
        Commands::Reason(args) => run_reason(args, config),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "ontomacro_core=debug,omx=debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load(io_args: &IoArgs) -> Result<Ontology> {
    io::load_with_imports(&io_args.input, &io_args.imports[..])
        .with_context(|| format!("Failed to load {}", io_args.input.display()))
}

fn save(ontology: &Ontology, output: &Path) -> Result<()> {
    io::save_ontology(ontology, output).with_context(|| format!("Failed to write {}", output.display()))
}

fn run_expand(args: ExpandArgs, mut config: OmxConfig) -> Result<()> {
    let settings = &mut config.expand;
    settings.expand_terms.extend(args.expand_terms);
    settings.exclude_terms.extend(args.exclude_terms);
    settings.create_new_ontology |= args.create_new_ontology;
    settings.annotate_expansion_axioms |= args.annotate_expansion_axioms;
    settings.parallel |= args.parallel;
    if args.timeout.is_some() {
        settings.timeout_secs = args.timeout;
    }

    let prefixes = config.prefix_map();
    let expand_config = config.expand.to_config(&prefixes).context("Invalid expand settings")?;
    let (include, exclude) = config
        .expand
        .template_scope(&prefixes)
        .context("Invalid template terms")?;

    let mut ontology = load(&args.io)?;
    let report = expand(&mut ontology, &expand_config, &include, &exclude).context("Expansion failed")?;
    save(&ontology, &args.io.output)?;

    match args.io.report {
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&expansion_json(&report))?),
        ReportFormat::Table => print_expansion_table(&report),
    }
    Ok(())
}

fn run_reason(args: ReasonArgs, mut config: OmxConfig) -> Result<()> {
    let settings = &mut config.reason;
    if let Some(reasoner) = args.reasoner {
        settings.reasoner = reasoner;
    }
    if let Some(generators) = args.axiom_generators {
        settings.axiom_generators = generators;
    }
    if let Some(remove) = args.remove_redundant_subclass_axioms {
        settings.remove_redundant_subclass_axioms = remove;
    }
    settings.create_new_ontology |= args.create_new_ontology;
    settings.annotate_inferred_axioms |= args.annotate_inferred_axioms;
    settings.exclude_duplicate_axioms |= args.exclude_duplicate_axioms;
    settings.exclude_tautologies |= args.exclude_tautologies;
    settings.exclude_external_entities |= args.exclude_external_entities;
    settings.exclude_owl_thing |= args.exclude_owl_thing;

    let options = config.reason.to_options().context("Invalid reason settings")?;
    let factory = config.reason.factory()?;

    let mut ontology = load(&args.io)?;
    let report = reason(&mut ontology, factory.as_ref(), &options).context("Reasoning failed")?;
    save(&ontology, &args.io.output)?;

    match args.io.report {
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&reason_json(&report))?),
        ReportFormat::Table => print_reason_table(&report),
    }
    Ok(())
}

fn expansion_json(report: &ExpansionReport) -> serde_json::Value {
    let templates: Vec<serde_json::Value> = report
        .templates
        .iter()
        .map(|outcome| match &outcome.result {
            Ok(axioms) => serde_json::json!({
                "owner": outcome.owner.as_str(),
                "status": "ok",
                "axioms": axioms,
            }),
            Err(e) => serde_json::json!({
                "owner": outcome.owner.as_str(),
                "status": "failed",
                "error": e.to_string(),
            }),
        })
        .collect();

    serde_json::json!({
        "templates": templates,
        "combined": report.combined,
        "added": report.added,
        "removed": report.removed,
    })
}

fn reason_json(report: &ReasonReport) -> serde_json::Value {
    serde_json::json!({
        "reasoner": report.reasoner,
        "inferred": report.inferred,
        "added": report.added,
        "removed": report.removed,
        "redundant_removed": report.redundant_removed,
    })
}

fn print_expansion_table(report: &ExpansionReport) {
    println!("\n{:<64} {:<8} {:<8}", "TEMPLATE", "STATUS", "AXIOMS");
    println!("{}", "-".repeat(82));

    for outcome in &report.templates {
        match &outcome.result {
            Ok(axioms) => println!("{:<64} {:<8} {:<8}", outcome.owner.as_str(), "ok".green(), axioms),
            Err(e) => {
                println!("{:<64} {:<8} {:<8}", outcome.owner.as_str(), "FAILED".red(), "-");
                println!("  {}", e.to_string().dimmed());
            }
        }
    }

    println!(
        "\n{} combined, {} added, {} removed",
        report.combined,
        report.added.to_string().bold(),
        report.removed
    );
}

fn print_reason_table(report: &ReasonReport) {
    println!("\n{:<20} {}", "REASONER", report.reasoner);
    println!("{}", "-".repeat(32));
    println!("{:<20} {}", "inferred", report.inferred);
    println!("{:<20} {}", "added", report.added.to_string().bold());
    println!("{:<20} {}", "removed", report.removed);
    println!("{:<20} {}", "redundant removed", report.redundant_removed);
}
