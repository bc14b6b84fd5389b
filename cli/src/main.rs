//! Service repository CLI: import RDF files into the repository and inspect
//! the stored named graphs.

use anyhow::Context;
use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use serde_json::json;
use service_repository::{
    GraphInfo, ImportReport, Model, RdfFormat, RdfSerializer, RepositoryConfig, ServiceRepository,
};
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser)]
#[command(name = "service-repository", version, about = "Named-graph RDF service repository")]
struct Cli {
    /// YAML config file
    #[arg(long, global = true, env = "SERVICE_REPOSITORY_CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum Syntax {
    Turtle,
    Ntriples,
    Rdfxml,
}

impl From<Syntax> for RdfFormat {
    fn from(syntax: Syntax) -> Self {
        match syntax {
            Syntax::Turtle => RdfFormat::Turtle,
            Syntax::Ntriples => RdfFormat::NTriples,
            Syntax::Rdfxml => RdfFormat::RdfXml,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Import a file, or every file of a directory, one graph per file
    Import {
        /// File or directory to import
        path: PathBuf,

        /// Format label (RDF/XML, N-TRIPLE, TURTLE, TTL, N3); RDF/XML when omitted
        #[arg(long)]
        lang: Option<String>,
    },
    /// List stored graphs
    List,
    /// Print a named graph
    Show {
        /// Graph name
        name: String,

        #[arg(long, value_enum, default_value = "turtle")]
        syntax: Syntax,
    },
    /// Print the union of all graphs
    Union {
        #[arg(long, value_enum, default_value = "turtle")]
        syntax: Syntax,
    },
    /// Remove a named graph
    Clear {
        /// Graph name
        name: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Returns false when the command completed with partial failures
fn run(cli: Cli) -> anyhow::Result<bool> {
    let config = RepositoryConfig::load(cli.config.as_deref()).context("loading configuration")?;
    let repo = ServiceRepository::open(config).context("opening repository")?;

    let ok = match cli.command {
        Commands::Import { path, lang } => run_import(&repo, &path, lang.as_deref(), &cli.format)?,
        Commands::List => {
            run_list(&repo, &cli.format)?;
            true
        }
        Commands::Show { name, syntax } => run_show(&repo, &name, syntax)?,
        Commands::Union { syntax } => {
            print_model(&repo.get_model()?, syntax)?;
            true
        }
        Commands::Clear { name } => run_clear(&repo, &name)?,
    };

    repo.close()?;
    Ok(ok)
}

fn run_import(
    repo: &ServiceRepository,
    path: &std::path::Path,
    lang: Option<&str>,
    format: &OutputFormat,
) -> anyhow::Result<bool> {
    let report = repo.import_model(path, lang)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report_json(&report))?);
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec!["File", "Graph", "Result"]);

            for entry in &report.entries {
                let result = match &entry.outcome {
                    Ok(outcome) if outcome.replaced.is_some() => {
                        format!("{} triple(s), overwritten", outcome.triple_count)
                    }
                    Ok(outcome) => format!("{} triple(s)", outcome.triple_count),
                    Err(e) => format!("failed: {}", e),
                };
                table.add_row(vec![entry.path.display().to_string(), entry.graph.clone(), result]);
            }

            println!("{}", table);
            println!(
                "{} of {} file(s) imported as {}",
                report.imported().count(),
                report.entries.len(),
                report.format
            );
        }
    }

    Ok(report.is_success())
}

fn report_json(report: &ImportReport) -> serde_json::Value {
    let entries: Vec<_> = report
        .entries
        .iter()
        .map(|entry| match &entry.outcome {
            Ok(outcome) => json!({
                "path": entry.path,
                "graph": entry.graph,
                "triples": outcome.triple_count,
                "overwritten": outcome.replaced.is_some(),
            }),
            Err(e) => json!({
                "path": entry.path,
                "graph": entry.graph,
                "error": e.to_string(),
            }),
        })
        .collect();

    json!({
        "root": report.root,
        "format": report.format.label(),
        "entries": entries,
    })
}

fn run_list(repo: &ServiceRepository, format: &OutputFormat) -> anyhow::Result<()> {
    let graphs = repo.list_named_models()?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&graphs)?);
        }
        OutputFormat::Table => {
            if graphs.is_empty() {
                println!("(no graphs)");
                return Ok(());
            }

            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec!["Graph", "Triples", "Prefixes", "Updated"]);

            for graph in &graphs {
                table.add_row(vec![
                    graph.name.clone(),
                    graph.triple_count.to_string(),
                    graph.prefix_count.to_string(),
                    format_updated(graph),
                ]);
            }

            println!("{}", table);
            println!("{} graph(s)", graphs.len());
        }
    }

    Ok(())
}

fn format_updated(graph: &GraphInfo) -> String {
    graph
        .updated_at()
        .map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn run_show(repo: &ServiceRepository, name: &str, syntax: Syntax) -> anyhow::Result<bool> {
    match repo.get_named_model(Some(name))? {
        Some(model) => {
            print_model(&model, syntax)?;
            Ok(true)
        }
        None => {
            eprintln!("No graph named {}", name);
            Ok(false)
        }
    }
}

fn print_model(model: &Model, syntax: Syntax) -> anyhow::Result<()> {
    let text = RdfSerializer::serialize(model, syntax.into())?;
    print!("{}", text);
    Ok(())
}

fn run_clear(repo: &ServiceRepository, name: &str) -> anyhow::Result<bool> {
    if repo.clear_named_model(Some(name))? {
        println!("Cleared {}", name);
        Ok(true)
    } else {
        eprintln!("No graph named {}", name);
        Ok(false)
    }
}
