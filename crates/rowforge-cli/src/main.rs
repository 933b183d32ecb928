use std::fs;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use rowforge_core::{SchemaArtifact, SchemaGraph, validate_graph};
use rowforge_dialect::Dialect;
use rowforge_generate::{GenerateOptions, GenerationError, InsertionEngine};

#[derive(Debug, Error)]
enum CliError {
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

#[derive(Parser, Debug)]
#[command(name = "rowforge", version, about = "Rowforge CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Synthesize INSERT statements that make a query return rows.
    Generate(GenerateArgs),
    /// Scan a schema artifact for referential inconsistencies.
    Validate(ValidateArgs),
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Path to the schema artifact (JSON).
    #[arg(long, value_name = "SCHEMA_JSON")]
    schema: PathBuf,
    /// Query text (flag form).
    #[arg(long, conflicts_with = "query_file")]
    query: Option<String>,
    /// Read the query from a file.
    #[arg(long, value_name = "QUERY_FILE")]
    query_file: Option<PathBuf>,
    /// Rows to synthesize per table.
    #[arg(long, default_value_t = 1)]
    rows: u64,
    /// Target dialect (postgres, mysql, sqlserver, oracle, sqlite).
    #[arg(long, default_value = "postgres")]
    dialect: String,
    /// Seed for deterministic local synthesis.
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Output path for the statements; stdout when absent.
    #[arg(long)]
    out: Option<PathBuf>,
    /// Output path for the run report (JSON).
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ValidateArgs {
    /// Path to the schema artifact (JSON).
    #[arg(long, value_name = "SCHEMA_JSON")]
    schema: PathBuf,
}

fn main() -> Result<(), CliError> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Command::Generate(args) => run_generate(args),
        Command::Validate(args) => run_validate(args),
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_graph(path: &PathBuf) -> Result<SchemaGraph, CliError> {
    let artifact: SchemaArtifact = serde_json::from_str(&fs::read_to_string(path)?)?;
    Ok(SchemaGraph::from_artifact(artifact))
}

fn run_generate(args: GenerateArgs) -> Result<(), CliError> {
    let dialect = Dialect::from_name(&args.dialect)
        .ok_or_else(|| CliError::InvalidConfig(format!("unknown dialect '{}'", args.dialect)))?;

    let query = match (args.query, args.query_file) {
        (Some(query), _) => query,
        (None, Some(path)) => fs::read_to_string(path)?,
        (None, None) => {
            return Err(CliError::InvalidConfig(
                "either --query or --query-file is required".to_string(),
            ));
        }
    };

    let graph = load_graph(&args.schema)?;
    let engine = InsertionEngine::new(GenerateOptions {
        dialect,
        rows_per_table: args.rows,
        seed: args.seed,
    });
    let result = engine.run(&query, &graph)?;

    let mut script = String::new();
    for statement in &result.statements {
        script.push_str(&statement.sql);
        script.push('\n');
    }

    match &args.out {
        Some(path) => fs::write(path, script)?,
        None => print!("{script}"),
    }

    if let Some(path) = &args.report {
        fs::write(path, serde_json::to_vec_pretty(&result.report)?)?;
    }

    Ok(())
}

fn run_validate(args: ValidateArgs) -> Result<(), CliError> {
    let graph = load_graph(&args.schema)?;
    let warnings = validate_graph(&graph);

    if warnings.is_empty() {
        println!("schema ok: {} tables", graph.len());
        return Ok(());
    }

    for warning in &warnings {
        println!("{}: {}", warning.code, warning.message);
    }
    Ok(())
}
