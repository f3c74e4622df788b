use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use phpantom_definition::codebase::LoadError;
use phpantom_definition::config::ConfigError;
use phpantom_definition::{CodeBase, Config, DefinitionRequest, DefinitionResolver, Query, logging};

/// Resolve one go-to-definition query against a code-base snapshot.
#[derive(Debug, Parser)]
#[command(name = "phpantom-definition", version, about)]
struct Cli {
    /// JSON snapshot of the project's classes, functions, and constants.
    snapshot: PathBuf,

    /// JSON query: `{ "context": {...}, "node": {...} }`.
    query: PathBuf,

    /// Answer "go to type definition" instead of "go to definition".
    #[arg(long)]
    type_definition: bool,

    /// Config file to use instead of searching for `.phpantom.toml`.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Project root to search for `.phpantom.toml`.
    #[arg(long, value_name = "DIR", default_value = ".")]
    root: PathBuf,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("failed to write response: {0}")]
    Output(#[from] serde_json::Error),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            eprintln!("phpantom-definition: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load(&cli.root)?,
    };
    logging::init(&config.log);

    let codebase = CodeBase::from_path(&cli.snapshot)?;
    let query = Query::from_path(&cli.query)?;

    let mut request = if cli.type_definition || query.type_definition {
        DefinitionRequest::type_definition()
    } else {
        DefinitionRequest::definition()
    };
    DefinitionResolver::for_codebase(&codebase)
        .with_config(config.definition)
        .resolve(&query.context, &query.node, &mut request);
    tracing::info!(records = request.records().len(), "resolved");

    let response = request.to_response(&codebase);
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
