//! template-wire CLI
//!
//! Usage:
//!   template-wire [OPTIONS] <TEMPLATE>
//!
//! Options:
//!   -d, --data <FILE>     JSON file with the data context
//!   -c, --config <FILE>   Render configuration (TOML format)
//!   -v, --verbose         Debug logging
//!   -h, --help            Print help

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use log::debug;
use serde_json::Value;
use thiserror::Error;

use template_wire::{
    BasicComponent, Component, ConfigError, Context, RenderConfig, Renderer, TemplateError,
};

#[derive(Parser)]
#[command(name = "template-wire")]
#[command(about = "Expand directive templates into markup")]
struct Cli {
    /// Template file
    template: PathBuf,

    /// JSON file with the data context (must hold an object)
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Render configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("Error loading config '{path}': {source}")]
    Config { path: PathBuf, source: ConfigError },

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("Error reading data '{path}': {source}")]
    DataRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Error parsing data '{path}': {source}")]
    DataParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Data in '{path}' must be a JSON object")]
    DataNotObject { path: PathBuf },
}

fn setup_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
}

fn load_data(path: &Path) -> Result<Context, CliError> {
    let content = fs::read_to_string(path).map_err(|source| CliError::DataRead {
        path: path.to_path_buf(),
        source,
    })?;
    let value: Value = serde_json::from_str(&content).map_err(|source| CliError::DataParse {
        path: path.to_path_buf(),
        source,
    })?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(CliError::DataNotObject {
            path: path.to_path_buf(),
        }),
    }
}

fn run(cli: &Cli) -> Result<String, CliError> {
    let config = match &cli.config {
        Some(path) => RenderConfig::from_file(path).map_err(|source| CliError::Config {
            path: path.clone(),
            source,
        })?,
        None => RenderConfig::default(),
    };

    let data = match &cli.data {
        Some(path) => load_data(path)?,
        None => Context::new(),
    };

    let mut renderer = Renderer::new().with_config(config);
    let template = renderer.load_template(&cli.template)?.to_string();

    let host = BasicComponent::new(());
    let fragment = renderer.render(&template, &host, &data);
    debug!(
        "Rendered {} with {} unbound event markers",
        cli.template.display(),
        renderer.registry().count(host.id())
    );

    Ok(fragment.to_markup())
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match run(&cli) {
        Ok(markup) => println!("{}", markup),
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}
