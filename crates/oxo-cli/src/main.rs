//! OxO CLI - Ontology cross-reference resolution
//!
//! A command-line interface over the OxO mapping graph: resolve CURIEs to
//! their equivalents in other ontologies, inspect single terms, and report
//! statistics about the loaded tables.
//!
//! # Usage
//!
//! ```bash
//! # Resolve mappings within the default two hops
//! oxo map DOID:162
//!
//! # Three hops, restricted to MeSH and UMLS
//! oxo map SNOMEDCT:136111001 -d 3 -t MeSH,UMLS
//!
//! # Show a term and its direct mappings
//! oxo term UMLS:C0002199
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use oxo_config::{ConfigOverrides, LogFormat, OxoConfig};
use tracing_subscriber::EnvFilter;

mod commands;
mod progress;

/// OxO - Resolve cross-references between ontology identifiers
#[derive(Parser, Debug)]
#[command(name = "oxo")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOptions,
}

/// Global options available to all commands
#[derive(Args, Debug, Clone)]
struct GlobalOptions {
    /// Path to configuration file
    #[arg(long, short = 'c', global = true, env = "OXO_CONFIG")]
    config: Option<PathBuf>,

    /// Directory containing the terms and mapping tables
    #[arg(long, global = true, env = "OXO_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    quiet: bool,
}

impl GlobalOptions {
    /// Convert global options to config overrides
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            data_dir: self.data_dir.clone(),
            log_level: if self.quiet {
                Some("error".to_string())
            } else if self.verbose {
                Some("debug".to_string())
            } else {
                None
            },
            ..Default::default()
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve mappings for one or more CURIEs
    Map(commands::map::MapArgs),

    /// Show metadata and direct mappings for a CURIE
    Term(commands::term::TermArgs),

    /// Show statistics about the loaded tables
    Stats(commands::stats::StatsArgs),

    /// View and manage configuration
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),
}

fn init_tracing(config: &OxoConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.to_lowercase()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match config.logging.format {
        LogFormat::Text => {
            tracing::subscriber::set_global_default(builder.with_ansi(true).finish())?
        }
        LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish())?,
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Configuration is needed before logging so the configured level applies
    let config = commands::load_config(&cli.global)?;
    init_tracing(&config)?;

    match cli.command {
        Commands::Map(args) => commands::map::execute(args, &cli.global, &config),
        Commands::Term(args) => commands::term::execute(args, &cli.global, &config),
        Commands::Stats(args) => commands::stats::execute(args, &cli.global, &config),
        Commands::Config(cmd) => commands::config::execute(cmd, &cli.global, &config),
    }
}
