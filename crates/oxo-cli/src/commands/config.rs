//! Config command - View and manage configuration
//!
//! Provides commands for viewing and initializing OxO configuration:
//! - Show the effective (merged) configuration
//! - Show configuration file paths
//! - Create a default config file (local or global)

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Subcommand;
use oxo_config::{ConfigLoader, OxoConfig};
use serde::Serialize;

use super::{print_info, working_dir};
use crate::GlobalOptions;

/// Config management commands
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show(ShowArgs),

    /// Show configuration file paths
    Path(PathArgs),

    /// Create a configuration file with default values
    Init(InitArgs),
}

/// Arguments for the show command
#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Output as JSON instead of TOML
    #[arg(long)]
    json: bool,
}

/// Arguments for the path command
#[derive(clap::Args, Debug)]
pub struct PathArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

/// Arguments for the init command
#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Create ~/.oxo/config.toml instead of ./.oxo/config.toml
    #[arg(long)]
    global: bool,
}

/// Configuration paths
#[derive(Debug, Clone, Serialize)]
pub struct ConfigPaths {
    /// Global config file path
    pub global: Option<PathBuf>,
    /// Local config file path
    pub local: PathBuf,
    /// Whether global config exists
    pub global_exists: bool,
    /// Whether local config exists
    pub local_exists: bool,
    /// Explicit config file from --config, if any
    pub explicit: Option<PathBuf>,
}

/// Execute the config command
pub fn execute(cmd: ConfigCommand, global: &GlobalOptions, config: &OxoConfig) -> Result<()> {
    match cmd {
        ConfigCommand::Show(args) => execute_show(args, config),
        ConfigCommand::Path(args) => execute_path(args, global),
        ConfigCommand::Init(args) => execute_init(args, global),
    }
}

fn execute_show(args: ShowArgs, config: &OxoConfig) -> Result<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(config)?);
    } else {
        print!(
            "{}",
            toml::to_string_pretty(config).context("Failed to render configuration")?
        );
    }
    Ok(())
}

fn execute_path(args: PathArgs, global: &GlobalOptions) -> Result<()> {
    let loader = ConfigLoader::new();
    let local = loader.local_config_path(&working_dir()?);
    let global_path = loader.global_config_path();

    let paths = ConfigPaths {
        global_exists: global_path.as_ref().is_some_and(|p| p.exists()),
        global: global_path,
        local_exists: local.exists(),
        local,
        explicit: global.config.clone(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&paths)?);
        return Ok(());
    }

    match paths.global {
        Some(ref p) => println!(
            "Global: {} ({})",
            p.display(),
            exists_label(paths.global_exists)
        ),
        None => println!("Global: (no home directory)"),
    }
    println!(
        "Local:  {} ({})",
        paths.local.display(),
        exists_label(paths.local_exists)
    );
    if let Some(ref explicit) = paths.explicit {
        println!("Explicit: {}", explicit.display());
    }
    Ok(())
}

fn exists_label(exists: bool) -> &'static str {
    if exists {
        "exists"
    } else {
        "not found"
    }
}

fn execute_init(args: InitArgs, global: &GlobalOptions) -> Result<()> {
    let loader = ConfigLoader::new();
    let path = if args.global {
        loader
            .init_global()
            .context("Failed to initialize global config")?
    } else {
        loader
            .init_local(&working_dir()?)
            .context("Failed to initialize local config")?
    };

    print_info(&format!("Config file: {}", path.display()), global.quiet);
    Ok(())
}
