//! CLI command implementations
//!
//! This module contains all OxO CLI command implementations.

pub mod config;
pub mod map;
pub mod stats;
pub mod term;

use std::path::PathBuf;

use anyhow::{Context, Result};
use oxo_config::{ConfigLoader, OxoConfig};
use oxo_core::{load_store, DataFiles, MappingResolver, MappingStore};

use crate::progress;
use crate::GlobalOptions;

/// Directory whose `.oxo/config.toml` is treated as the local config.
pub fn working_dir() -> Result<PathBuf> {
    std::env::current_dir().context("Failed to get current directory")
}

/// Load configuration with optional config file override.
pub fn load_config(global: &GlobalOptions) -> Result<OxoConfig> {
    let mut loader = ConfigLoader::new();
    let overrides = global.to_config_overrides();

    if let Some(ref config_path) = global.config {
        return loader
            .load_file(config_path, Some(&overrides))
            .with_context(|| format!("Failed to load config file {}", config_path.display()));
    }

    loader
        .load(&working_dir()?, Some(&overrides))
        .context("Failed to load configuration")
}

/// Table locations named by the configuration.
pub fn data_files(config: &OxoConfig) -> DataFiles {
    DataFiles {
        terms: config.data.terms_path(),
        mappings: config.data.mapping_paths(),
    }
}

/// Load the mapping store, showing a spinner unless quiet.
pub fn open_store(config: &OxoConfig, quiet: bool) -> Result<MappingStore> {
    config.validate().context("Invalid configuration")?;
    let files = data_files(config);

    let pb = progress::spinner("Loading mapping tables...", quiet);
    match load_store(&files) {
        Ok(store) => {
            progress::finish_spinner(
                pb,
                &format!(
                    "Loaded {} CURIEs, {} mappings, {} terms",
                    store.node_count(),
                    store.edge_count(),
                    store.term_count()
                ),
            );
            Ok(store)
        }
        Err(e) => {
            progress::finish_spinner_error(pb, "Failed to load mapping tables");
            Err(e).context("Data load failed")
        }
    }
}

/// Resolver configured from the `[resolver]` section.
pub fn resolver<'a>(store: &'a MappingStore, config: &OxoConfig) -> MappingResolver<'a> {
    MappingResolver::new(store).with_parallel_threshold(config.resolver.parallel_threshold)
}

/// Print an info message (respects quiet flag).
pub fn print_info(message: &str, quiet: bool) {
    if !quiet {
        eprintln!("{}", message);
    }
}
