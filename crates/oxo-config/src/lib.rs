//! OxO Configuration Management
//!
//! Provides configuration loading with support for:
//! - Global config: `~/.oxo/config.toml`
//! - Local config: `.oxo/config.toml` (in the working directory)
//! - CLI overrides via `ConfigOverrides`
//!
//! Configuration is merged in order: global → local → CLI overrides.

mod error;
mod loader;

pub use error::ConfigError;
pub use loader::ConfigLoader;

use oxo_core::{DEFAULT_DISTANCE, DEFAULT_PARALLEL_THRESHOLD};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Root configuration for OxO.
///
/// Represents the fully merged configuration from all sources.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct OxoConfig {
    /// Mapping table locations
    pub data: DataConfig,

    /// Resolution defaults
    pub resolver: ResolverConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Locations of the terms and mapping tables.
///
/// Relative file names are resolved against `data_dir`. An empty mapping file
/// name disables that table.
///
/// # Example TOML
///
/// ```toml
/// [data]
/// data_dir = "/srv/oxo"
/// terms_file = "terms.csv"
/// ols_mappings_file = "ols_mappings.csv"
/// umls_mappings_file = ""            # skip UMLS
/// extra_mappings = ["local_xrefs.csv"]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DataConfig {
    /// Directory containing the tables
    pub data_dir: PathBuf,

    /// Terms table (curie, label, uri)
    pub terms_file: PathBuf,

    /// OLS mapping dump
    pub ols_mappings_file: PathBuf,

    /// UMLS mapping dump
    pub umls_mappings_file: PathBuf,

    /// Additional mapping tables with the same layout
    pub extra_mappings: Vec<PathBuf>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            terms_file: PathBuf::from("terms.csv"),
            ols_mappings_file: PathBuf::from("ols_mappings.csv"),
            umls_mappings_file: PathBuf::from("umls_mappings.csv"),
            extra_mappings: Vec::new(),
        }
    }
}

impl DataConfig {
    fn resolve(&self, file: &Path) -> PathBuf {
        if file.is_absolute() {
            file.to_path_buf()
        } else {
            self.data_dir.join(file)
        }
    }

    /// Full path of the terms table.
    pub fn terms_path(&self) -> PathBuf {
        self.resolve(&self.terms_file)
    }

    /// Full paths of every enabled mapping table, in ingestion order.
    pub fn mapping_paths(&self) -> Vec<PathBuf> {
        [&self.ols_mappings_file, &self.umls_mappings_file]
            .into_iter()
            .chain(self.extra_mappings.iter())
            .filter(|p| !p.as_os_str().is_empty())
            .map(|p| self.resolve(p))
            .collect()
    }
}

/// Defaults applied to resolution requests.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ResolverConfig {
    /// Hop bound when a request gives none
    pub default_distance: u32,

    /// Target prefixes when a request gives none (empty = any)
    pub default_targets: Vec<String>,

    /// Frontier size at which a level is expanded in parallel
    pub parallel_threshold: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            default_distance: DEFAULT_DISTANCE,
            default_targets: Vec::new(),
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON structured logging
    Json,
}

/// CLI overrides for configuration values.
///
/// Used to apply command-line arguments over file-based config.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Override the table directory
    pub data_dir: Option<PathBuf>,

    /// Override the default hop bound
    pub distance: Option<u32>,

    /// Override the default target prefixes
    pub targets: Option<Vec<String>>,

    /// Override log level
    pub log_level: Option<String>,
}

impl OxoConfig {
    /// Apply CLI overrides to this configuration.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(ref dir) = overrides.data_dir {
            self.data.data_dir = dir.clone();
        }

        if let Some(distance) = overrides.distance {
            self.resolver.default_distance = distance;
        }

        if let Some(ref targets) = overrides.targets {
            self.resolver.default_targets = targets.clone();
        }

        if let Some(ref level) = overrides.log_level {
            self.logging.level = level.clone();
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data.terms_file.as_os_str().is_empty() {
            return Err(ConfigError::invalid_value(
                "data.terms_file",
                "a terms table is required",
            ));
        }

        if self.data.mapping_paths().is_empty() {
            return Err(ConfigError::invalid_value(
                "data",
                "at least one mapping table must be enabled",
            ));
        }

        if self.resolver.parallel_threshold == 0 {
            return Err(ConfigError::invalid_value(
                "resolver.parallel_threshold",
                "must be at least 1",
            ));
        }

        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::invalid_value(
                "logging.level",
                format!(
                    "unknown level '{}'. Valid values: {}",
                    self.logging.level,
                    LOG_LEVELS.join(", ")
                ),
            ));
        }

        Ok(())
    }
}
