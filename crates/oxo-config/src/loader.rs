//! Configuration loader with inheritance support.
//!
//! Loads configuration from multiple sources and merges them:
//! 1. Global config: `~/.oxo/config.toml`
//! 2. Local config: `.oxo/config.toml` (in the working directory)
//! 3. CLI overrides
//!
//! Later sources override earlier ones.

use crate::error::ConfigError;
use crate::{ConfigOverrides, DataConfig, LoggingConfig, OxoConfig, ResolverConfig};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Global configuration directory name.
const GLOBAL_CONFIG_DIR: &str = ".oxo";

/// Local configuration directory name.
const LOCAL_CONFIG_DIR: &str = ".oxo";

/// Configuration loader with caching and inheritance support.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Global config directory (e.g., `~/.oxo`)
    global_config_dir: Option<PathBuf>,

    /// Cached global config
    global_config: Option<OxoConfig>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a new configuration loader.
    ///
    /// Automatically detects the global config directory (`~/.oxo`).
    pub fn new() -> Self {
        let global_config_dir = dirs::home_dir().map(|h| h.join(GLOBAL_CONFIG_DIR));

        Self {
            global_config_dir,
            global_config: None,
        }
    }

    /// Create a loader with a custom global config directory.
    pub fn with_global_dir(global_dir: impl Into<PathBuf>) -> Self {
        Self {
            global_config_dir: Some(global_dir.into()),
            global_config: None,
        }
    }

    /// Get the global config file path.
    pub fn global_config_path(&self) -> Option<PathBuf> {
        self.global_config_dir
            .as_ref()
            .map(|d| d.join(CONFIG_FILE_NAME))
    }

    /// Get the local config file path for a working directory.
    pub fn local_config_path(&self, root: &Path) -> PathBuf {
        root.join(LOCAL_CONFIG_DIR).join(CONFIG_FILE_NAME)
    }

    /// Load configuration for a working directory with optional CLI overrides.
    ///
    /// Merges config in order: global → local → overrides.
    pub fn load(
        &mut self,
        root: &Path,
        overrides: Option<&ConfigOverrides>,
    ) -> Result<OxoConfig, ConfigError> {
        let mut config = OxoConfig::default();

        if let Some(global_config) = self.load_global()? {
            config = merge_configs(config, global_config);
        }

        if let Some(local_config) = self.load_local(root)? {
            config = merge_configs(config, local_config);
        }

        if let Some(ovr) = overrides {
            config.apply_overrides(ovr);
        }

        Ok(config)
    }

    /// Load a single explicit config file over the defaults.
    pub fn load_file(
        &self,
        path: &Path,
        overrides: Option<&ConfigOverrides>,
    ) -> Result<OxoConfig, ConfigError> {
        debug!("Loading config from {:?}", path);
        let mut config = merge_configs(OxoConfig::default(), load_config_file(path)?);
        if let Some(ovr) = overrides {
            config.apply_overrides(ovr);
        }
        Ok(config)
    }

    /// Load only the global configuration.
    pub fn load_global(&mut self) -> Result<Option<OxoConfig>, ConfigError> {
        if let Some(ref config) = self.global_config {
            return Ok(Some(config.clone()));
        }

        let Some(global_path) = self.global_config_path() else {
            debug!("No home directory found, skipping global config");
            return Ok(None);
        };

        if !global_path.exists() {
            trace!("Global config not found at {:?}", global_path);
            return Ok(None);
        }

        debug!("Loading global config from {:?}", global_path);
        let config = load_config_file(&global_path)?;

        self.global_config = Some(config.clone());

        Ok(Some(config))
    }

    /// Load only the local configuration for a working directory.
    pub fn load_local(&self, root: &Path) -> Result<Option<OxoConfig>, ConfigError> {
        let local_path = self.local_config_path(root);

        if !local_path.exists() {
            trace!("Local config not found at {:?}", local_path);
            return Ok(None);
        }

        debug!("Loading local config from {:?}", local_path);
        load_config_file(&local_path).map(Some)
    }

    /// Initialize global configuration.
    ///
    /// Creates `~/.oxo/config.toml` with default configuration if missing.
    pub fn init_global(&self) -> Result<PathBuf, ConfigError> {
        let Some(ref global_dir) = self.global_config_dir else {
            return Err(ConfigError::NoHomeDir);
        };

        init_config_at(global_dir)
    }

    /// Initialize local configuration for a working directory.
    ///
    /// Creates `.oxo/config.toml` with default configuration if missing.
    pub fn init_local(&self, root: &Path) -> Result<PathBuf, ConfigError> {
        init_config_at(&root.join(LOCAL_CONFIG_DIR))
    }
}

fn init_config_at(dir: &Path) -> Result<PathBuf, ConfigError> {
    if !dir.exists() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::create_dir(dir, e))?;
    }

    let config_path = dir.join(CONFIG_FILE_NAME);
    if !config_path.exists() {
        save_config_file(&config_path, &OxoConfig::default())?;
    }

    Ok(config_path)
}

/// Load a configuration file from disk.
fn load_config_file(path: &Path) -> Result<OxoConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;

    toml::from_str(&content).map_err(|e| ConfigError::parse_toml(path, e))
}

/// Save a configuration file to disk.
fn save_config_file(path: &Path, config: &OxoConfig) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))
}

/// Merge two configurations, with `overlay` taking precedence.
///
/// Fields left at their default in `overlay` keep the `base` value, so partial
/// config files only change what they mention.
fn merge_configs(base: OxoConfig, overlay: OxoConfig) -> OxoConfig {
    OxoConfig {
        data: merge_data(base.data, overlay.data),
        resolver: merge_resolver(base.resolver, overlay.resolver),
        logging: merge_logging(base.logging, overlay.logging),
    }
}

fn pick<T: PartialEq>(base: T, overlay: T, default: T) -> T {
    if overlay != default {
        overlay
    } else {
        base
    }
}

fn merge_data(base: DataConfig, overlay: DataConfig) -> DataConfig {
    let default = DataConfig::default();
    DataConfig {
        data_dir: pick(base.data_dir, overlay.data_dir, default.data_dir),
        terms_file: pick(base.terms_file, overlay.terms_file, default.terms_file),
        ols_mappings_file: pick(
            base.ols_mappings_file,
            overlay.ols_mappings_file,
            default.ols_mappings_file,
        ),
        umls_mappings_file: pick(
            base.umls_mappings_file,
            overlay.umls_mappings_file,
            default.umls_mappings_file,
        ),
        // Overlay tables extend base tables
        extra_mappings: {
            let mut tables = base.extra_mappings;
            for table in overlay.extra_mappings {
                if !tables.contains(&table) {
                    tables.push(table);
                }
            }
            tables
        },
    }
}

fn merge_resolver(base: ResolverConfig, overlay: ResolverConfig) -> ResolverConfig {
    let default = ResolverConfig::default();
    ResolverConfig {
        default_distance: pick(
            base.default_distance,
            overlay.default_distance,
            default.default_distance,
        ),
        default_targets: if overlay.default_targets.is_empty() {
            base.default_targets
        } else {
            overlay.default_targets
        },
        parallel_threshold: pick(
            base.parallel_threshold,
            overlay.parallel_threshold,
            default.parallel_threshold,
        ),
    }
}

fn merge_logging(base: LoggingConfig, overlay: LoggingConfig) -> LoggingConfig {
    LoggingConfig {
        level: if overlay.level != "info" {
            overlay.level
        } else {
            base.level
        },
        format: pick(base.format, overlay.format, crate::LogFormat::Text),
    }
}
