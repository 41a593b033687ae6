//! Configuration loading utilities

use crate::Config;
use sheetdash_common::{DashError, Result as DashResult};
use std::error::Error as StdError;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info};

/// Environment variable naming an explicit configuration file
pub const CONFIG_PATH_VAR: &str = "SHEETDASH_CONFIG_PATH";

/// Files tried in the working directory when no path is given
pub const DEFAULT_CONFIG_FILES: [&str; 2] = ["sheetdash.yaml", "sheetdash.yml"];

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML configuration: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Configuration validation error
    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {source}")]
    EnvParseError {
        var: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    /// Missing required configuration
    #[error("Missing required configuration: {0}")]
    MissingConfig(String),
}

impl From<ConfigError> for DashError {
    fn from(err: ConfigError) -> Self {
        DashError::config_with_source(err.to_string(), err)
    }
}

/// Configuration loader for the application
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML file with environment variable overrides
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        Self::load_config_with(path, process_env)
    }

    /// Like [`ConfigLoader::load_config`], reading overrides through `lookup`
    pub fn load_config_with<P, F>(path: P, lookup: F) -> Result<Config, ConfigError>
    where
        P: AsRef<Path>,
        F: Fn(&str) -> Option<String>,
    {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::MissingConfig(format!(
                "configuration file {} does not exist",
                path.display()
            )));
        }
        let content = std::fs::read_to_string(path)?;
        debug!("Read configuration from {}", path.display());
        Self::from_yaml_str(&content, lookup)
    }

    /// Parse YAML, apply overrides, validate
    pub fn from_yaml_str<F>(content: &str, lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // An empty file is a valid, all-defaults configuration
        let mut config: Config = if content.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(content)?
        };

        Self::apply_env_overrides(&mut config, &lookup)?;
        config.validate_all()?;
        Ok(config)
    }

    /// Load configuration from environment variables and files
    pub fn load() -> DashResult<Config> {
        let cwd = std::env::current_dir()?;
        Ok(Self::load_with(&cwd, process_env)?)
    }

    /// Resolve and load the configuration relative to `base_dir`
    pub fn load_with<F>(base_dir: &Path, lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        match Self::locate(base_dir, &lookup) {
            Some(path) => {
                info!("Loading configuration from {}", path.display());
                Self::load_config_with(path, lookup)
            }
            None => {
                info!("No configuration file found, using defaults");
                Self::from_yaml_str("", lookup)
            }
        }
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> DashResult<Config> {
        Ok(Self::load_config(path)?)
    }

    /// The file `load` would read: the explicit path variable first, then
    /// the default file names in `base_dir`
    pub fn locate<F>(base_dir: &Path, lookup: &F) -> Option<PathBuf>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(explicit) = lookup(CONFIG_PATH_VAR).filter(|p| !p.trim().is_empty()) {
            return Some(PathBuf::from(explicit));
        }
        DEFAULT_CONFIG_FILES
            .iter()
            .map(|name| base_dir.join(name))
            .find(|candidate| candidate.is_file())
    }

    /// Apply `SHEETDASH_*` overrides to configuration
    pub fn apply_env_overrides<F>(config: &mut Config, lookup: &F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Source
        if let Some(timeout) = parse_var(lookup, "SHEETDASH_SOURCE_TIMEOUT")? {
            config.source.timeout_seconds = timeout;
        }
        if let Some(retries) = parse_var(lookup, "SHEETDASH_SOURCE_MAX_RETRIES")? {
            config.source.max_retries = retries;
        }

        // Columns
        if let Some(column) = lookup("SHEETDASH_TIMESTAMP_COLUMN") {
            config.columns.timestamp = column;
        }
        if let Some(column) = lookup("SHEETDASH_CUSTOMER_COLUMN") {
            config.columns.customer = column;
        }
        if let Some(column) = lookup("SHEETDASH_SALES_COLUMN") {
            config.columns.sales = column;
        }

        // Charts
        if let Some(period) = lookup("SHEETDASH_CUSTOMERS_PERIOD") {
            config.charts.customers_period = period;
        }
        if let Some(period) = lookup("SHEETDASH_SALES_PERIOD") {
            config.charts.sales_period = period;
        }
        if let Some(fill) = parse_var(lookup, "SHEETDASH_FILL_GAPS")? {
            config.charts.fill_gaps = fill;
        }

        // Graph
        if let Some(width) = parse_var(lookup, "SHEETDASH_GRAPH_WIDTH")? {
            config.graph.width = width;
        }
        if let Some(height) = parse_var(lookup, "SHEETDASH_GRAPH_HEIGHT")? {
            config.graph.height = height;
        }
        if let Some(color) = lookup("SHEETDASH_GRAPH_BAR_COLOR") {
            config.graph.bar_color = color;
        }
        if let Some(color) = lookup("SHEETDASH_GRAPH_BACKGROUND_COLOR") {
            config.graph.background_color = color;
        }
        if let Some(family) = lookup("SHEETDASH_GRAPH_FONT_FAMILY") {
            config.graph.font_family = family;
        }
        if let Some(size) = parse_var(lookup, "SHEETDASH_GRAPH_FONT_SIZE")? {
            config.graph.font_size = size;
        }

        // Output
        if let Some(dir) = lookup("SHEETDASH_OUTPUT_DIR") {
            config.output.directory = Some(dir);
        }
        if let Some(format) = parse_var(lookup, "SHEETDASH_OUTPUT_FORMAT")? {
            config.output.format = format;
        }

        // Logging
        if let Some(level) = lookup("SHEETDASH_LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Some(file) = lookup("SHEETDASH_LOG_FILE") {
            config.logging.file = Some(file);
        }
        if let Some(json) = parse_var(lookup, "SHEETDASH_LOG_JSON")? {
            config.logging.json = json;
        }

        Ok(())
    }
}

fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn parse_var<T, F>(lookup: &F, var: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: Into<Box<dyn StdError + Send + Sync>>,
    F: Fn(&str) -> Option<String>,
{
    lookup(var)
        .map(|raw| {
            raw.trim().parse::<T>().map_err(|e| ConfigError::EnvParseError {
                var: var.to_string(),
                source: e.into(),
            })
        })
        .transpose()
}
