//! Configuration management for sheetdash

pub mod loader;
pub mod settings;
pub mod validation;

pub use loader::{ConfigError, ConfigLoader};
pub use settings::{
    ChartsConfig, ClientConfig, ColumnsConfig, Config, GraphConfig, LoggingConfig, OutputConfig,
    OutputFormat, SourceConfig,
};
