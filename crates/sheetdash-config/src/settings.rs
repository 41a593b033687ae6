//! Application configuration structures

use serde::{Deserialize, Serialize};
use sheetdash_common::{BusinessAddress, ClientProfile, SheetSourceConfig, StaticDirectory};
use sheetdash_graphs::{
    FontConfig, Granularity, GridConfig, MarginConfig, ParseGranularityError, StyleConfig,
    DEFAULT_CUSTOMER_FIELD, DEFAULT_SALES_FIELD, DEFAULT_TIMESTAMP_FIELD,
};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Config {
    /// Spreadsheet download settings
    #[validate]
    pub source: SourceConfig,

    /// Normalized names of the columns the charts read
    #[validate]
    pub columns: ColumnsConfig,

    /// Chart defaults
    #[validate]
    pub charts: ChartsConfig,

    /// Bitmap rendering settings
    #[validate]
    pub graph: GraphConfig,

    /// Where chart output goes
    #[validate]
    pub output: OutputConfig,

    /// Logging configuration
    #[validate]
    pub logging: LoggingConfig,

    /// Known clients and their response sheets
    #[validate]
    pub clients: Vec<ClientConfig>,
}

/// Spreadsheet export download configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SourceConfig {
    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300, message = "Timeout must be between 1 and 300 seconds"))]
    pub timeout_seconds: u64,

    /// Retries after the first attempt
    #[validate(range(max = 10, message = "Max retries cannot exceed 10"))]
    pub max_retries: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ColumnsConfig {
    #[validate(custom(
        function = "crate::validation::validate_column_name",
        message = "Column names must be lower-case with underscores"
    ))]
    pub timestamp: String,

    /// Customer identifier used for the active customers chart
    #[validate(custom(
        function = "crate::validation::validate_column_name",
        message = "Column names must be lower-case with underscores"
    ))]
    pub customer: String,

    /// Numeric metric used for the total sales chart
    #[validate(custom(
        function = "crate::validation::validate_column_name",
        message = "Column names must be lower-case with underscores"
    ))]
    pub sales: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ChartsConfig {
    /// Default period for the active customers chart
    #[validate(custom(
        function = "crate::validation::validate_granularity",
        message = "Period must be daily, weekly or monthly"
    ))]
    pub customers_period: String,

    /// Default period for the total sales chart
    #[validate(custom(
        function = "crate::validation::validate_granularity",
        message = "Period must be daily, weekly or monthly"
    ))]
    pub sales_period: String,

    /// Insert zero-value bars for empty periods between the first and last
    pub fill_gaps: bool,
}

/// Graph rendering configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct GraphConfig {
    /// Graph width in pixels
    #[validate(range(min = 100, max = 4000, message = "Width must be between 100 and 4000 pixels"))]
    pub width: u32,

    /// Graph height in pixels
    #[validate(range(min = 100, max = 4000, message = "Height must be between 100 and 4000 pixels"))]
    pub height: u32,

    /// Background color (hex format)
    #[validate(regex(path = "crate::validation::HEX_COLOR_REGEX", message = "Background color must be valid hex color"))]
    pub background_color: String,

    /// Bar fill color (hex format)
    #[validate(regex(path = "crate::validation::HEX_COLOR_REGEX", message = "Bar color must be valid hex color"))]
    pub bar_color: String,

    /// Font family for text rendering
    #[validate(length(min = 1, message = "Font family cannot be empty"))]
    pub font_family: String,

    /// Font size for labels; titles are drawn at twice this size
    #[validate(range(min = 8, max = 72, message = "Font size must be between 8 and 72"))]
    pub font_size: u32,

    /// Whether to draw horizontal grid lines
    pub show_grid: bool,
}

/// Chart output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Chart descriptions as JSON
    Json,
    /// Bitmap charts
    Png,
    /// JSON and PNG side by side
    Both,
}

impl OutputFormat {
    pub fn writes_json(self) -> bool {
        matches!(self, Self::Json | Self::Both)
    }

    pub fn writes_png(self) -> bool {
        matches!(self, Self::Png | Self::Both)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Json => "json",
            Self::Png => "png",
            Self::Both => "both",
        })
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "png" => Ok(Self::Png),
            "both" => Ok(Self::Both),
            other => Err(format!("unknown output format '{other}', expected json, png or both")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory that receives chart files; JSON goes to stdout when unset
    #[validate(custom(function = "crate::validation::validate_file_path", message = "Invalid output directory"))]
    pub directory: Option<String>,

    pub format: OutputFormat,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[validate(custom(
        function = "crate::validation::validate_log_level",
        message = "Log level must be one of: trace, debug, info, warn, error"
    ))]
    pub level: String,

    /// Optional log file path
    #[validate(custom(function = "crate::validation::validate_file_path", message = "Invalid log file path"))]
    pub file: Option<String>,

    /// One JSON object per event
    pub json: bool,

    /// Whether to log span open/close events
    pub include_spans: bool,
}

/// A client directory entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ClientConfig {
    #[validate(email(message = "Client e-mail must be a valid address"))]
    pub email: String,

    #[validate(length(min = 1, message = "Client name cannot be empty"))]
    pub client_name: String,

    #[serde(default)]
    pub contact_no: Option<String>,

    #[validate(length(min = 1, message = "Business name cannot be empty"))]
    pub business_name: String,

    #[serde(default)]
    pub business_address: BusinessAddress,

    #[serde(default)]
    #[validate(url(message = "Form link must be a valid URL"))]
    pub form_link: Option<String>,

    /// Link to the client's form response spreadsheet
    #[validate(custom(
        function = "crate::validation::validate_sheet_url",
        message = "Response sheet link must be an http(s) spreadsheet link"
    ))]
    pub response_sheet_link: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            max_retries: 2,
        }
    }
}

impl Default for ColumnsConfig {
    fn default() -> Self {
        Self {
            timestamp: DEFAULT_TIMESTAMP_FIELD.to_string(),
            customer: DEFAULT_CUSTOMER_FIELD.to_string(),
            sales: DEFAULT_SALES_FIELD.to_string(),
        }
    }
}

impl Default for ChartsConfig {
    fn default() -> Self {
        Self {
            customers_period: Granularity::Monthly.to_string(),
            sales_period: Granularity::Monthly.to_string(),
            fill_gaps: false,
        }
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 600,
            background_color: "#FFFFFF".to_string(),
            bar_color: "#1F77B4".to_string(),
            font_family: "sans-serif".to_string(),
            font_size: 12,
            show_grid: true,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: None,
            format: OutputFormat::Json,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            json: false,
            include_spans: false,
        }
    }
}

impl Config {
    /// Validation of every section plus cross-section checks
    pub fn validate_all(&self) -> Result<(), validator::ValidationErrors> {
        self.validate()?;
        self.validate_clients()
    }

    /// E-mail addresses identify clients, so they must be unique
    fn validate_clients(&self) -> Result<(), validator::ValidationErrors> {
        let mut seen = std::collections::HashSet::new();
        let duplicate = self
            .clients
            .iter()
            .any(|client| !seen.insert(client.email.trim().to_lowercase()));

        if duplicate {
            let mut errors = validator::ValidationErrors::new();
            errors.add("clients", validator::ValidationError::new("duplicate_client_email"));
            return Err(errors);
        }
        Ok(())
    }

    /// Client directory backed by the configured entries
    pub fn directory(&self) -> sheetdash_common::Result<StaticDirectory> {
        StaticDirectory::new(self.clients.iter().cloned().map(ClientProfile::from).collect::<Vec<_>>())
    }
}

impl ChartsConfig {
    pub fn customers_granularity(&self) -> Result<Granularity, ParseGranularityError> {
        self.customers_period.parse()
    }

    pub fn sales_granularity(&self) -> Result<Granularity, ParseGranularityError> {
        self.sales_period.parse()
    }
}

impl SourceConfig {
    pub fn to_source_config(&self) -> SheetSourceConfig {
        SheetSourceConfig::default()
            .with_timeout(self.timeout_seconds)
            .with_max_retries(self.max_retries as usize)
    }
}

impl GraphConfig {
    /// Style handed to the bitmap renderer
    pub fn to_graph_config(&self) -> sheetdash_graphs::GraphConfig {
        sheetdash_graphs::GraphConfig {
            width: self.width,
            height: self.height,
            style: StyleConfig {
                bar_color: self.bar_color.clone(),
                background_color: self.background_color.clone(),
                title_font: FontConfig {
                    family: self.font_family.clone(),
                    size: self.font_size * 2,
                },
                label_font: FontConfig {
                    family: self.font_family.clone(),
                    size: self.font_size,
                },
                margins: MarginConfig::default(),
                grid: GridConfig {
                    show_x: false,
                    show_y: self.show_grid,
                },
            },
        }
    }
}

impl LoggingConfig {
    pub fn to_logging_config(&self) -> sheetdash_common::LoggingConfig {
        sheetdash_common::LoggingConfig {
            level: self.level.clone(),
            json_format: self.json,
            file_path: self.file.clone(),
            include_spans: self.include_spans,
            ..sheetdash_common::LoggingConfig::default()
        }
    }
}

impl From<ClientConfig> for ClientProfile {
    fn from(client: ClientConfig) -> Self {
        Self {
            email: client.email,
            client_name: client.client_name,
            contact_no: client.contact_no,
            business_name: client.business_name,
            business_address: client.business_address,
            form_link: client.form_link,
            response_sheet_link: client.response_sheet_link,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(email: &str) -> ClientConfig {
        ClientConfig {
            email: email.to_string(),
            client_name: "Asha".to_string(),
            contact_no: Some("9845000000".to_string()),
            business_name: "Asha Bakes".to_string(),
            business_address: BusinessAddress::default(),
            form_link: Some("https://forms.gle/abc".to_string()),
            response_sheet_link: "https://docs.google.com/spreadsheets/d/abc/edit".to_string(),
        }
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.validate_all().is_ok());
        assert_eq!(config.columns.customer, "customer_mobile_number");
        assert_eq!(config.charts.customers_granularity().unwrap(), Granularity::Monthly);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(config.clients.is_empty());
    }

    #[test]
    fn test_config_serialization() {
        let mut config = Config::default();
        config.clients.push(client("owner@example.com"));

        let yaml = serde_yaml::to_string(&config).expect("Failed to serialize to YAML");
        assert!(yaml.contains("columns:"));
        assert!(yaml.contains("charts:"));
        assert!(yaml.contains("format: json"));

        let deserialized: Config = serde_yaml::from_str(&yaml).expect("Failed to deserialize from YAML");
        assert_eq!(deserialized, config);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = "charts:\n  sales_period: weekly\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.charts.sales_granularity().unwrap(), Granularity::Weekly);
        assert_eq!(config.charts.customers_granularity().unwrap(), Granularity::Monthly);
        assert_eq!(config.graph.width, 1000);
    }

    #[test]
    fn test_columns_must_be_normalized() {
        let mut config = ColumnsConfig::default();
        assert!(config.validate().is_ok());

        config.sales = "Total Sales".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_charts_period_validation() {
        let mut config = ChartsConfig::default();
        config.customers_period = "Week on Week".to_string();
        assert!(config.validate().is_ok());

        config.sales_period = "yearly".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_graph_config_validation() {
        let mut config = GraphConfig::default();
        assert!(config.validate().is_ok());

        config.width = 50;
        assert!(config.validate().is_err());

        config.width = 1000;
        config.bar_color = "blue".to_string();
        assert!(config.validate().is_err());

        config.bar_color = "#0000FF".to_string();
        config.font_size = 4;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_logging_config_validation() {
        let mut config = LoggingConfig::default();
        assert!(config.validate().is_ok());

        config.level = "verbose".to_string();
        assert!(config.validate().is_err());

        config.level = "debug".to_string();
        config.file = Some("logs/out|put.log".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_client_validation() {
        assert!(client("owner@example.com").validate().is_ok());

        let mut bad_email = client("not-an-email");
        assert!(bad_email.validate().is_err());

        bad_email.email = "owner@example.com".to_string();
        bad_email.response_sheet_link = "sheet".to_string();
        assert!(bad_email.validate().is_err());
    }

    #[test]
    fn test_nested_client_errors_fail_config() {
        let mut config = Config::default();
        config.clients.push(client("broken"));
        assert!(config.validate_all().is_err());
    }

    #[test]
    fn test_duplicate_client_emails() {
        let mut config = Config::default();
        config.clients.push(client("owner@example.com"));
        config.clients.push(client("Owner@Example.com "));
        assert!(config.validate_all().is_err());
    }

    #[test]
    fn test_conversions() {
        let config = Config::default();

        let graph = config.graph.to_graph_config();
        assert_eq!(graph.width, 1000);
        assert_eq!(graph.style.title_font.size, 24);
        assert!(graph.style.grid.show_y);

        let logging = config.logging.to_logging_config();
        assert_eq!(logging.level, "info");
        assert!(!logging.json_format);

        let source = config.source.to_source_config();
        assert_eq!(source.timeout_secs, 30);
        assert_eq!(source.max_retries, 2);
    }

    #[test]
    fn test_output_format() {
        assert_eq!("PNG".parse::<OutputFormat>().unwrap(), OutputFormat::Png);
        assert!(OutputFormat::Both.writes_json() && OutputFormat::Both.writes_png());
        assert!(!OutputFormat::Json.writes_png());
        assert!("svg".parse::<OutputFormat>().is_err());
    }

    #[tokio::test]
    async fn test_directory_from_config() {
        use sheetdash_common::ClientDirectory;

        let mut config = Config::default();
        config.clients.push(client("owner@example.com"));
        let directory = config.directory().unwrap();
        let profile = directory.client_for("OWNER@example.com").await.unwrap();
        assert_eq!(profile.business_name, "Asha Bakes");
    }
}
