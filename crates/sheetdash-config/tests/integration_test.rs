//! Integration tests for sheetdash-config crate.

use sheetdash_common::{ClientDirectory, DashError};
use sheetdash_config::{Config, ConfigLoader, OutputFormat};
use sheetdash_graphs::Granularity;
use std::io::Write;

const CLIENTS_YAML: &str = "charts:
  customers_period: weekly
output:
  format: png
clients:
  - email: owner@example.com
    client_name: Asha
    business_name: Asha Bakes
    response_sheet_link: https://docs.google.com/spreadsheets/d/abc/edit
  - email: ravi@example.com
    client_name: Ravi
    business_name: Ravi Stores
    response_sheet_link: https://docs.google.com/spreadsheets/d/xyz/edit#gid=42
";

#[test]
fn test_default_config_validation() {
    let config = Config::default();
    assert!(config.validate_all().is_ok());
}

#[tokio::test]
async fn test_file_to_directory() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(CLIENTS_YAML.as_bytes()).unwrap();

    let config = ConfigLoader::load_config_with(file.path(), |_| None).unwrap();
    assert_eq!(config.charts.customers_granularity().unwrap(), Granularity::Weekly);
    assert_eq!(config.output.format, OutputFormat::Png);

    let directory = config.directory().unwrap();
    let ravi = directory.client_for("ravi@example.com").await.unwrap();
    assert_eq!(ravi.business_name, "Ravi Stores");
    assert!(ravi.contact_no.is_none());

    let missing = directory.client_for("someone@example.com").await.unwrap_err();
    assert!(matches!(missing, DashError::Directory { .. }));
}

#[test]
fn test_load_from_file_reports_dash_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"graph:\n  bar_color: orange\n").unwrap();

    let err = ConfigLoader::load_from_file(file.path()).unwrap_err();
    assert!(matches!(err, DashError::Config { .. }));
    assert!(err.to_string().contains("validation"));
}
