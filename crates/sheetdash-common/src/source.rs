//! Record sources: spreadsheet CSV exports over HTTP and local CSV files
//!
//! Every source hands back a [`RecordSet`] whose column names are already
//! normalized, so downstream code never re-normalizes.

use crate::error::{DashError, Result};
use crate::types::RecordSet;
use async_trait::async_trait;
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;
use tokio_retry::{strategy::ExponentialBackoff, RetryIf};
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Anything that can produce a fresh record set on demand.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Fetch the full record set. Called once per dashboard render.
    async fn fetch(&self) -> Result<RecordSet>;

    /// Short description used in logs.
    fn describe(&self) -> String;
}

/// Derive the CSV export URL for a spreadsheet view link.
///
/// Everything from `/edit` onwards is dropped and `/export?format=csv` is
/// appended. A `gid` found in the dropped part is carried over so links to a
/// specific tab export that tab.
pub fn export_url(sheet_url: &str) -> Result<String> {
    let parsed = Url::parse(sheet_url.trim())?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(DashError::validation_field(
            format!("Unsupported URL scheme '{}'", parsed.scheme()),
            "response_sheet_link",
        ));
    }

    let raw = parsed.as_str();
    let (base, tail) = match raw.find("/edit") {
        Some(pos) => (&raw[..pos], &raw[pos..]),
        None => {
            let end = raw.find(['?', '#']).unwrap_or(raw.len());
            (&raw[..end], &raw[end..])
        }
    };
    let base = base.trim_end_matches('/');
    if base.ends_with("/export") {
        return Ok(format!("{base}?format=csv{}", gid_suffix(tail)));
    }

    Ok(format!("{base}/export?format=csv{}", gid_suffix(tail)))
}

fn gid_suffix(tail: &str) -> String {
    tail.split(['?', '#', '&'])
        .find_map(|part| part.strip_prefix("gid="))
        .filter(|gid| !gid.is_empty() && gid.chars().all(|c| c.is_ascii_digit()))
        .map(|gid| format!("&gid={gid}"))
        .unwrap_or_default()
}

/// Settings for fetching spreadsheet exports.
#[derive(Debug, Clone)]
pub struct SheetSourceConfig {
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
    /// Retries after the first attempt for timeouts and 5xx answers (default: 2)
    pub max_retries: usize,
}

impl Default for SheetSourceConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_retries: 2,
        }
    }
}

impl SheetSourceConfig {
    /// Set the request timeout
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Set the maximum retry attempts
    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }
}

/// Fetches a spreadsheet's CSV export.
#[derive(Debug, Clone)]
pub struct SheetSource {
    client: Client,
    export_url: String,
    config: SheetSourceConfig,
}

impl SheetSource {
    /// Create a source for a spreadsheet view URL.
    pub fn new(sheet_url: &str, config: SheetSourceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DashError::network_with_source("Failed to create HTTP client", e))?;

        Ok(Self {
            client,
            export_url: export_url(sheet_url)?,
            config,
        })
    }

    /// The URL the CSV is downloaded from.
    pub fn export_url(&self) -> &str {
        &self.export_url
    }

    async fn download(&self) -> Result<String> {
        let response = self.client.get(&self.export_url).send().await?;
        let status = response.status();

        if status.is_success() {
            debug!("Export request successful: {}", status);
            return Ok(response.text().await?);
        }

        Err(DashError::record_source_with_status(
            format!("Spreadsheet export returned {status}"),
            status.as_u16(),
        ))
    }
}

/// Client errors (private sheet, wrong link) will not fix themselves.
fn is_retryable(err: &DashError) -> bool {
    match err {
        DashError::Network { .. } => true,
        DashError::Source {
            status_code: Some(code),
            ..
        } => *code >= 500,
        _ => false,
    }
}

#[async_trait]
impl RecordSource for SheetSource {
    #[instrument(skip(self), fields(url = %self.export_url))]
    async fn fetch(&self) -> Result<RecordSet> {
        let strategy = ExponentialBackoff::from_millis(100)
            .max_delay(Duration::from_secs(5))
            .take(self.config.max_retries);

        let body = RetryIf::spawn(
            strategy,
            || async {
                self.download().await.map_err(|e| {
                    if is_retryable(&e) {
                        warn!("Spreadsheet export failed, will retry: {}", e);
                    }
                    e
                })
            },
            is_retryable,
        )
        .await?;

        // An HTML sign-in page means the sheet is not shared publicly.
        if body.trim_start().starts_with('<') {
            return Err(DashError::record_source(
                "Spreadsheet export returned HTML instead of CSV; is the sheet shared?",
            ));
        }

        let records = RecordSet::from_csv_reader(body.as_bytes())?;
        info!(
            "Loaded {} records with {} columns from spreadsheet",
            records.len(),
            records.columns().len()
        );
        Ok(records)
    }

    fn describe(&self) -> String {
        format!("spreadsheet {}", self.export_url)
    }
}

/// Reads records from a CSV file on disk.
#[derive(Debug, Clone)]
pub struct CsvFileSource {
    path: PathBuf,
}

impl CsvFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RecordSource for CsvFileSource {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn fetch(&self) -> Result<RecordSet> {
        let bytes = tokio::fs::read(&self.path).await?;
        let records = RecordSet::from_csv_reader(bytes.as_slice())?;
        info!("Loaded {} records from {}", records.len(), self.path.display());
        Ok(records)
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}
