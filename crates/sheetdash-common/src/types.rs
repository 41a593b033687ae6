//! Record model and client profile types shared across sheetdash

use crate::{normalize::normalize_column_name, DashError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::io::Read;
use tracing::warn;

/// One row of input data: raw cell text in column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    cells: Vec<String>,
}

impl Record {
    /// Cell text at a column index; `None` past the end of the row.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.cells.get(index).map(String::as_str)
    }

    /// All cells of the row.
    pub fn cells(&self) -> &[String] {
        &self.cells
    }
}

/// A uniformly shaped table of records with normalized column names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSet {
    columns: Vec<String>,
    records: Vec<Record>,
    /// Names that more than one header normalized to
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    ambiguous: BTreeSet<String>,
}

impl RecordSet {
    /// Build a record set from raw headers and rows.
    ///
    /// Headers are normalized here and nowhere else. A blank header becomes
    /// `unnamed_<position>` and a repeated name gets a `.1`, `.2`, ...
    /// suffix, so only a chart that asks for such a name fails. Short rows
    /// are padded with empty cells, long rows are cut to the header width.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        let mut columns = Vec::with_capacity(headers.len());
        let mut seen = HashSet::new();
        let mut ambiguous = BTreeSet::new();

        for (position, header) in headers.iter().enumerate() {
            let mut name = normalize_column_name(header);
            if name.is_empty() {
                name = format!("unnamed_{position}");
            }
            if seen.contains(&name) {
                let base = name;
                name = (1..)
                    .map(|n| format!("{base}.{n}"))
                    .find(|candidate| !seen.contains(candidate))
                    .unwrap_or_default();
                ambiguous.insert(base);
            }
            seen.insert(name.clone());
            columns.push(name);
        }

        if !ambiguous.is_empty() {
            warn!(columns = ?ambiguous, "Repeated column names were given numeric suffixes");
        }

        let width = columns.len();
        let records = rows
            .into_iter()
            .map(|mut cells| {
                cells.resize(width, String::new());
                Record { cells }
            })
            .collect();

        Ok(Self {
            columns,
            records,
            ambiguous,
        })
    }

    /// Parse CSV text (first row is the header) into a record set.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::None)
            .from_reader(reader);

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
            return Err(DashError::record_source("CSV data has no header row"));
        }

        let mut rows = Vec::new();
        for row in reader.records() {
            let row = row?;
            rows.push(row.iter().map(str::to_string).collect());
        }

        Self::new(headers, rows)
    }

    /// Normalized column names in source order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Records in source order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the set holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Position of a column, or a missing-field error naming the columns that exist.
    ///
    /// A name shared by several source headers cannot be resolved and is a
    /// source error.
    pub fn column_index(&self, field: &str) -> Result<usize> {
        if self.ambiguous.contains(field) {
            return Err(DashError::record_source(format!(
                "Column '{field}' appears more than once in the header row"
            )));
        }
        self.columns
            .iter()
            .position(|c| c == field)
            .ok_or_else(|| DashError::missing_field(field, &self.columns))
    }

    /// Iterate the values of one column.
    pub fn values<'a>(&'a self, field: &str) -> Result<impl Iterator<Item = &'a str> + 'a> {
        let index = self.column_index(field)?;
        Ok(self.records.iter().map(move |r| r.get(index).unwrap_or("")))
    }
}

/// Postal address of a client business.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub country: String,
}

/// A registered client (tenant) of the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientProfile {
    pub email: String,
    pub client_name: String,
    pub contact_no: Option<String>,
    pub business_name: String,
    #[serde(default)]
    pub business_address: BusinessAddress,
    pub form_link: Option<String>,
    /// Spreadsheet holding the client's form responses
    pub response_sheet_link: String,
}
