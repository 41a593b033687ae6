//! Test utilities and shared fixtures for the sheetdash workspace.

use crate::types::{BusinessAddress, ClientProfile, RecordSet};

/// Build a record set from string slices; panics on invalid headers.
pub fn record_set(headers: &[&str], rows: &[&[&str]]) -> RecordSet {
    RecordSet::new(
        headers.iter().map(|h| h.to_string()).collect(),
        rows.iter()
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .collect(),
    )
    .expect("fixture headers must be valid")
}

/// The three-record set used throughout the aggregation examples:
/// A on 2024-03-01 (10), B on 2024-03-15 (20), A on 2024-04-02 (5).
pub fn example_records() -> RecordSet {
    record_set(
        &["id", "ts", "val"],
        &[
            &["A", "2024-03-01", "10"],
            &["B", "2024-03-15", "20"],
            &["A", "2024-04-02", "5"],
        ],
    )
}

/// A response sheet shaped like a real form export, with raw headers.
pub fn form_responses() -> RecordSet {
    record_set(
        &["Timestamp", "Customer Mobile Number", "Total Sales"],
        &[
            &["3/1/2024 09:15:00", "9845000001", "120"],
            &["3/1/2024 17:40:12", "9845000002", "80.50"],
            &["3/4/2024 10:00:00", "9845000001", "200"],
            &["not-a-date", "9845000003", "999"],
            &["3/20/2024 12:00:00", "9845000002", "n/a"],
            &["4/2/2024 08:05:00", "9845000004", "60"],
        ],
    )
}

/// A client profile pointing at a placeholder sheet.
pub fn sample_client(email: &str) -> ClientProfile {
    ClientProfile {
        email: email.to_string(),
        client_name: "Test Client".to_string(),
        contact_no: Some("9845000000".to_string()),
        business_name: "Test Bakery".to_string(),
        business_address: BusinessAddress {
            street: "1 MG Road".to_string(),
            city: "Bengaluru".to_string(),
            state: "Karnataka".to_string(),
            pincode: "560001".to_string(),
            country: "India".to_string(),
        },
        form_link: None,
        response_sheet_link: "https://docs.google.com/spreadsheets/d/test/edit".to_string(),
    }
}

/// Assert that two floating point numbers are approximately equal within a tolerance.
pub fn assert_approx_eq(left: f64, right: f64, tolerance: f64) {
    let diff = (left - right).abs();
    assert!(
        diff <= tolerance,
        "assertion failed: `{left}` is not approximately equal to `{right}` (tolerance: {tolerance}, diff: {diff})"
    );
}
