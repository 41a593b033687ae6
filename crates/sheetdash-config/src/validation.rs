//! Validation utilities and regex patterns

use regex::Regex;
use sheetdash_common::{export_url, is_normalized};
use sheetdash_graphs::Granularity;
use std::sync::LazyLock;
use validator::ValidationError;

/// Regex pattern for validating hex color codes (e.g., #FFFFFF, #FF0000)
pub static HEX_COLOR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("Invalid hex color regex pattern")
});

/// Validate a spreadsheet link that an export URL can be derived from
pub fn validate_sheet_url(url: &str) -> Result<(), ValidationError> {
    if url.trim().is_empty() {
        return Err(ValidationError::new("empty_sheet_url"));
    }
    export_url(url)
        .map(|_| ())
        .map_err(|_| ValidationError::new("invalid_sheet_url"))
}

/// Column names in configuration must already be in normalized form
pub fn validate_column_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::new("empty_column_name"));
    }
    if is_normalized(name) {
        Ok(())
    } else {
        Err(ValidationError::new("column_name_not_normalized"))
    }
}

/// Validate a period name such as "monthly" or "Week on Week"
pub fn validate_granularity(value: &str) -> Result<(), ValidationError> {
    value
        .parse::<Granularity>()
        .map(|_| ())
        .map_err(|_| ValidationError::new("invalid_granularity"))
}

/// Validate log level
pub fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    match level {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ValidationError::new("invalid_log_level")),
    }
}

/// Validate file path (basic check for valid path characters)
pub fn validate_file_path(path: &str) -> Result<(), ValidationError> {
    if path.is_empty() {
        return Err(ValidationError::new("empty_file_path"));
    }

    // Colon stays allowed for Windows drive letters
    let invalid_chars = ['<', '>', '"', '|', '?', '*'];
    if path.chars().any(|c| invalid_chars.contains(&c)) {
        return Err(ValidationError::new("invalid_file_path_characters"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_color_regex() {
        assert!(HEX_COLOR_REGEX.is_match("#FFFFFF"));
        assert!(HEX_COLOR_REGEX.is_match("#1f77b4"));

        assert!(!HEX_COLOR_REGEX.is_match("FFFFFF")); // Missing #
        assert!(!HEX_COLOR_REGEX.is_match("#FFF")); // Too short
        assert!(!HEX_COLOR_REGEX.is_match("#FFFFFFF")); // Too long
        assert!(!HEX_COLOR_REGEX.is_match("#GGGGGG"));
        assert!(!HEX_COLOR_REGEX.is_match(""));
    }

    #[test]
    fn test_validate_sheet_url() {
        assert!(validate_sheet_url("https://docs.google.com/spreadsheets/d/abc123/edit#gid=0").is_ok());
        assert!(validate_sheet_url("https://docs.google.com/spreadsheets/d/abc123").is_ok());

        assert!(validate_sheet_url("").is_err());
        assert!(validate_sheet_url("not a url").is_err());
        assert!(validate_sheet_url("ftp://example.com/sheet").is_err());
    }

    #[test]
    fn test_validate_column_name() {
        assert!(validate_column_name("timestamp").is_ok());
        assert!(validate_column_name("customer_mobile_number").is_ok());

        assert!(validate_column_name("").is_err());
        assert!(validate_column_name("Total Sales").is_err());
        assert!(validate_column_name("total sales").is_err());
        assert!(validate_column_name(" timestamp").is_err());
    }

    #[test]
    fn test_validate_granularity() {
        assert!(validate_granularity("monthly").is_ok());
        assert!(validate_granularity("Week on Week").is_ok());
        assert!(validate_granularity("d").is_ok());
        assert!(validate_granularity("quarterly").is_err());
    }

    #[test]
    fn test_validate_log_level() {
        for level in ["trace", "debug", "info", "warn", "error"] {
            assert!(validate_log_level(level).is_ok(), "Level {level} should be valid");
        }
        assert!(validate_log_level("verbose").is_err());
    }

    #[test]
    fn test_validate_file_path() {
        assert!(validate_file_path("./charts").is_ok());
        assert!(validate_file_path("C:\\charts\\out").is_ok());
        assert!(validate_file_path("").is_err());
        assert!(validate_file_path("charts?").is_err());
    }
}
