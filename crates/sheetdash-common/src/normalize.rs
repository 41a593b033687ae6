//! Column-name normalization applied once when a record set is built.
//!
//! The rule is: trim surrounding whitespace, replace every space with an
//! underscore, lower-case. `" Customer Mobile Number "` becomes
//! `"customer_mobile_number"`. Other characters are left untouched so the
//! mapping stays predictable for people writing configuration by hand.

/// Normalize a single column name.
pub fn normalize_column_name(name: &str) -> String {
    name.trim().replace(' ', "_").to_lowercase()
}

/// Whether a name is already in normalized form.
pub fn is_normalized(name: &str) -> bool {
    !name.is_empty() && normalize_column_name(name) == name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_column_name() {
        assert_eq!(normalize_column_name("Timestamp"), "timestamp");
        assert_eq!(
            normalize_column_name("  Customer Mobile Number "),
            "customer_mobile_number"
        );
        assert_eq!(normalize_column_name("Total Sales"), "total_sales");
        assert_eq!(normalize_column_name("order-value (INR)"), "order-value_(inr)");
    }

    #[test]
    fn test_inner_spaces_are_not_collapsed() {
        assert_eq!(normalize_column_name("Total  Sales"), "total__sales");
    }

    #[test]
    fn test_is_normalized() {
        assert!(is_normalized("total_sales"));
        assert!(!is_normalized("Total Sales"));
        assert!(!is_normalized(" timestamp"));
        assert!(!is_normalized(""));
    }
}
