//! Normalisation of submitted form values.
//!
//! Values are trimmed and stripped of control characters before they reach
//! a query. HTML escaping happens at render time (tera autoescape).

use crate::error::{Result, ServerError};

/// Trim and drop control characters
pub fn clean(value: &str) -> String {
    value.trim().chars().filter(|c| !c.is_control()).collect()
}

/// Clean an optional value, mapping blanks to `None`
pub fn clean_opt(value: Option<&str>) -> Option<String> {
    value.map(clean).filter(|v| !v.is_empty())
}

/// A required text field
pub fn required(label: &str, value: &str) -> Result<String> {
    let value = clean(value);
    if value.is_empty() {
        return Err(ServerError::InvalidRequest(format!("{} is required", label)));
    }
    Ok(value)
}

/// A required finite decimal field
pub fn parse_f64(label: &str, value: &str) -> Result<f64> {
    let value = required(label, value)?;
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ServerError::InvalidRequest(format!("{} must be a number", label)))
}

/// A required integer field
pub fn parse_i32(label: &str, value: &str) -> Result<i32> {
    let value = required(label, value)?;
    value
        .parse::<i32>()
        .map_err(|_| ServerError::InvalidRequest(format!("{} must be a whole number", label)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean() {
        assert_eq!(clean("  Iron,Zinc \n"), "Iron,Zinc");
        assert_eq!(clean("A\u{0}C"), "AC");
        assert_eq!(clean_opt(Some("   ")), None);
        assert_eq!(clean_opt(Some(" bay 4 ")), Some("bay 4".to_string()));
    }

    #[test]
    fn test_numeric_fields() {
        assert_eq!(parse_f64("Calories", " 250.5 ").unwrap(), 250.5);
        assert!(parse_f64("Calories", "abc").is_err());
        assert!(parse_f64("Calories", "NaN").is_err());
        assert!(parse_f64("Calories", "").is_err());
        assert_eq!(parse_i32("Day", "15").unwrap(), 15);
        assert!(parse_i32("Day", "15.5").is_err());
    }

    #[test]
    fn test_required_message() {
        let err = required("License plate", "  ").unwrap_err();
        assert_eq!(err.to_string(), "License plate is required");
    }
}
