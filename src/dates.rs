//! Calendar rules for the day/month/year fields on analysis forms.
//!
//! The analysis form's inline script applies the same rule in the browser;
//! keep `days_in_month` and the `daysInMonth` script in the analysis
//! template in sync.

use chrono::NaiveDate;

pub const MIN_YEAR: i32 = 1900;
pub const MAX_YEAR: i32 = 2100;

/// Gregorian leap year
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `month` (1-12) of `year`, `None` for an invalid month
pub fn days_in_month(month: i32, year: i32) -> Option<i32> {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => Some(31),
        4 | 6 | 9 | 11 => Some(30),
        2 if is_leap_year(year) => Some(29),
        2 => Some(28),
        _ => None,
    }
}

/// Check a day/month/year triple, returning a message suitable for the form
pub fn validate_date(day: i32, month: i32, year: i32) -> Result<(), String> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(format!("Year must be between {} and {}", MIN_YEAR, MAX_YEAR));
    }
    let max_day = days_in_month(month, year).ok_or_else(|| "Month must be between 1 and 12".to_string())?;
    if day < 1 || day > max_day {
        return Err(format!(
            "Day must be between 1 and {} for the selected month",
            max_day
        ));
    }
    Ok(())
}

/// Format a stored ISO date (`2024-06-15`) as `June 15, 2024`.
///
/// Values that don't parse are returned unchanged.
pub fn format_inspection_date(iso: &str) -> String {
    match NaiveDate::parse_from_str(iso.trim(), "%Y-%m-%d") {
        Ok(date) => date.format("%B %-d, %Y").to_string(),
        Err(_) => iso.to_string(),
    }
}
