//! Cell normalization for dates and amounts.
//!
//! Both functions are total: anything they cannot interpret degrades to a
//! fallback value instead of an error.

use chrono::NaiveDate;

use crate::models::Cell;

/// ISO-8601 date for a date cell.
///
/// Text is tried against `formats` (day-month-year layouts); text that fits
/// none of them is returned verbatim.
pub fn normalize_date(cell: &Cell, formats: &[String]) -> String {
    match cell {
        Cell::CalendarDate(d) => d.format("%Y-%m-%d").to_string(),
        Cell::Text(raw) => parse_text_date(raw.trim(), formats)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| raw.clone()),
        other => other.to_string(),
    }
}

fn parse_text_date(text: &str, formats: &[String]) -> Option<NaiveDate> {
    formats
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
}

/// Non-negative amount for a withdrawal/deposit cell.
///
/// Thousands separators and surrounding whitespace are stripped; blank or
/// unparseable text is `0.0`. Signs and accounting parentheses are dropped.
pub fn to_amount(cell: &Cell) -> f64 {
    let value = match cell {
        Cell::Number(n) => *n,
        Cell::Text(raw) => parse_amount_text(raw),
        Cell::CalendarDate(_) | Cell::Empty => 0.0,
    };
    if value.is_finite() {
        value.abs()
    } else {
        0.0
    }
}

fn parse_amount_text(raw: &str) -> f64 {
    let cleaned: String = raw.chars().filter(|c| *c != ',').collect();
    let cleaned = cleaned.trim();
    let cleaned = cleaned
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .unwrap_or(cleaned)
        .trim();

    if cleaned.is_empty() {
        return 0.0;
    }
    cleaned.parse::<f64>().unwrap_or(0.0)
}
