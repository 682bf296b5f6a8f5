//! Value shape checks for the built-in field kinds.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid email regex"));

/// Trailing extension such as `x12`, `ext 12` or `ext.12`.
static PHONE_EXTENSION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s*(?:x|ext\.?)\s*\d{1,6}$").expect("Invalid phone extension regex")
});

static PHONE_BODY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9\s().\-]+$").expect("Invalid phone regex"));

/// Accepted date layouts; calendar validity is checked by chrono afterwards.
static DATE_SHAPE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4}-\d{2}-\d{2}|\d{1,2}/\d{1,2}/\d{4})$").expect("Invalid date regex")
});

const PHONE_MIN_DIGITS: usize = 7;
const PHONE_MAX_DIGITS: usize = 15;

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_REGEX.is_match(value)
}

/// Loose phone shape: digits with spaces, `+`, `-`, `.` and parentheses, an
/// optional extension, and 7 to 15 digits outside the extension.
pub fn is_valid_phone(value: &str) -> bool {
    let body = match PHONE_EXTENSION_REGEX.find(value) {
        Some(extension) => &value[..extension.start()],
        None => value,
    };
    if !PHONE_BODY_REGEX.is_match(body) {
        return false;
    }
    let digits = body.chars().filter(char::is_ascii_digit).count();
    (PHONE_MIN_DIGITS..=PHONE_MAX_DIGITS).contains(&digits)
}

/// `YYYY-MM-DD`, `MM/DD/YYYY` or `M/D/YYYY`, and a real calendar day.
pub fn is_valid_date(value: &str) -> bool {
    if !DATE_SHAPE_REGEX.is_match(value) {
        return false;
    }
    let format = if value.contains('-') {
        "%Y-%m-%d"
    } else {
        "%m/%d/%Y"
    };
    NaiveDate::parse_from_str(value, format).is_ok()
}

/// Parse a finite decimal number.
pub fn parse_number(value: &str) -> Option<f64> {
    value
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite())
}
