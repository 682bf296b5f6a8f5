//! Text normalisation used when comparing headers with field names.

use std::collections::BTreeSet;

/// Lowercases and replaces separators with single spaces.
///
/// camelCase boundaries also become spaces, so `dateOfBirth` and
/// `Date of Birth` normalise identically.
pub fn normalize_text(raw: &str) -> String {
    let mut spaced = String::with_capacity(raw.len() + 4);
    let mut prev_lower = false;
    for ch in raw.trim().chars() {
        if prev_lower && ch.is_uppercase() {
            spaced.push(' ');
        }
        prev_lower = ch.is_lowercase() || ch.is_ascii_digit();
        spaced.push(ch);
    }
    spaced
        .to_lowercase()
        .replace(['_', '-', '.', '/', '\\', '(', ')', ':', '#'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalised text with all spaces removed.
pub fn compact_text(raw: &str) -> String {
    normalize_text(raw).replace(' ', "")
}

/// Set of normalised words in `raw`.
pub fn token_set(raw: &str) -> BTreeSet<String> {
    normalize_text(raw)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}
