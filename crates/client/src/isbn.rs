//! ISBN input normalization.

use std::sync::LazyLock;

use regex::Regex;

use crate::ApiError;

static ISBN_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(?:\d{9}[\dX]|\d{13})$").unwrap());

/// Strip hyphens and spaces and check the result is an ISBN-10 or ISBN-13.
///
/// Only the shape is checked, not the check digit; upstream APIs answer
/// "not found" for well-formed but unassigned numbers.
pub fn normalize_isbn(input: &str) -> Result<String, ApiError> {
    let compact: String = input
        .chars()
        .filter(|c| !matches!(c, '-' | ' '))
        .map(|c| c.to_ascii_uppercase())
        .collect();

    if ISBN_PATTERN.is_match(&compact) { Ok(compact) } else { Err(ApiError::InvalidIsbn(input.to_string())) }
}
