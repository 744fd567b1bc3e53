//! Placeholder extraction for cross-language consistency checks.
//!
//! A placeholder is an interpolation token like `{name}` or `{{count}}`
//! that must appear as the same multiset across translations of a key.

use std::borrow::Cow;

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::Error;

/// One-or-more opening braces, a word, one-or-more closing braces.
/// Matches `{name}` and `{{count}}`; does not match an unterminated `{name`.
pub const DEFAULT_PATTERN: &str = r"\{+\w+\}+";

lazy_static! {
    static ref DEFAULT_REGEX: Regex = Regex::new(DEFAULT_PATTERN).unwrap();
}

/// Returns the matcher for a placeholder pattern.
///
/// A `None` or empty pattern yields the cached default matcher as
/// `Cow::Borrowed`, so callers can detect "using default" without a string
/// comparison. A non-empty pattern compiles a fresh matcher.
pub fn get_regex(pattern: Option<&str>) -> Result<Cow<'static, Regex>, Error> {
    match pattern {
        None => Ok(Cow::Borrowed(&*DEFAULT_REGEX)),
        Some(p) if p.is_empty() => Ok(Cow::Borrowed(&*DEFAULT_REGEX)),
        Some(p) => Ok(Cow::Owned(Regex::new(p)?)),
    }
}

/// Extracts every placeholder from a value, sorted by ordinal comparison.
///
/// A `None` or empty value yields an empty sequence. Duplicates are
/// preserved, not deduplicated, so count mismatches are visible to the
/// consistency check.
pub fn extract_placeholders(value: Option<&str>, regex: &Regex) -> Vec<String> {
    let Some(value) = value else {
        return Vec::new();
    };
    if value.is_empty() {
        return Vec::new();
    }

    let mut found: Vec<String> = regex
        .find_iter(value)
        .map(|m| m.as_str().to_string())
        .collect();
    found.sort();
    found
}
