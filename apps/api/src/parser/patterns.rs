//! Regular expressions shared by more than one extractor.
//!
//! All patterns are compiled once on first use. Case-insensitive patterns
//! carry an inline `(?i)` flag so the call sites never have to remember it.

use once_cell::sync::Lazy;
use regex::Regex;

pub static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}\b").unwrap()
});

/// Month-year range such as `Aug 2018 - May 2022` or `Jan 2020 - 2021`.
pub static MONTH_RANGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)\w*\s+\d{4}\s*-\s*(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)?\w*\s*\d{4}\b",
    )
    .unwrap()
});

/// Bare year range such as `2018-2022` or `2018 - 2022`.
pub static YEAR_RANGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d{4}\s*-\s*\d{4}\b").unwrap());

/// A single plausible calendar year.
pub static SINGLE_YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(19|20)\d{2}\b").unwrap());

/// Any standalone run of four digits.
pub static FOUR_DIGITS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{4}\b").unwrap());

/// First date range on the line: month-year range, else year range.
pub fn find_date_range(line: &str) -> Option<&str> {
    MONTH_RANGE_RE
        .find(line)
        .or_else(|| YEAR_RANGE_RE.find(line))
        .map(|m| m.as_str())
}

/// First date of any kind on the line: a range, else a single year.
pub fn find_any_date(line: &str) -> Option<&str> {
    find_date_range(line).or_else(|| SINGLE_YEAR_RE.find(line).map(|m| m.as_str()))
}
