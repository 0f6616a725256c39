use once_cell::sync::Lazy;
use regex::Regex;

use crate::parser::lines::raw_lines;

static HEADER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(summary|objective|profile|about)\b").unwrap());

static STOP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(education|experience|skill)\b").unwrap());

const MAX_SUMMARY_LINES: usize = 4;

/// Free text following the first summary-like header that has any body.
///
/// Collects at most four lines after the header, stopping at a blank line or
/// a line that names another section.
pub fn extract_summary(text: &str) -> Option<String> {
    let lines = raw_lines(text);

    lines.iter().enumerate().find_map(|(i, line)| {
        if !HEADER_RE.is_match(line) {
            return None;
        }
        let body: Vec<&str> = lines[i + 1..]
            .iter()
            .take(MAX_SUMMARY_LINES)
            .take_while(|next| !next.is_empty() && !STOP_RE.is_match(next))
            .copied()
            .collect();
        (!body.is_empty()).then(|| body.join(" "))
    })
}
