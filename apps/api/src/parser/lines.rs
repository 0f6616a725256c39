/// Splits text into trimmed, non-empty lines, preserving order.
/// This is the view every section scanner works from.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Every line trimmed, blank lines kept. The summary scan needs the blanks
/// because a blank line ends a summary block.
pub fn raw_lines(text: &str) -> Vec<&str> {
    text.lines().map(str::trim).collect()
}
