use once_cell::sync::Lazy;
use regex::Regex;

use crate::parser::lines::split_lines;
use crate::parser::models::EducationEntry;
use crate::parser::patterns::{find_any_date, find_date_range};
use crate::parser::sections::{fill_if_unset, EntryBuilder, LineRole, SectionRules, SectionState};

static HEADER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(education|academic|qualification|degree)\b").unwrap());

static EXIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(experience|work|employment|project|skill)\b").unwrap());

static INSTITUTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(university|college|institute|school|iit|nit|bits)\b").unwrap()
});

static DEGREE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(b\.?tech|m\.?tech|bachelor|master|b\.?sc|m\.?sc|b\.?a|m\.?a|phd|diploma|certificate)\b",
    )
    .unwrap()
});

static GPA_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(gpa|cgpa)\s*:?\s*(\d+\.?\d*)\s*/?\s*(\d+\.?\d*)\b").unwrap()
});

/// Scans the education section into entries.
///
/// An institution line opens a new entry; degree, year and GPA lines fill
/// the open entry. The section ends at the first line naming another section.
pub fn extract_education(text: &str) -> Vec<EducationEntry> {
    let lines = split_lines(text);
    let rules = SectionRules {
        header: &HEADER_RE,
        exit: &EXIT_RE,
    };
    let mut state = SectionState::default();
    let mut entries: EntryBuilder<EducationEntry> = EntryBuilder::new();

    for (i, &line) in lines.iter().enumerate() {
        if state.advance(line, &rules) != LineRole::Data {
            continue;
        }

        if INSTITUTION_RE.is_match(line) {
            let entry = entries.start(EducationEntry {
                institution: Some(line.to_string()),
                year: find_date_range(line).map(str::to_string),
                ..EducationEntry::default()
            });
            if let Some(&next) = lines.get(i + 1) {
                if DEGREE_RE.is_match(next) {
                    entry.degree = Some(next.to_string());
                }
            }
        } else if DEGREE_RE.is_match(line) {
            fill_if_unset(&mut entries.open_or_default().degree, line);
        }

        if let (Some(date), Some(entry)) = (find_any_date(line), entries.open_mut()) {
            fill_if_unset(&mut entry.year, date);
        }

        if let (Some(gpa), Some(entry)) = (GPA_RE.find(line), entries.open_mut()) {
            entry.gpa = Some(gpa.as_str().to_string());
        }
    }

    entries.finish()
}
