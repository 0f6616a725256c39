use once_cell::sync::Lazy;
use regex::Regex;

use crate::parser::lines::split_lines;
use crate::parser::models::ExperienceEntry;
use crate::parser::patterns::FOUR_DIGITS_RE;
use crate::parser::sections::{fill_if_unset, EntryBuilder, LineRole, SectionRules, SectionState};

static HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(experience|employment|work|career|professional)\b").unwrap()
});

static EXIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(education|skill|project|certification)\b").unwrap());

/// Any of these on a line marks the start of a new position.
static TITLE_RES: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(
            r"(?i)(?:software engineer|developer|programmer|analyst|manager|director|coordinator)",
        )
        .unwrap(),
        Regex::new(r"(?i)(?:intern|junior|senior|lead|principal|chief|head)").unwrap(),
        Regex::new(r"(?i)(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)\w*\s+\d{4}").unwrap(),
    ]
});

static COMPANY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(inc|corp|ltd|llc|company|technologies|solutions)\b").unwrap()
});

/// Scans the experience section into entries.
///
/// Title patterns are unanchored substrings, so a date line like
/// `Jan 2020 - Present` also opens a new entry.
pub fn extract_experience(text: &str) -> Vec<ExperienceEntry> {
    let rules = SectionRules {
        header: &HEADER_RE,
        exit: &EXIT_RE,
    };
    let mut state = SectionState::default();
    let mut entries: EntryBuilder<ExperienceEntry> = EntryBuilder::new();

    for line in split_lines(text) {
        if state.advance(line, &rules) != LineRole::Data {
            continue;
        }

        if TITLE_RES.iter().any(|re| re.is_match(line)) {
            entries.start(ExperienceEntry {
                title: Some(line.to_string()),
                ..ExperienceEntry::default()
            });
        }

        let Some(entry) = entries.open_mut() else {
            continue;
        };

        if COMPANY_RE.is_match(line) {
            fill_if_unset(&mut entry.company, line);
        }

        // latest dated line wins
        if FOUR_DIGITS_RE.is_match(line) {
            entry.duration = Some(line.to_string());
        }
    }

    entries.finish()
}
