//! Contact Extractor: email, phone, profile links and name from resume text,
//! with gaps filled from the document's embedded hyperlinks.
//!
//! Text-derived values always win: hyperlinks only fill fields that are still
//! `None` after the text scan.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::document::Hyperlink;
use crate::parser::lines::split_lines;
use crate::parser::models::ContactInfo;
use crate::parser::patterns::EMAIL_RE;

static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\+?\d{1,3}[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}").unwrap()
});

static LINKEDIN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:https?://)?(?:www\.)?linkedin\.com/in/[\w\-]+/?").unwrap()
});

static GITHUB_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:https?://)?(?:www\.)?github\.com/[\w\-]+/?").unwrap());

/// Hosts that are never treated as a personal portfolio.
const NON_PORTFOLIO_DOMAINS: &[&str] = &[
    "linkedin",
    "github",
    "twitter",
    "facebook",
    "instagram",
    "indeed",
    "glassdoor",
    "monster",
    "careerbuilder",
];

/// Builds a `ContactInfo` from the text and, when given, the document's hyperlinks.
pub fn extract_contact_info(text: &str, links: &[Hyperlink]) -> ContactInfo {
    let mut contact = ContactInfo {
        email: first_match(&EMAIL_RE, text),
        phone: first_match(&PHONE_RE, text),
        linkedin: first_match(&LINKEDIN_RE, text),
        github: first_match(&GITHUB_RE, text),
        ..ContactInfo::default()
    };

    for link in links {
        apply_hyperlink(&mut contact, link);
    }

    contact.name = guess_name(text);
    contact
}

fn first_match(re: &Regex, text: &str) -> Option<String> {
    re.find(text).map(|m| m.as_str().to_string())
}

fn apply_hyperlink(contact: &mut ContactInfo, link: &Hyperlink) {
    let uri = link.uri.to_lowercase();
    let text = link.text.to_lowercase();
    let is_http = uri.contains("http");

    if contact.email.is_none() {
        if uri.contains("mailto:") {
            contact.email = non_empty(uri.replace("mailto:", ""));
        } else if let Some(m) = EMAIL_RE.find(&uri) {
            contact.email = Some(m.as_str().to_string());
        }
    }

    if contact.linkedin.is_none()
        && (uri.contains("linkedin.com") || (text.contains("linkedin") && is_http))
    {
        contact.linkedin = Some(link.uri.clone());
    }

    if contact.github.is_none()
        && (uri.contains("github.com") || (text.contains("github") && is_http))
    {
        contact.github = Some(link.uri.clone());
    }

    let looks_like_portfolio = text.contains("portfolio")
        || text.contains("website")
        || (text.trim().is_empty() && is_http);
    if contact.portfolio.is_none()
        && looks_like_portfolio
        && !NON_PORTFOLIO_DOMAINS.iter().any(|d| uri.contains(d))
    {
        contact.portfolio = Some(link.uri.clone());
    }

    if is_http
        && !uri.contains("mailto:")
        && !uri.contains("tel:")
        && !already_assigned(contact, &link.uri)
    {
        contact.other_links.push(link.uri.clone());
    }
}

fn already_assigned(contact: &ContactInfo, uri: &str) -> bool {
    [&contact.linkedin, &contact.github, &contact.portfolio]
        .into_iter()
        .flatten()
        .any(|assigned| assigned.eq_ignore_ascii_case(uri))
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// First line whose first two tokens are purely alphabetic once periods are
/// removed ("J. R. Smith" qualifies as "J. R.").
pub fn guess_name(text: &str) -> Option<String> {
    split_lines(text).into_iter().find_map(|line| {
        let mut tokens = line.split_whitespace();
        let first = tokens.next()?;
        let second = tokens.next()?;
        (is_name_token(first) && is_name_token(second)).then(|| format!("{first} {second}"))
    })
}

fn is_name_token(token: &str) -> bool {
    let stripped: String = token.chars().filter(|c| *c != '.').collect();
    !stripped.is_empty() && stripped.chars().all(char::is_alphabetic)
}
