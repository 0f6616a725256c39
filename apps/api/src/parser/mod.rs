//! Resume parsing: heuristic extraction of a `ResumeProfile` from document text.
//!
//! Each extractor is a pure function of the text (and hyperlinks), so the
//! profile for a given document is always the same.

pub mod contact;
pub mod education;
pub mod experience;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod handlers;
pub mod lines;
pub mod models;
pub mod patterns;
pub mod sections;
pub mod skills;
pub mod summary;

use anyhow::Context;
use tracing::debug;

use crate::document::upload::Upload;
use crate::document::{extractor_for, ExtractedDocument, ScratchFile};
use crate::errors::AppError;
use crate::parser::contact::extract_contact_info;
use crate::parser::education::extract_education;
use crate::parser::experience::extract_experience;
use crate::parser::models::ResumeProfile;
use crate::parser::skills::extract_skills;
use crate::parser::summary::extract_summary;

/// Assembles the full profile from one extracted document.
pub fn parse_resume(document: &ExtractedDocument) -> ResumeProfile {
    let text = document.text.as_str();

    let profile = ResumeProfile {
        contact_info: extract_contact_info(text, &document.hyperlinks),
        skills: extract_skills(text),
        education: extract_education(text),
        experience: extract_experience(text),
        summary: extract_summary(text),
    };

    debug!(
        "Parsed resume: {} skills, {} education, {} experience, summary={}",
        profile.skills.len(),
        profile.education.len(),
        profile.experience.len(),
        profile.summary.is_some()
    );
    profile
}

/// Decodes and parses an upload on the blocking pool.
///
/// The upload is parked in a `ScratchFile` for the decoder and removed before
/// this returns, on success and on failure.
pub async fn parse_upload(upload: Upload) -> Result<(ExtractedDocument, ResumeProfile), AppError> {
    tokio::task::spawn_blocking(move || -> Result<_, AppError> {
        let scratch = ScratchFile::write(&upload.file_name, &upload.bytes)
            .context("Failed to stage upload on disk")?;
        let document = extractor_for(&upload.file_name).extract(scratch.path())?;
        let profile = parse_resume(&document);
        Ok((document, profile))
    })
    .await
    .context("Resume parsing task failed")?
}
