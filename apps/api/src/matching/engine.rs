//! Matching engine: ranks catalog jobs against a parsed resume.
//!
//! The resume summary and every job description are embedded, compared by
//! cosine similarity, and the best `top_n` jobs are returned with the skills
//! the candidate is missing for each.

use std::collections::{BTreeSet, HashSet};

use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::matching::catalog::JobPosting;
use crate::matching::embedder::{cosine_similarity, EmbedError, Embedder};
use crate::parser::models::ResumeProfile;

pub const DEFAULT_TOP_N: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub title: String,
    /// Similarity scaled to 0–100, rounded to two decimals.
    pub score: f64,
    pub required_skills: Vec<String>,
    /// Lowercased required skills absent from the resume, sorted.
    pub missing_skills: Vec<String>,
}

#[derive(Debug, Error)]
pub enum MatchError {
    #[error("{0}")]
    Precondition(String),

    #[error(transparent)]
    Embedding(#[from] EmbedError),
}

/// Scores every job in `catalog` against the profile and keeps the best
/// `top_n`, highest first. Jobs with equal scores keep their catalog order.
///
/// Fails before embedding anything when the profile has no summary or no
/// skills.
pub async fn match_jobs(
    embedder: &dyn Embedder,
    profile: &ResumeProfile,
    catalog: &[JobPosting],
    top_n: usize,
) -> Result<Vec<MatchResult>, MatchError> {
    let summary = profile
        .summary
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| MatchError::Precondition("resume has no summary".to_string()))?;

    if profile.skills.is_empty() {
        return Err(MatchError::Precondition(
            "no skills were found in the resume".to_string(),
        ));
    }

    let resume_vector = embedder.embed(summary).await?;
    let job_vectors =
        try_join_all(catalog.iter().map(|job| embedder.embed(&job.description))).await?;

    let resume_skills: HashSet<String> = profile.skills.iter().map(|s| s.to_lowercase()).collect();

    let mut results: Vec<MatchResult> = catalog
        .iter()
        .zip(&job_vectors)
        .map(|(job, job_vector)| MatchResult {
            title: job.title.clone(),
            score: to_score(cosine_similarity(&resume_vector, job_vector)),
            required_skills: job.required_skills.clone(),
            missing_skills: missing_skills(&job.required_skills, &resume_skills),
        })
        .collect();

    // sort_by is stable: equal scores keep catalog order
    results.sort_by(|a, b| b.score.total_cmp(&a.score));
    results.truncate(top_n);

    debug!(
        "Matched {} of {} jobs using the {} embedder",
        results.len(),
        catalog.len(),
        embedder.backend()
    );
    Ok(results)
}

fn to_score(similarity: f32) -> f64 {
    (f64::from(similarity) * 100.0 * 100.0).round() / 100.0
}

/// `lowercase(required) − resume_skills`. `resume_skills` must already be
/// lowercased.
pub fn missing_skills(required: &[String], resume_skills: &HashSet<String>) -> Vec<String> {
    required
        .iter()
        .map(|skill| skill.to_lowercase())
        .filter(|skill| !resume_skills.contains(skill))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
