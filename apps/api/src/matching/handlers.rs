use axum::{
    extract::{Multipart, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::document::upload::read_resume_upload;
use crate::errors::AppError;
use crate::matching::catalog::JobPosting;
use crate::matching::engine::{match_jobs, MatchResult};
use crate::parser::models::ResumeProfile;
use crate::parser::parse_upload;
use crate::state::AppState;

/// Flat, column-wise view of a profile and its matches.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub name: Option<String>,
    pub skills: Vec<String>,
    pub summary: Option<String>,
    pub matched_job_titles: Vec<String>,
    pub sim_scores: Vec<f64>,
    pub req_skills: Vec<Vec<String>>,
    pub missing_skills: Vec<Vec<String>>,
}

impl UploadResponse {
    pub fn new(profile: ResumeProfile, matches: Vec<MatchResult>) -> Self {
        let mut response = Self {
            name: profile.contact_info.name,
            skills: profile.skills,
            summary: profile.summary,
            matched_job_titles: Vec::with_capacity(matches.len()),
            sim_scores: Vec::with_capacity(matches.len()),
            req_skills: Vec::with_capacity(matches.len()),
            missing_skills: Vec::with_capacity(matches.len()),
        };
        for m in matches {
            response.matched_job_titles.push(m.title);
            response.sim_scores.push(m.score);
            response.req_skills.push(m.required_skills);
            response.missing_skills.push(m.missing_skills);
        }
        response
    }
}

#[derive(Debug, Serialize)]
pub struct JobListResponse {
    pub jobs: Vec<JobPosting>,
    pub loaded_at: DateTime<Utc>,
}

/// POST /upload, POST /api/v1/resumes/match
/// Parses the uploaded resume and returns its best catalog matches.
pub async fn handle_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let span = info_span!("resume_match", request_id = %Uuid::new_v4());

    async move {
        let upload = read_resume_upload(multipart).await?;
        let file_name = upload.file_name.clone();
        let (_, profile) = parse_upload(upload).await?;

        let catalog = state.catalog.current().await?;
        let matches = match_jobs(
            state.embedder.as_ref(),
            &profile,
            &catalog.jobs,
            state.config.match_top_n,
        )
        .await?;

        info!(
            "Matched '{}' against {} jobs, returning {}",
            file_name,
            catalog.jobs.len(),
            matches.len()
        );
        Ok::<_, AppError>(Json(UploadResponse::new(profile, matches)))
    }
    .instrument(span)
    .await
}

/// GET /api/v1/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
) -> Result<Json<JobListResponse>, AppError> {
    let catalog = state.catalog.current().await?;
    Ok(Json(JobListResponse {
        jobs: catalog.jobs.as_ref().clone(),
        loaded_at: catalog.loaded_at,
    }))
}
