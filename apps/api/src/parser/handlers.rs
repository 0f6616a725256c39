use axum::{extract::Multipart, Json};
use serde::Serialize;
use tracing::info;

use crate::document::upload::read_resume_upload;
use crate::document::Hyperlink;
use crate::errors::AppError;
use crate::parser::models::ResumeProfile;
use crate::parser::parse_upload;

#[derive(Debug, Serialize)]
pub struct ParseResponse {
    #[serde(flatten)]
    pub profile: ResumeProfile,
    pub hyperlinks: Vec<Hyperlink>,
}

/// POST /api/v1/resumes/parse
/// Returns the full parsed profile and the document's hyperlinks. No matching.
pub async fn handle_parse(multipart: Multipart) -> Result<Json<ParseResponse>, AppError> {
    let upload = read_resume_upload(multipart).await?;
    let file_name = upload.file_name.clone();
    let (document, profile) = parse_upload(upload).await?;

    info!(
        "Parsed '{}': {} skills, {} hyperlinks",
        file_name,
        profile.skills.len(),
        document.hyperlinks.len()
    );
    Ok(Json(ParseResponse {
        profile,
        hyperlinks: document.hyperlinks,
    }))
}
