use axum::extract::Multipart;
use bytes::Bytes;
use tracing::debug;

use crate::errors::AppError;

/// Multipart field that carries the resume.
pub const RESUME_FIELD: &str = "resume";

/// The resume file pulled out of a multipart request.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Bytes,
}

/// Reads the `resume` field from a multipart body. Other fields are drained
/// and ignored.
pub async fn read_resume_upload(mut multipart: Multipart) -> Result<Upload, AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(RESUME_FIELD) {
            debug!("Ignoring multipart field {:?}", field.name());
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().trim().to_string();
        if file_name.is_empty() {
            return Err(AppError::EmptyFilename);
        }

        let bytes = field.bytes().await?;
        debug!("Received upload '{}' ({} bytes)", file_name, bytes.len());
        return Ok(Upload { file_name, bytes });
    }

    Err(AppError::MissingDocument)
}
