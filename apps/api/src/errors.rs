use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::document::DocumentError;
use crate::matching::catalog::CatalogError;
use crate::matching::embedder::EmbedError;
use crate::matching::engine::MatchError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
/// Every variant renders as a single `{"error": "..."}` body.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("No file uploaded")]
    MissingDocument,

    #[error("No file selected")]
    EmptyFilename,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Could not read document: {0}")]
    DocumentRead(#[from] DocumentError),

    #[error("Cannot match jobs: {0}")]
    MatchingPrecondition(String),

    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbedError),

    #[error("Job catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<MultipartError> for AppError {
    fn from(e: MultipartError) -> Self {
        AppError::Validation(format!("Malformed upload: {}", e.body_text()))
    }
}

impl From<MatchError> for AppError {
    fn from(e: MatchError) -> Self {
        match e {
            MatchError::Precondition(reason) => AppError::MatchingPrecondition(reason),
            MatchError::Embedding(e) => AppError::Embedding(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::MissingDocument | AppError::EmptyFilename => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::DocumentRead(e) => {
                tracing::warn!("Document read error: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            AppError::MatchingPrecondition(reason) => {
                tracing::warn!("Matching precondition failed: {reason}");
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            AppError::Embedding(e) => {
                tracing::error!("Embedding error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An error occurred while scoring job matches".to_string(),
                )
            }
            AppError::Catalog(e) => {
                tracing::error!("Job catalog error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "The job catalog is unavailable".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn render(error: AppError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_missing_document_is_bad_request() {
        let (status, body) = render(AppError::MissingDocument).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "No file uploaded" }));
    }

    #[tokio::test]
    async fn test_precondition_reason_is_surfaced() {
        let (status, body) =
            render(AppError::MatchingPrecondition("resume has no summary".to_string())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Cannot match jobs: resume has no summary");
    }

    #[tokio::test]
    async fn test_internal_details_are_not_leaked() {
        let (status, body) =
            render(AppError::Internal(anyhow::anyhow!("secret path /etc/x"))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "An internal server error occurred");
    }
}
