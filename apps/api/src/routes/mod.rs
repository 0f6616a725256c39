pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::matching::handlers as matching;
use crate::parser::handlers as parser;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        // Resume upload + matching
        .route("/upload", post(matching::handle_upload))
        .route("/api/v1/resumes/match", post(matching::handle_upload))
        .route("/api/v1/resumes/parse", post(parser::handle_parse))
        // Job catalog
        .route("/api/v1/jobs", get(matching::handle_list_jobs))
        .layer(body_limit)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::matching::HashingEmbedder;
    use crate::parser::fixtures::SAMPLE_RESUME;

    const BOUNDARY: &str = "resume-match-test-boundary";

    const CATALOG: &str = r#"[
        {"title": "Data Engineer",
         "description": "Backend engineer to build Python services and data pipelines with Docker on AWS",
         "required_skills": ["Python", "SQL", "Spark"]},
        {"title": "Pastry Chef",
         "description": "Bake bread, croissants and cakes for a busy neighbourhood bakery",
         "required_skills": ["Baking"]},
        {"title": "Florist",
         "description": "Arrange seasonal bouquets for weddings",
         "required_skills": []},
        {"title": "Lifeguard",
         "description": "Supervise swimmers at the public pool",
         "required_skills": ["First Aid"]}
    ]"#;

    fn catalog_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CATALOG.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    fn app(catalog_path: std::path::PathBuf) -> Router {
        let config = Config::for_tests(catalog_path);
        let embedder = Arc::new(HashingEmbedder::new(config.embedding_dim));
        build_router(AppState::new(config, embedder))
    }

    /// One multipart part: `(field name, file name, contents)`.
    fn multipart_body(parts: &[(&str, &str, &str)]) -> Body {
        let mut body = String::new();
        for (name, file_name, contents) in parts {
            body.push_str(&format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; \
                 filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n\
                 {contents}\r\n"
            ));
        }
        body.push_str(&format!("--{BOUNDARY}--\r\n"));
        Body::from(body)
    }

    fn upload_request(uri: &str, body: Body) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", format!("multipart/form-data; boundary={BOUNDARY}"))
            .body(body)
            .unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let catalog = catalog_file();
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, body) = send(app(catalog.path().to_path_buf()), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "resume-match-api");
    }

    #[tokio::test]
    async fn test_upload_returns_profile_and_top_matches() {
        let catalog = catalog_file();
        let request = upload_request(
            "/upload",
            multipart_body(&[("resume", "resume.txt", SAMPLE_RESUME)]),
        );
        let (status, body) = send(app(catalog.path().to_path_buf()), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Jane Doe");
        assert!(body["skills"].as_array().unwrap().iter().any(|s| s == "python"));

        let titles = body["matched_job_titles"].as_array().unwrap();
        assert_eq!(titles.len(), 3);
        assert_eq!(titles[0], "Data Engineer");

        let scores: Vec<f64> = body["sim_scores"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s.as_f64().unwrap())
            .collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));

        assert_eq!(body["req_skills"][0], serde_json::json!(["Python", "SQL", "Spark"]));
        assert_eq!(body["missing_skills"][0], serde_json::json!(["spark"]));
    }

    #[tokio::test]
    async fn test_match_alias_route_behaves_like_upload() {
        let catalog = catalog_file();
        let request = upload_request(
            "/api/v1/resumes/match",
            multipart_body(&[("resume", "resume.txt", SAMPLE_RESUME)]),
        );
        let (status, body) = send(app(catalog.path().to_path_buf()), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["matched_job_titles"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_upload_without_resume_field_is_bad_request() {
        let catalog = catalog_file();
        let request = upload_request(
            "/upload",
            multipart_body(&[("attachment", "resume.txt", SAMPLE_RESUME)]),
        );
        let (status, body) = send(app(catalog.path().to_path_buf()), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, serde_json::json!({ "error": "No file uploaded" }));
    }

    #[tokio::test]
    async fn test_upload_with_empty_filename_is_bad_request() {
        let catalog = catalog_file();
        let request = upload_request("/upload", multipart_body(&[("resume", "", SAMPLE_RESUME)]));
        let (status, body) = send(app(catalog.path().to_path_buf()), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, serde_json::json!({ "error": "No file selected" }));
    }

    #[tokio::test]
    async fn test_resume_without_summary_fails_precondition() {
        let catalog = catalog_file();
        let request = upload_request(
            "/upload",
            multipart_body(&[("resume", "resume.txt", "John Smith\nSkills\nPython, SQL\n")]),
        );
        let (status, body) = send(app(catalog.path().to_path_buf()), request).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Cannot match jobs: resume has no summary");
    }

    #[tokio::test]
    async fn test_missing_catalog_is_generic_server_error() {
        let request = upload_request(
            "/upload",
            multipart_body(&[("resume", "resume.txt", SAMPLE_RESUME)]),
        );
        let (status, body) = send(app("/no/such/jobs_db.json".into()), request).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "The job catalog is unavailable");
    }

    #[tokio::test]
    async fn test_parse_returns_full_profile() {
        let catalog = catalog_file();
        let request = upload_request(
            "/api/v1/resumes/parse",
            multipart_body(&[("resume", "resume.txt", SAMPLE_RESUME)]),
        );
        let (status, body) = send(app(catalog.path().to_path_buf()), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["contact_info"]["name"], "Jane Doe");
        assert_eq!(body["contact_info"]["email"], "jane.doe@example.com");
        assert_eq!(body["education"][0]["year"], "2014-2018");
        assert_eq!(body["experience"][0]["title"], "Senior Software Engineer");
        assert!(body["hyperlinks"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_jobs() {
        let catalog = catalog_file();
        let request = Request::builder().uri("/api/v1/jobs").body(Body::empty()).unwrap();
        let (status, body) = send(app(catalog.path().to_path_buf()), request).await;

        assert_eq!(status, StatusCode::OK);
        let jobs = body["jobs"].as_array().unwrap();
        assert_eq!(jobs.len(), 4);
        assert_eq!(jobs[2]["title"], "Florist");
        assert!(body["loaded_at"].is_string());
    }
}
