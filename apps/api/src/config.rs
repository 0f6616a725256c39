use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::matching::engine::DEFAULT_TOP_N;

/// Application configuration loaded from environment variables.
/// Only numeric values are validated; everything else has a default.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub job_catalog_path: PathBuf,
    pub match_top_n: usize,
    pub max_upload_bytes: usize,
    /// OpenAI-compatible embeddings endpoint. `None` selects the local hashing embedder.
    pub embedding_api_url: Option<String>,
    pub embedding_api_key: Option<String>,
    pub embedding_model: String,
    pub embedding_dim: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            job_catalog_path: std::env::var("JOB_CATALOG_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("jobs_db.json")),
            match_top_n: parse_env("MATCH_TOP_N", DEFAULT_TOP_N)?,
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            embedding_api_url: optional_env("EMBEDDING_API_URL"),
            embedding_api_key: optional_env("EMBEDDING_API_KEY"),
            embedding_model: std::env::var("EMBEDDING_MODEL")
                .unwrap_or_else(|_| "all-MiniLM-L6-v2".to_string()),
            embedding_dim: parse_env("EMBEDDING_DIM", 384)?,
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
impl Config {
    /// Configuration for router tests: hashing embedder, catalog at `path`.
    pub fn for_tests(job_catalog_path: PathBuf) -> Self {
        Config {
            port: 0,
            rust_log: "debug".to_string(),
            job_catalog_path,
            match_top_n: 3,
            max_upload_bytes: 1024 * 1024,
            embedding_api_url: None,
            embedding_api_key: None,
            embedding_model: "test".to_string(),
            embedding_dim: 64,
        }
    }
}
