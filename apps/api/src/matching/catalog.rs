//! Job catalog: the list of postings resumes are matched against.
//!
//! The catalog is a JSON array on disk. `CatalogStore` keeps the parsed copy in
//! memory keyed by a SHA-256 digest of the file, and parses again only when
//! the digest changes, so edits are picked up without a restart.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub required_skills: Vec<String>,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read job catalog {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("job catalog {path} is not a valid JSON array of jobs: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// A parsed catalog and the moment it was read.
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    pub jobs: Arc<Vec<JobPosting>>,
    pub loaded_at: DateTime<Utc>,
}

struct Cached {
    digest: Vec<u8>,
    snapshot: CatalogSnapshot,
}

pub struct CatalogStore {
    path: PathBuf,
    cached: RwLock<Option<Cached>>,
}

impl CatalogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cached: RwLock::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the current catalog, parsing the file again only if its
    /// contents changed since the last read.
    pub async fn current(&self) -> Result<CatalogSnapshot, CatalogError> {
        let raw = read_catalog(&self.path).await?;
        let digest = Sha256::digest(&raw).to_vec();

        if let Some(snapshot) = self.cached_if_unchanged(&digest).await {
            return Ok(snapshot);
        }

        let mut guard = self.cached.write().await;
        // another request may have reloaded while we waited for the lock
        if let Some(cached) = guard.as_ref().filter(|c| c.digest == digest) {
            return Ok(cached.snapshot.clone());
        }

        let jobs = parse_catalog(&self.path, &raw)?;
        info!("Loaded {} jobs from catalog {}", jobs.len(), self.path.display());

        let snapshot = CatalogSnapshot {
            jobs: Arc::new(jobs),
            loaded_at: Utc::now(),
        };
        *guard = Some(Cached {
            digest,
            snapshot: snapshot.clone(),
        });
        Ok(snapshot)
    }

    async fn cached_if_unchanged(&self, digest: &[u8]) -> Option<CatalogSnapshot> {
        let guard = self.cached.read().await;
        guard
            .as_ref()
            .filter(|c| c.digest == digest)
            .map(|c| c.snapshot.clone())
    }
}

/// Reads and parses a catalog file without caching.
pub async fn load_catalog(path: &Path) -> Result<Vec<JobPosting>, CatalogError> {
    let raw = read_catalog(path).await?;
    parse_catalog(path, &raw)
}

async fn read_catalog(path: &Path) -> Result<Vec<u8>, CatalogError> {
    tokio::fs::read(path).await.map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_catalog(path: &Path, raw: &[u8]) -> Result<Vec<JobPosting>, CatalogError> {
    serde_json::from_slice(raw).map_err(|source| CatalogError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
