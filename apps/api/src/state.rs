use std::sync::Arc;

use crate::config::Config;
use crate::matching::{CatalogStore, Embedder};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Pluggable embedder. Default: HashingEmbedder. Swap via EMBEDDING_API_URL.
    pub embedder: Arc<dyn Embedder>,
    /// Job catalog, reloaded when the file on disk changes.
    pub catalog: Arc<CatalogStore>,
}

impl AppState {
    pub fn new(config: Config, embedder: Arc<dyn Embedder>) -> Self {
        let catalog = Arc::new(CatalogStore::new(config.job_catalog_path.clone()));
        Self {
            config,
            embedder,
            catalog,
        }
    }
}
