mod config;
mod document;
mod errors;
mod matching;
mod parser;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::matching::{Embedder, HashingEmbedder, HttpEmbedder};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed numeric env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume match API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize embedder (HashingEmbedder by default; swap via EMBEDDING_API_URL)
    let embedder = build_embedder(&config)?;
    info!("Embedder initialized (backend: {})", embedder.backend());

    // Build app state
    let state = AppState::new(config.clone(), embedder);

    // Warm the catalog cache; a missing file is reported per request instead
    match state.catalog.current().await {
        Ok(catalog) => info!("Job catalog ready ({} jobs)", catalog.jobs.len()),
        Err(e) => warn!(
            "Job catalog {} not loaded yet: {e}",
            state.catalog.path().display()
        ),
    }

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_embedder(config: &Config) -> Result<Arc<dyn Embedder>> {
    match &config.embedding_api_url {
        Some(url) => {
            let embedder = HttpEmbedder::new(
                url.clone(),
                config.embedding_api_key.clone(),
                config.embedding_model.clone(),
            )?;
            info!("Using embeddings endpoint {url} (model: {})", embedder.model());
            Ok(Arc::new(embedder))
        }
        None => {
            info!(
                "EMBEDDING_API_URL not set; using local hashing embedder ({} dims)",
                config.embedding_dim
            );
            Ok(Arc::new(HashingEmbedder::new(config.embedding_dim)))
        }
    }
}
