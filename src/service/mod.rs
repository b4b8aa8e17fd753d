//! Credit-scoring HTTP service
//!
//! Loads the model artifact once at startup and serves scores until
//! shutdown. A missing or corrupt artifact fails startup; per-request
//! validation failures never affect availability. The artifact is
//! immutable behind an `Arc`, so concurrent reads need no locking.

pub mod handlers;
pub mod schemas;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::routing::{get, post};
use axum::Router;
use tracing::info;

use crate::model::ModelArtifact;
use handlers::{health_handler, score_handler};

/// Shared application state: the immutably-loaded model.
pub struct AppState {
    pub artifact: ModelArtifact,
}

/// Load the model artifact into shared state. Fatal when missing.
pub fn build_state(model_dir: &Path) -> Result<Arc<AppState>> {
    let artifact = ModelArtifact::load(model_dir)?;
    Ok(Arc::new(AppState { artifact }))
}

/// Build the axum router with all routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/score", post(score_handler))
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve(model_dir: &Path, listen_addr: &str) -> Result<()> {
    let state = build_state(model_dir)?;
    info!(
        model_dir = %model_dir.display(),
        model_type = %state.artifact.info.model_type,
        n_features = state.artifact.info.n_features,
        "Model artifact loaded"
    );

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", listen_addr))?;
    info!(%listen_addr, "Scoring service listening");

    axum::serve(listener, app)
        .await
        .context("Scoring service terminated unexpectedly")?;

    Ok(())
}
