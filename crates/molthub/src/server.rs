//! HTTP server for the release hub.

use crate::routes;
use anyhow::Result;
use axum::Router;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Application state shared across handlers
pub struct AppState {
    /// Directory of released binaries, one file per version
    pub root: PathBuf,
}

/// Build the hub router over a release root.
pub fn router(root: PathBuf) -> Router {
    let state = Arc::new(AppState { root });
    routes::release_routes()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Serve the hub on an already-bound listener.
pub async fn serve(listener: TcpListener, root: PathBuf) -> Result<()> {
    info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(root)).await?;
    Ok(())
}
