//! API routes for the release hub.
//!
//! The release root is a flat directory: every file is named after the
//! version it contains. Listing and "latest" decisions share the daemon's
//! version ordering so the two sides never disagree about what is newest.

use crate::server::AppState;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use molt_common::protocol::{ErrorResponse, LatestResponse, PingResponse, VersionsResponse};
use molt_common::version;
use std::fs;
use std::sync::Arc;
use tracing::error;

type AppStateArc = Arc<AppState>;
type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn release_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/ping", get(ping))
        .route("/versions", get(versions))
        .route("/latest", get(latest))
        .route("/download/:version", get(download))
}

async fn ping() -> Json<PingResponse> {
    Json(PingResponse {
        response: "pong".to_string(),
    })
}

async fn versions(State(state): State<AppStateArc>) -> Result<Json<VersionsResponse>, ApiError> {
    let versions = list_versions(&state)?;
    Ok(Json(VersionsResponse { versions }))
}

async fn latest(State(state): State<AppStateArc>) -> Result<Json<LatestResponse>, ApiError> {
    let versions = list_versions(&state)?;
    match versions.last() {
        Some(latest) => Ok(Json(LatestResponse {
            latest: latest.clone(),
        })),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "no versions published".to_string(),
            }),
        )),
    }
}

async fn download(
    State(state): State<AppStateArc>,
    Path(version): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    if version.contains('/') || version.contains('\\') || version == ".." {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "invalid version name".to_string(),
            }),
        ));
    }

    let path = state.root.join(&version);
    let bytes = fs::read(&path).map_err(|e| {
        (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
    })?;

    Ok((
        [
            (
                header::CONTENT_TYPE,
                "application/octet-stream".to_string(),
            ),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={}", version),
            ),
        ],
        bytes,
    ))
}

/// Published versions, ordered oldest to newest.
fn list_versions(state: &AppState) -> Result<Vec<String>, ApiError> {
    let entries = fs::read_dir(&state.root).map_err(|e| {
        error!("Failed to read release root: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
    })?;

    let mut versions: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    versions.sort_by(|a, b| version::compare(a, b));
    Ok(versions)
}
