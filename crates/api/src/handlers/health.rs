use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

/// Service banner.
#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub status: &'static str,
}

/// Health check response payload.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Jobs known to this process.
    pub jobs: usize,
}

/// GET /
pub async fn index() -> Json<IndexResponse> {
    Json(IndexResponse {
        name: "3D Reconstruction API",
        version: env!("CARGO_PKG_VERSION"),
        status: "running",
    })
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        jobs: state.registry.len().await,
    })
}
