use std::path::Path;

use axum::routing::{get, post};
use axum::Router;
use scan2cad_core::storage::DATA_URL_PREFIX;
use tower_http::services::ServeDir;

use crate::handlers::{health, reconstruct};
use crate::state::AppState;

/// Build the complete route tree.
///
/// ```text
/// GET    /                    service banner
/// GET    /health              liveness
/// POST   /reconstruct         start (or look up) a reconstruction
/// GET    /status/{job_id}     poll job status
/// GET    /data/...            generated meshes
/// ```
pub fn router(data_dir: &Path) -> Router<AppState> {
    Router::new()
        .route("/", get(health::index))
        .route("/health", get(health::health_check))
        .route("/reconstruct", post(reconstruct::start_reconstruction))
        .route("/status/{job_id}", get(reconstruct::job_status))
        .nest_service(DATA_URL_PREFIX, ServeDir::new(data_dir))
}
