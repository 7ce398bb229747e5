use std::path::Path;

use axum::routing::{get, post};
use axum::Router;
use scan2cad_core::storage::DATA_URL_PREFIX;
use tower_http::services::ServeDir;

use crate::handlers::{cad, health};
use crate::state::AppState;

/// Build the complete route tree.
///
/// ```text
/// GET    /              service banner
/// GET    /health        liveness
/// POST   /generate      generate JSCAD source + STL for a mesh
/// POST   /estimate      estimate the dimensions of a mesh
/// GET    /data/...      generated files
/// ```
pub fn router(data_dir: &Path) -> Router<AppState> {
    Router::new()
        .route("/", get(health::index))
        .route("/health", get(health::health_check))
        .route("/generate", post(cad::generate_cad))
        .route("/estimate", post(cad::estimate))
        .nest_service(DATA_URL_PREFIX, ServeDir::new(data_dir))
}
