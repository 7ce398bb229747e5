pub mod health;
pub mod jobs;

use axum::Router;

use crate::state::AppState;

/// Build the complete route tree.
///
/// ```text
/// GET    /                       service banner
/// GET    /health                 liveness + job count
/// POST   /api/upload             upload images (multipart or data URLs)
/// POST   /api/process            start the reconstruction pipeline
/// GET    /api/status/{job_id}    poll job status
/// GET    /api/models/{job_id}    download the OBJ model
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest("/api", jobs::router())
}
