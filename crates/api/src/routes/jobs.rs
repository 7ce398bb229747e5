//! Route definitions for the reconstruction job resource.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{jobs, upload};
use crate::state::AppState;

/// Upper bound on a single upload request body.
pub const MAX_UPLOAD_BYTES: usize = 256 * 1024 * 1024;

/// Routes mounted at `/api`.
///
/// ```text
/// POST   /upload              -> upload_images
/// POST   /process             -> process_job
/// GET    /status/{job_id}     -> job_status
/// GET    /models/{job_id}     -> download_model
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/upload",
            post(upload::upload_images).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/process", post(jobs::process_job))
        .route("/status/{job_id}", get(jobs::job_status))
        .route("/models/{job_id}", get(jobs::download_model))
}
