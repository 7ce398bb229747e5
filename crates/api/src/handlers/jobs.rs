//! Handlers for starting, polling and downloading reconstruction jobs.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use axum::Json;
use scan2cad_core::error::CoreError;
use scan2cad_core::images::list_images;
use scan2cad_core::jobs::{JobRecord, JobStatus};
use scan2cad_core::storage::validate_id;
use scan2cad_server::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::pipeline;
use crate::state::AppState;

/// Simulated seconds of processing per image, reported to clients.
pub const SECONDS_PER_IMAGE: usize = 2;

/// Content type of the served model.
pub const OBJ_CONTENT_TYPE: &str = "model/obj";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessRequest {
    pub job_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProcessResponse {
    pub status: &'static str,
    pub job_id: String,
    pub message: &'static str,
    /// Rough wall-clock estimate in seconds.
    pub estimated_time: usize,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub job_id: String,
    pub status: JobStatus,
    pub progress: f64,
    pub message: String,
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// Process
// ---------------------------------------------------------------------------

/// POST /api/process
///
/// Starts the pipeline for an uploaded job. A job whose pipeline is
/// already running is rejected with 409.
pub async fn process_job(
    State(state): State<AppState>,
    payload: Result<Json<ProcessRequest>, JsonRejection>,
) -> AppResult<Json<ProcessResponse>> {
    let Json(input) = payload?;
    let job_id = input
        .job_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing job ID".into()))?;
    validate_id(&job_id)?;

    let upload_dir = state.layout.upload_dir(&job_id);
    if !tokio::fs::try_exists(&upload_dir).await? {
        return Err(AppError::not_found("Job", job_id));
    }

    let images = list_images(&upload_dir).await?;
    if images.is_empty() {
        return Err(AppError::BadRequest("No images found for this job".into()));
    }

    let claim = JobRecord::new(
        pipeline::INITIALIZING.status,
        pipeline::INITIALIZING.progress,
        pipeline::INITIALIZING.message,
    );
    if state.registry.try_start(&job_id, claim).await.is_err() {
        return Err(CoreError::Conflict(format!("Job {job_id} is already processing")).into());
    }

    tracing::info!(job_id = %job_id, image_count = images.len(), "Starting reconstruction");
    state.tasks.spawn(pipeline::run(
        state.registry.clone(),
        state.layout.clone(),
        state.stage_runner(),
        job_id.clone(),
    ));

    Ok(Json(ProcessResponse {
        status: "success",
        job_id,
        message: "Processing started",
        estimated_time: images.len() * SECONDS_PER_IMAGE,
    }))
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// GET /api/status/{job_id}
pub async fn job_status(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> AppResult<Json<StatusResponse>> {
    let job = state
        .registry
        .get(&job_id)
        .await
        .ok_or_else(|| AppError::not_found("Job", job_id.clone()))?;

    Ok(Json(StatusResponse {
        job_id,
        status: job.status,
        progress: job.progress,
        message: job.message,
        error: job.error,
    }))
}

// ---------------------------------------------------------------------------
// Model download
// ---------------------------------------------------------------------------

/// GET /api/models/{job_id}
pub async fn download_model(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    if validate_id(&job_id).is_err() {
        return Err(AppError::not_found("Model for job", job_id));
    }

    match tokio::fs::read(state.layout.model_obj(&job_id)).await {
        Ok(bytes) => Ok(([(CONTENT_TYPE, OBJ_CONTENT_TYPE)], bytes)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(AppError::not_found("Model for job", job_id))
        }
        Err(e) => Err(e.into()),
    }
}
