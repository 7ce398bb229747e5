//! Handlers for the reconstruction job resource.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use scan2cad_core::jobs::{JobRecord, JobStatus};
use scan2cad_core::storage::validate_id;
use scan2cad_server::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::pipeline;
use crate::state::AppState;

pub const QUEUED_MESSAGE: &str = "Job queued for processing";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconstructionRequest {
    pub job_id: String,
    /// Reported by the caller; the pipeline reads the directory itself.
    pub image_count: u32,
}

/// Job status in the camelCase shape the viewer expects.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconstructionStatus {
    pub job_id: String,
    pub status: JobStatus,
    pub progress: f64,
    pub message: String,
    pub mesh_url: Option<String>,
    pub error: Option<String>,
}

impl ReconstructionStatus {
    fn from_record(job_id: String, job: JobRecord) -> Self {
        Self {
            job_id,
            status: job.status,
            progress: job.progress,
            message: job.message,
            mesh_url: job.mesh_url,
            error: job.error,
        }
    }
}

/// POST /reconstruct
///
/// Idempotent per job id: a known job's current status is returned and no
/// second pipeline is started.
pub async fn start_reconstruction(
    State(state): State<AppState>,
    payload: Result<Json<ReconstructionRequest>, JsonRejection>,
) -> AppResult<Json<ReconstructionStatus>> {
    let Json(input) = payload?;
    validate_id(&input.job_id)?;

    let record = JobRecord::pending(QUEUED_MESSAGE);
    if let Some(existing) = state
        .registry
        .insert_if_absent(&input.job_id, record.clone())
        .await
    {
        tracing::debug!(job_id = %input.job_id, status = %existing.status, "Job already known");
        return Ok(Json(ReconstructionStatus::from_record(input.job_id, existing)));
    }

    tracing::info!(
        job_id = %input.job_id,
        image_count = input.image_count,
        "Queued reconstruction"
    );
    state.tasks.spawn(pipeline::run(
        state.registry.clone(),
        state.layout.clone(),
        state.stage_runner(),
        input.job_id.clone(),
    ));

    Ok(Json(ReconstructionStatus::from_record(input.job_id, record)))
}

/// GET /status/{job_id}
pub async fn job_status(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> AppResult<Json<ReconstructionStatus>> {
    let job = state
        .registry
        .get(&job_id)
        .await
        .ok_or_else(|| AppError::not_found("Job", job_id.clone()))?;

    Ok(Json(ReconstructionStatus::from_record(job_id, job)))
}
