//! The simulated reconstruction pipeline run by `POST /api/process`.
//!
//! Progress is reported on a 0..1 scale. The stages only sleep; the
//! produced model is always the demo cube.

use std::path::Path;
use std::sync::Arc;

use scan2cad_core::images::list_images;
use scan2cad_core::jobs::{JobRegistry, JobStatus};
use scan2cad_core::pipeline::{PipelineError, Stage, StageRunner};
use scan2cad_core::storage::DataLayout;
use scan2cad_mesh::export::demo_cube_obj;

pub const INITIALIZING: Stage = Stage::new(
    JobStatus::Initializing,
    0.05,
    "Initializing reconstruction pipeline",
    0,
);

/// Stages run after the images have been staged.
pub const STAGES: [Stage; 6] = [
    Stage::new(JobStatus::Preprocessing, 0.1, "Preparing images for processing", 1),
    Stage::new(JobStatus::Preprocessing, 0.2, "Extracting features from images", 2),
    Stage::new(JobStatus::Reconstructing, 0.4, "Matching features between images", 2),
    Stage::new(JobStatus::Reconstructing, 0.6, "Building sparse point cloud", 2),
    Stage::new(JobStatus::Finalizing, 0.8, "Building dense point cloud", 2),
    Stage::new(JobStatus::Finalizing, 0.9, "Creating 3D mesh", 0),
];

pub const COMPLETED_MESSAGE: &str = "Reconstruction completed successfully";

/// Run the pipeline for `job_id` to completion, recording the outcome.
pub async fn run(
    registry: Arc<JobRegistry>,
    layout: DataLayout,
    runner: StageRunner,
    job_id: String,
) {
    match reconstruct(&registry, &layout, &runner, &job_id).await {
        Ok(()) => {
            registry.complete(&job_id, 1.0, COMPLETED_MESSAGE, None).await;
            tracing::info!(job_id = %job_id, "Reconstruction completed");
        }
        Err(e) => {
            tracing::error!(job_id = %job_id, error = %e, "Reconstruction failed");
            registry
                .fail(&job_id, format!("Reconstruction failed: {e}"), e.to_string())
                .await;
        }
    }
}

async fn reconstruct(
    registry: &JobRegistry,
    layout: &DataLayout,
    runner: &StageRunner,
    job_id: &str,
) -> Result<(), PipelineError> {
    runner.run(registry, job_id, &INITIALIZING).await?;

    let staged = stage_images(&layout.upload_dir(job_id), &layout.model_images_dir(job_id)).await?;
    tracing::debug!(job_id, staged, "Copied images into model directory");

    for stage in &STAGES {
        runner.run(registry, job_id, stage).await?;
    }

    tokio::fs::write(layout.model_obj(job_id), demo_cube_obj()).await?;
    Ok(())
}

/// Copy every image in `from` into `to`, returning how many were copied.
async fn stage_images(from: &Path, to: &Path) -> Result<usize, PipelineError> {
    let images = list_images(from).await?;
    if images.is_empty() {
        return Err(PipelineError::MissingInput(format!(
            "No images found in {}",
            from.display()
        )));
    }

    tokio::fs::create_dir_all(to).await?;
    for image in &images {
        if let Some(name) = image.file_name() {
            tokio::fs::copy(image, to.join(name)).await?;
        }
    }
    Ok(images.len())
}
