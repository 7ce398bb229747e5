//! The simulated photogrammetry pipeline.
//!
//! Progress is reported on a 0..100 scale. Every stage is published as
//! `processing`; the output is always a demo icosphere.

use std::sync::Arc;

use scan2cad_core::jobs::{JobRegistry, JobStatus};
use scan2cad_core::pipeline::{PipelineError, Stage, StageRunner};
use scan2cad_core::storage::DataLayout;
use scan2cad_mesh::export::to_glb;
use scan2cad_mesh::shapes::icosphere;

/// Subdivision level of the demo sphere.
pub const SPHERE_SUBDIVISIONS: u32 = 3;
/// Radius of the demo sphere in millimetres.
pub const SPHERE_RADIUS: f64 = 50.0;

pub const STAGES: [Stage; 7] = [
    Stage::new(JobStatus::Processing, 5.0, "Starting photogrammetry pipeline", 0),
    Stage::new(JobStatus::Processing, 10.0, "Extracting features from images", 2),
    Stage::new(JobStatus::Processing, 30.0, "Matching features between images", 2),
    Stage::new(JobStatus::Processing, 50.0, "Building sparse point cloud", 2),
    Stage::new(JobStatus::Processing, 70.0, "Building dense point cloud", 2),
    Stage::new(JobStatus::Processing, 85.0, "Creating 3D mesh from point cloud", 2),
    Stage::new(JobStatus::Processing, 95.0, "Optimizing and exporting mesh", 0),
];

pub const COMPLETED_MESSAGE: &str = "Reconstruction completed successfully";
pub const FAILED_MESSAGE: &str = "Reconstruction failed";

/// Run the pipeline for `job_id` to completion, recording the outcome.
pub async fn run(
    registry: Arc<JobRegistry>,
    layout: DataLayout,
    runner: StageRunner,
    job_id: String,
) {
    match reconstruct(&registry, &layout, &runner, &job_id).await {
        Ok(mesh_url) => {
            registry
                .complete(&job_id, 100.0, COMPLETED_MESSAGE, Some(mesh_url))
                .await;
            tracing::info!(job_id = %job_id, "Reconstruction completed");
        }
        Err(e) => {
            tracing::error!(job_id = %job_id, error = %e, "Reconstruction failed");
            registry.fail(&job_id, FAILED_MESSAGE, e.to_string()).await;
        }
    }
}

/// Returns the public URL of the written mesh.
async fn reconstruct(
    registry: &JobRegistry,
    layout: &DataLayout,
    runner: &StageRunner,
    job_id: &str,
) -> Result<String, PipelineError> {
    let job_dir = layout.job_dir(job_id);
    if !tokio::fs::try_exists(&job_dir).await? {
        return Err(PipelineError::MissingInput(format!(
            "Job directory {} does not exist",
            job_dir.display()
        )));
    }

    for stage in &STAGES {
        runner.run(registry, job_id, stage).await?;
    }

    let mesh = icosphere(SPHERE_SUBDIVISIONS, SPHERE_RADIUS);
    tokio::fs::write(layout.object_glb(job_id), to_glb(&mesh, "object")).await?;

    Ok(DataLayout::object_glb_url(job_id))
}

#[cfg(test)]
mod tests {
    use scan2cad_core::jobs::JobRecord;

    use super::*;

    #[test]
    fn every_stage_reports_processing() {
        assert!(STAGES.iter().all(|s| s.status == JobStatus::Processing));
        assert!(STAGES.windows(2).all(|w| w[0].progress < w[1].progress));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn completion_is_never_observed_without_mesh_url() {
        for round in 0..50 {
            let dir = tempfile::tempdir().unwrap();
            let layout = DataLayout::new(dir.path());
            let job_id = format!("job-{round}");
            std::fs::create_dir_all(layout.job_dir(&job_id)).unwrap();
            let registry = Arc::new(JobRegistry::new());
            registry.insert(&job_id, JobRecord::pending("queued")).await;

            let poller = {
                let registry = registry.clone();
                let job_id = job_id.clone();
                tokio::spawn(async move {
                    loop {
                        let job = registry.get(&job_id).await.unwrap();
                        if job.status == JobStatus::Completed {
                            return job.mesh_url;
                        }
                        tokio::task::yield_now().await;
                    }
                })
            };

            run(registry.clone(), layout, StageRunner::from_scale(0.0), job_id.clone()).await;

            assert_eq!(
                poller.await.unwrap(),
                Some(DataLayout::object_glb_url(&job_id))
            );
        }
    }

    #[tokio::test]
    async fn missing_job_directory_fails_at_zero_progress() {
        let dir = tempfile::tempdir().unwrap();
        let registry = Arc::new(JobRegistry::new());
        registry.insert("ghost", JobRecord::pending("queued")).await;

        run(
            registry.clone(),
            DataLayout::new(dir.path()),
            StageRunner::from_scale(0.0),
            "ghost".into(),
        )
        .await;

        let job = registry.get("ghost").await.unwrap();
        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(job.progress, 0.0);
        assert_eq!(job.message, FAILED_MESSAGE);
        assert!(job.error.unwrap().contains("does not exist"));
        assert!(job.mesh_url.is_none());
    }
}
