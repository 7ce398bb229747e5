//! Timed placeholder stages for the simulated reconstruction pipelines.
//!
//! A pipeline is a fixed list of [`Stage`]s. [`StageRunner`] publishes each
//! stage to the [`JobRegistry`] and then waits out the stage's simulated
//! duration, scaled by `STAGE_DELAY_SCALE` so tests can run instantly.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::jobs::{JobRegistry, JobStatus};

/// One step of a simulated pipeline.
#[derive(Debug, Clone, Copy)]
pub struct Stage {
    pub status: JobStatus,
    pub progress: f64,
    pub message: &'static str,
    /// Simulated processing time spent after the stage is published.
    pub duration: Duration,
}

impl Stage {
    pub const fn new(
        status: JobStatus,
        progress: f64,
        message: &'static str,
        duration_secs: u64,
    ) -> Self {
        Self {
            status,
            progress,
            message,
            duration: Duration::from_secs(duration_secs),
        }
    }
}

/// Errors that abort a pipeline run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The service is shutting down.
    #[error("pipeline cancelled")]
    Cancelled,

    /// A required input (directory, image set) is absent.
    #[error("{0}")]
    MissingInput(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Producing an output artifact (mesh, source file) failed.
    #[error("{0}")]
    Artifact(String),
}

/// Drives [`Stage`]s for one job.
#[derive(Debug, Clone)]
pub struct StageRunner {
    scale: f64,
    cancel: CancellationToken,
}

impl StageRunner {
    pub fn new(scale: f64, cancel: CancellationToken) -> Self {
        let scale = if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            0.0
        };
        Self { scale, cancel }
    }

    /// A runner with its own (never cancelled) token.
    pub fn from_scale(scale: f64) -> Self {
        Self::new(scale, CancellationToken::new())
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Publish `stage` for `job_id`, then wait out its scaled duration.
    pub async fn run(
        &self,
        registry: &JobRegistry,
        job_id: &str,
        stage: &Stage,
    ) -> Result<(), PipelineError> {
        if self.cancel.is_cancelled() {
            return Err(PipelineError::Cancelled);
        }

        registry
            .update(job_id, stage.status, stage.progress, stage.message, None)
            .await;
        tracing::info!(
            job_id,
            status = %stage.status,
            progress = stage.progress,
            "{}",
            stage.message,
        );

        self.pause(stage.duration).await
    }

    /// Sleep for `duration * scale`, aborting early on cancellation.
    pub async fn pause(&self, duration: Duration) -> Result<(), PipelineError> {
        if self.scale == 0.0 || duration.is_zero() {
            return Ok(());
        }
        tokio::select! {
            _ = self.cancel.cancelled() => Err(PipelineError::Cancelled),
            _ = tokio::time::sleep(duration.mul_f64(self.scale)) => Ok(()),
        }
    }
}
