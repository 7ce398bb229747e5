//! In-memory job bookkeeping shared by all three services.
//!
//! Every service keeps a process-local [`JobRegistry`] mapping a job id to
//! its latest [`JobRecord`]. Background pipelines write stage updates into
//! the registry; HTTP handlers read snapshots of the last write.

use std::collections::HashMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Lifecycle state of a job.
///
/// The orchestration API walks through the fine-grained reconstruction
/// phases; the reconstruction service only uses `pending`, `processing`
/// and the two terminal states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Initializing,
    Preprocessing,
    Reconstructing,
    Finalizing,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    /// Wire name of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Initializing => "initializing",
            Self::Preprocessing => "preprocessing",
            Self::Reconstructing => "reconstructing",
            Self::Finalizing => "finalizing",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// `true` for `completed` and `failed`.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// `true` once a pipeline has picked the job up and until it finishes.
    pub fn is_running(self) -> bool {
        self != Self::Pending && !self.is_terminal()
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// Snapshot of a job's state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobRecord {
    pub status: JobStatus,
    /// Progress on the owning service's scale (0..1 or 0..100).
    pub progress: f64,
    pub message: String,
    pub error: Option<String>,
    /// Public URL of the produced mesh, once available.
    pub mesh_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl JobRecord {
    /// A fresh record with no error and no mesh.
    pub fn new(status: JobStatus, progress: f64, message: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            status,
            progress,
            message: message.into(),
            error: None,
            mesh_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// A `pending` record at zero progress.
    pub fn pending(message: impl Into<String>) -> Self {
        Self::new(JobStatus::Pending, 0.0, message)
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Process-local job table.
///
/// Share it as `Arc<JobRegistry>`; all methods take `&self`.
#[derive(Debug, Default)]
pub struct JobRegistry {
    jobs: RwLock<HashMap<String, JobRecord>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or overwrite the record for `id`.
    pub async fn insert(&self, id: &str, record: JobRecord) {
        self.jobs.write().await.insert(id.to_string(), record);
    }

    /// Snapshot of the latest record for `id`.
    pub async fn get(&self, id: &str) -> Option<JobRecord> {
        self.jobs.read().await.get(id).cloned()
    }

    pub async fn contains(&self, id: &str) -> bool {
        self.jobs.read().await.contains_key(id)
    }

    /// Insert `record` unless a job with `id` already exists.
    ///
    /// Returns the existing record (and leaves it untouched) or `None` if
    /// the new record was stored. The check and the insert happen under a
    /// single write lock.
    pub async fn insert_if_absent(&self, id: &str, record: JobRecord) -> Option<JobRecord> {
        let mut jobs = self.jobs.write().await;
        if let Some(existing) = jobs.get(id) {
            return Some(existing.clone());
        }
        jobs.insert(id.to_string(), record);
        None
    }

    /// Claim `id` for a pipeline run by storing `record`.
    ///
    /// Fails with the current record if the job is already running. The
    /// check and the write happen under a single write lock, so of several
    /// concurrent callers exactly one succeeds.
    pub async fn try_start(&self, id: &str, record: JobRecord) -> Result<(), JobRecord> {
        let mut jobs = self.jobs.write().await;
        if let Some(existing) = jobs.get(id) {
            if existing.status.is_running() {
                return Err(existing.clone());
            }
        }
        jobs.insert(id.to_string(), record);
        Ok(())
    }

    /// Overwrite the status fields of an existing job.
    ///
    /// Unknown ids are ignored; returns whether a record was updated.
    pub async fn update(
        &self,
        id: &str,
        status: JobStatus,
        progress: f64,
        message: impl Into<String>,
        error: Option<String>,
    ) -> bool {
        let mut jobs = self.jobs.write().await;
        match jobs.get_mut(id) {
            Some(job) => {
                job.status = status;
                job.progress = progress;
                job.message = message.into();
                job.error = error;
                job.updated_at = Utc::now();
                true
            }
            None => false,
        }
    }

    /// Mark a job completed, publishing `mesh_url` in the same write.
    ///
    /// Unknown ids are ignored; returns whether a record was updated.
    pub async fn complete(
        &self,
        id: &str,
        progress: f64,
        message: impl Into<String>,
        mesh_url: Option<String>,
    ) -> bool {
        let mut jobs = self.jobs.write().await;
        match jobs.get_mut(id) {
            Some(job) => {
                job.status = JobStatus::Completed;
                job.progress = progress;
                job.message = message.into();
                job.error = None;
                job.mesh_url = mesh_url;
                job.updated_at = Utc::now();
                true
            }
            None => false,
        }
    }

    /// Mark a job failed, keeping whatever progress it had reached.
    ///
    /// A job that was never registered is created at zero progress so the
    /// failure stays observable.
    pub async fn fail(&self, id: &str, message: impl Into<String>, error: impl Into<String>) {
        let mut jobs = self.jobs.write().await;
        let now = Utc::now();
        let job = jobs
            .entry(id.to_string())
            .or_insert_with(|| JobRecord::new(JobStatus::Failed, 0.0, ""));
        job.status = JobStatus::Failed;
        job.message = message.into();
        job.error = Some(error.into());
        job.mesh_url = None;
        job.updated_at = now;
    }

    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.jobs.read().await.is_empty()
    }
}
