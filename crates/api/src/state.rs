use std::sync::Arc;

use scan2cad_core::jobs::JobRegistry;
use scan2cad_core::pipeline::StageRunner;
use scan2cad_core::storage::DataLayout;
use scan2cad_server::{BackgroundTasks, ServerConfig};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything mutable sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// In-memory status of every job created since startup.
    pub registry: Arc<JobRegistry>,
    /// Paths under `DATA_DIR`.
    pub layout: DataLayout,
    pub config: Arc<ServerConfig>,
    /// Tracker for running reconstruction pipelines.
    pub tasks: BackgroundTasks,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            registry: Arc::new(JobRegistry::new()),
            layout: DataLayout::new(config.data_dir.clone()),
            config: Arc::new(config),
            tasks: BackgroundTasks::new(),
        }
    }

    /// A stage runner tied to this process's shutdown token.
    pub fn stage_runner(&self) -> StageRunner {
        StageRunner::new(self.config.stage_delay_scale, self.tasks.token())
    }
}
