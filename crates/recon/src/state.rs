use std::sync::Arc;

use scan2cad_core::jobs::JobRegistry;
use scan2cad_core::pipeline::StageRunner;
use scan2cad_core::storage::DataLayout;
use scan2cad_server::{BackgroundTasks, ServerConfig};

/// Shared application state available to all Axum handlers via `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<JobRegistry>,
    pub layout: DataLayout,
    pub config: Arc<ServerConfig>,
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

    pub fn stage_runner(&self) -> StageRunner {
        StageRunner::new(self.config.stage_delay_scale, self.tasks.token())
    }
}
