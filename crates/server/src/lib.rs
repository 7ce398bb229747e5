//! HTTP plumbing shared by the api, recon and cad services.

pub mod background;
pub mod config;
pub mod error;
pub mod router;
pub mod shutdown;
pub mod telemetry;

pub use background::BackgroundTasks;
pub use config::ServerConfig;
pub use error::{AppError, AppResult};
