//! Upload and orchestration API.
//!
//! Accepts photo sets, runs the simulated reconstruction pipeline in the
//! background and serves the resulting OBJ model. The library half exists
//! so integration tests and the binary build the same router.

pub mod handlers;
pub mod pipeline;
pub mod routes;
pub mod state;

use axum::Router;
use scan2cad_server::router::with_middleware;

use crate::state::AppState;

/// The full application: routes plus the shared middleware stack.
pub fn app(state: AppState) -> Router {
    let config = state.config.clone();
    with_middleware(routes::router(), state, &config)
}
