//! Reconstruction service.
//!
//! Runs the simulated photogrammetry pipeline over `{DATA_DIR}/{job}` and
//! publishes a GLB mesh under `/data`.

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
    let routes = routes::router(state.layout.root());
    with_middleware(routes, state, &config)
}
