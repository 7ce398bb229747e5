//! CAD generation service.
//!
//! Produces a JSCAD program and an STL solid sized to a scanned object,
//! and serves both under `/data/cad`.

pub mod config;
pub mod converter;
pub mod estimate;
pub mod generator;
pub mod handlers;
pub mod jscad;
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
