use axum::Json;
use serde_json::{json, Value};

/// GET /
pub async fn index() -> Json<Value> {
    Json(json!({
        "message": "Reconstruction Service API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /health
pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
