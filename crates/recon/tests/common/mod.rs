#![allow(dead_code)]

use std::path::PathBuf;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use scan2cad_recon::state::AppState;
use scan2cad_server::ServerConfig;
use tempfile::TempDir;
use tower::ServiceExt;

/// Build a test `ServerConfig` rooted at `data_dir`, with stage delays disabled.
pub fn test_config(data_dir: PathBuf) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["*".to_string()],
        request_timeout_secs: 30,
        data_dir,
        stage_delay_scale: 0.0,
    }
}

/// An app over a fresh temporary data directory.
pub fn build_test_app() -> (Router, AppState, TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let state = AppState::new(test_config(dir.path().to_path_buf()));
    (scan2cad_recon::app(state.clone()), state, dir)
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    app.oneshot(
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// Poll `/status/{job_id}` until the job reaches a terminal state.
pub async fn wait_for_terminal(app: &Router, job_id: &str) -> serde_json::Value {
    for _ in 0..200 {
        let response = get(app.clone(), &format!("/status/{job_id}")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        if json["status"] == "completed" || json["status"] == "failed" {
            return json;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("job {job_id} did not finish");
}
