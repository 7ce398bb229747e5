#![allow(dead_code)]

use std::path::PathBuf;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use scan2cad_api::state::AppState;
use scan2cad_server::ServerConfig;
use tempfile::TempDir;
use tower::ServiceExt;

/// Bytes `image::guess_format` recognises as PNG.
pub const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

/// Bytes `image::guess_format` recognises as JPEG.
pub const JPEG_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0, 0x10, b'J', b'F', b'I', b'F'];

/// Build a test `ServerConfig` rooted at `data_dir`.
///
/// Stage delays are disabled so pipelines finish immediately.
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
///
/// Keep the returned `TempDir` alive for the duration of the test.
pub fn build_test_app() -> (Router, AppState, TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let state = AppState::new(test_config(dir.path().to_path_buf()));
    (scan2cad_api::app(state.clone()), state, dir)
}

/// An app whose pipelines sleep through their stages, scaled by `stage_delay_scale`.
pub fn build_slow_test_app(stage_delay_scale: f64) -> (Router, AppState, TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut config = test_config(dir.path().to_path_buf());
    config.stage_delay_scale = stage_delay_scale;
    let state = AppState::new(config);
    (scan2cad_api::app(state.clone()), state, dir)
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

/// Send a `multipart/form-data` body with one file part per `(field, bytes)`.
pub async fn post_multipart(app: Router, uri: &str, parts: &[(&str, &[u8])]) -> Response<Body> {
    const BOUNDARY: &str = "scan2cad-test-boundary";
    let mut body = Vec::new();
    for (i, (field, bytes)) in parts.iter().enumerate() {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"photo{i}.bin\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    app.oneshot(
        Request::post(uri)
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
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

/// Poll `/api/status/{job_id}` until the job reaches a terminal state.
pub async fn wait_for_terminal(app: &Router, job_id: &str) -> serde_json::Value {
    for _ in 0..200 {
        let response = get(app.clone(), &format!("/api/status/{job_id}")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        if json["status"] == "completed" || json["status"] == "failed" {
            return json;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("job {job_id} did not finish");
}
