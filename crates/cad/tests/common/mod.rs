#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use scan2cad_cad::converter::StlConverter;
use scan2cad_cad::generator::SourceGenerator;
use scan2cad_cad::state::AppState;
use scan2cad_llm::{DimensionEstimator, HfInferenceClient, LlmConfig};
use scan2cad_server::ServerConfig;
use tempfile::TempDir;
use tower::ServiceExt;

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

/// Template generator, builtin converter, no vision model.
pub fn build_test_app() -> (Router, AppState, TempDir) {
    build_test_app_with(SourceGenerator::Template, StlConverter::Builtin)
}

pub fn build_test_app_with(
    generator: SourceGenerator,
    converter: StlConverter,
) -> (Router, AppState, TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let state = AppState::new(test_config(dir.path().to_path_buf()), generator, converter);
    (scan2cad_cad::app(state.clone()), state, dir)
}

/// Like [`build_test_app_with`], with a custom request timeout and an
/// optional vision model.
pub fn build_test_app_full(
    generator: SourceGenerator,
    converter: StlConverter,
    request_timeout_secs: u64,
    estimator: Option<DimensionEstimator>,
) -> (Router, AppState, TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut config = test_config(dir.path().to_path_buf());
    config.request_timeout_secs = request_timeout_secs;
    let mut state = AppState::new(config, generator, converter);
    state.estimator = estimator.map(Arc::new);
    (scan2cad_cad::app(state.clone()), state, dir)
}

/// Serve `router` on an ephemeral local port.
pub async fn spawn_mock(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// Model settings pointing at a mock inference server.
pub fn mock_llm_config(addr: SocketAddr) -> LlmConfig {
    LlmConfig {
        api_base: format!("http://{addr}"),
        vlm_model_id: Some("vqa-model".into()),
        ..LlmConfig::default()
    }
}

/// Vision estimator backed by the mock VQA route `/models/vqa-model`.
pub fn mock_estimator(addr: SocketAddr) -> DimensionEstimator {
    DimensionEstimator::from_config(reqwest::Client::new(), &mock_llm_config(addr))
        .expect("vision model configured")
}

/// Text client backed by the mock route `/models/{model_id}`.
pub fn mock_text_client(addr: SocketAddr, model_id: &str) -> HfInferenceClient {
    HfInferenceClient::with_client(reqwest::Client::new(), &mock_llm_config(addr), model_id)
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
