//! Integration tests for upload, processing, status polling and model download.

mod common;

use axum::http::StatusCode;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use common::{
    body_bytes, body_json, get, post_json, post_multipart, wait_for_terminal, JPEG_BYTES,
    PNG_BYTES,
};
use scan2cad_core::jobs::{JobRecord, JobStatus};
use serde_json::json;

fn data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

async fn upload_two_images(app: &axum::Router) -> String {
    let response = post_multipart(
        app.clone(),
        "/api/upload",
        &[("images", JPEG_BYTES), ("images", PNG_BYTES)],
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["job_id"]
        .as_str()
        .unwrap()
        .to_string()
}

// ---------------------------------------------------------------------------
// Upload
// ---------------------------------------------------------------------------

#[tokio::test]
async fn multipart_upload_stores_images_and_registers_job() {
    let (app, state, _dir) = common::build_test_app();
    let response = post_multipart(
        app.clone(),
        "/api/upload",
        &[("images", JPEG_BYTES), ("other", b"ignored"), ("images", PNG_BYTES)],
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "success");
    assert_eq!(json["image_count"], 2);
    assert_eq!(json["message"], "Successfully uploaded 2 images");

    let job_id = json["job_id"].as_str().unwrap();
    assert_eq!(job_id.len(), 36);
    let upload_dir = state.layout.upload_dir(job_id);
    assert!(upload_dir.join("image_0000.jpg").exists());
    assert!(upload_dir.join("image_0001.png").exists());

    let status = body_json(get(app, &format!("/api/status/{job_id}")).await).await;
    assert_eq!(status["status"], "pending");
    assert_eq!(status["progress"], 0.0);
    assert_eq!(status["message"], "Job created, waiting to start");
    assert!(status["error"].is_null());
}

#[tokio::test]
async fn data_url_upload_decodes_images() {
    let (app, state, _dir) = common::build_test_app();
    let response = post_json(
        app,
        "/api/upload",
        json!({ "images": [data_url("image/png", PNG_BYTES)] }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["image_count"], 1);
    let stored = state
        .layout
        .upload_dir(json["job_id"].as_str().unwrap())
        .join("image_0000.png");
    assert_eq!(std::fs::read(stored).unwrap(), PNG_BYTES);
}

#[tokio::test]
async fn data_url_stored_by_detected_format_not_declared_mime() {
    let (app, state, _dir) = common::build_test_app();
    let response = post_json(
        app,
        "/api/upload",
        json!({ "images": [data_url("image/jpeg", PNG_BYTES)] }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let upload_dir = state
        .layout
        .upload_dir(body_json(response).await["job_id"].as_str().unwrap());
    assert!(upload_dir.join("image_0000.png").exists());
    assert!(!upload_dir.join("image_0000.jpg").exists());
}

#[tokio::test]
async fn upload_without_images_creates_empty_job() {
    let (app, _state, _dir) = common::build_test_app();
    let response = post_json(app, "/api/upload", json!({})).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["image_count"], 0);
    assert_eq!(json["message"], "Successfully uploaded 0 images");
}

#[tokio::test]
async fn upload_rejects_non_image_payload() {
    let (app, state, _dir) = common::build_test_app();
    let response = post_json(
        app,
        "/api/upload",
        json!({ "images": [data_url("image/jpeg", b"not an image")] }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["status"], "error");
    assert!(state.registry.is_empty().await);
}

#[tokio::test]
async fn upload_rejects_malformed_data_url() {
    let (app, _state, _dir) = common::build_test_app();
    let response = post_json(app, "/api/upload", json!({ "images": ["no-comma-here"] })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Process
// ---------------------------------------------------------------------------

#[tokio::test]
async fn process_without_job_id_returns_400() {
    let (app, _state, _dir) = common::build_test_app();
    let response = post_json(app, "/api/process", json!({})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "Missing job ID");
}

#[tokio::test]
async fn process_unknown_job_returns_404() {
    let (app, _state, _dir) = common::build_test_app();
    let response = post_json(app, "/api/process", json!({ "jobId": "nope" })).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["message"], "Job nope not found");
}

#[tokio::test]
async fn process_job_without_images_returns_400() {
    let (app, _state, _dir) = common::build_test_app();
    let upload = body_json(post_json(app.clone(), "/api/upload", json!({ "images": [] })).await).await;
    let job_id = upload["job_id"].as_str().unwrap();

    let response = post_json(app, "/api/process", json!({ "jobId": job_id })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["message"],
        "No images found for this job"
    );
}

#[tokio::test]
async fn process_rejects_running_job() {
    let (app, state, _dir) = common::build_test_app();
    let job_id = upload_two_images(&app).await;
    state
        .registry
        .insert(&job_id, JobRecord::new(JobStatus::Reconstructing, 0.4, "busy"))
        .await;

    let response = post_json(app, "/api/process", json!({ "jobId": job_id })).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_process_requests_start_one_pipeline() {
    let (app, _state, _dir) = common::build_slow_test_app(1.0);
    let job_id = upload_two_images(&app).await;

    let requests: Vec<_> = (0..2)
        .map(|_| {
            let app = app.clone();
            let job_id = job_id.clone();
            tokio::spawn(async move {
                post_json(app, "/api/process", json!({ "jobId": job_id }))
                    .await
                    .status()
            })
        })
        .collect();

    let mut statuses = Vec::new();
    for request in requests {
        statuses.push(request.await.unwrap());
    }
    statuses.sort();
    assert_eq!(statuses, [StatusCode::OK, StatusCode::CONFLICT]);

    let status = body_json(get(app, &format!("/api/status/{job_id}")).await).await;
    assert_ne!(status["status"], "pending");
}

#[tokio::test]
async fn finished_job_can_be_processed_again() {
    let (app, _state, _dir) = common::build_test_app();
    let job_id = upload_two_images(&app).await;

    let response = post_json(app.clone(), "/api/process", json!({ "jobId": job_id })).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(wait_for_terminal(&app, &job_id).await["status"], "completed");

    let response = post_json(app.clone(), "/api/process", json!({ "jobId": job_id })).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(wait_for_terminal(&app, &job_id).await["status"], "completed");
}

// ---------------------------------------------------------------------------
// Full run
// ---------------------------------------------------------------------------

#[tokio::test]
async fn processed_job_completes_and_serves_model() {
    let (app, state, _dir) = common::build_test_app();
    let job_id = upload_two_images(&app).await;

    let response = post_json(app.clone(), "/api/process", json!({ "jobId": job_id })).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "success");
    assert_eq!(json["message"], "Processing started");
    assert_eq!(json["estimated_time"], 4);

    let status = wait_for_terminal(&app, &job_id).await;
    assert_eq!(status["status"], "completed");
    assert_eq!(status["progress"], 1.0);
    assert_eq!(status["message"], "Reconstruction completed successfully");
    assert!(state.layout.model_images_dir(&job_id).join("image_0001.png").exists());

    let response = get(app, &format!("/api/models/{job_id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "model/obj");
    let obj = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(obj.starts_with("# Simple cube demo model"));
}

// ---------------------------------------------------------------------------
// Status / models
// ---------------------------------------------------------------------------

#[tokio::test]
async fn status_of_unknown_job_returns_404() {
    let (app, _state, _dir) = common::build_test_app();
    let response = get(app, "/api/status/missing").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["status"], "error");
    assert_eq!(json["message"], "Job missing not found");
}

#[tokio::test]
async fn model_before_processing_returns_404() {
    let (app, _state, _dir) = common::build_test_app();
    let job_id = upload_two_images(&app).await;

    let response = get(app, &format!("/api/models/{job_id}")).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await["message"],
        format!("Model for job {job_id} not found")
    );
}
