//! Handler for `POST /api/upload`.
//!
//! Two request shapes are accepted:
//!
//! - `multipart/form-data` with one or more `images` file fields
//! - JSON `{"images": ["data:image/jpeg;base64,...", ...]}`
//!
//! Every payload is sniffed before anything touches the disk, so a bad
//! image rejects the whole upload and no job is created.

use axum::extract::{FromRequest, Multipart, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::Json;
use scan2cad_core::data_url::decode_data_url;
use scan2cad_core::images::{image_file_name, sniff_image, ImageKind};
use scan2cad_core::jobs::JobRecord;
use scan2cad_server::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::state::AppState;

/// Multipart field name carrying image files.
pub const IMAGES_FIELD: &str = "images";

/// Message stored on a freshly uploaded job.
pub const JOB_CREATED_MESSAGE: &str = "Job created, waiting to start";

/// JSON upload body.
#[derive(Debug, Deserialize)]
pub struct DataUrlUpload {
    #[serde(default)]
    pub images: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub status: &'static str,
    pub job_id: String,
    pub message: String,
    pub image_count: usize,
}

/// An upload payload that passed format sniffing.
struct ValidImage {
    kind: ImageKind,
    bytes: Vec<u8>,
}

impl ValidImage {
    fn new(bytes: Vec<u8>, index: usize) -> AppResult<Self> {
        let kind = sniff_image(&bytes)
            .map_err(|e| AppError::BadRequest(format!("Image {index}: {e}")))?;
        Ok(Self { kind, bytes })
    }
}

/// POST /api/upload
pub async fn upload_images(
    State(state): State<AppState>,
    request: Request,
) -> AppResult<Json<UploadResponse>> {
    let is_multipart = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"));

    let images = if is_multipart {
        let multipart = Multipart::from_request(request, &state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        read_multipart(multipart).await?
    } else {
        let Json(body) = Json::<DataUrlUpload>::from_request(request, &state).await?;
        read_data_urls(&body.images)?
    };

    let job_id = Uuid::new_v4().to_string();
    let upload_dir = state.layout.upload_dir(&job_id);
    tokio::fs::create_dir_all(&upload_dir).await?;

    for (index, image) in images.iter().enumerate() {
        let path = upload_dir.join(image_file_name(index, image.kind));
        tokio::fs::write(&path, &image.bytes).await?;
    }

    state
        .registry
        .insert(&job_id, JobRecord::pending(JOB_CREATED_MESSAGE))
        .await;

    let image_count = images.len();
    tracing::info!(job_id = %job_id, image_count, "Created job");

    Ok(Json(UploadResponse {
        status: "success",
        job_id,
        message: format!("Successfully uploaded {image_count} images"),
        image_count,
    }))
}

async fn read_multipart(mut multipart: Multipart) -> AppResult<Vec<ValidImage>> {
    let mut images = Vec::new();
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(IMAGES_FIELD) {
            continue;
        }
        let bytes = field.bytes().await?;
        images.push(ValidImage::new(bytes.to_vec(), images.len())?);
    }
    Ok(images)
}

fn read_data_urls(urls: &[String]) -> AppResult<Vec<ValidImage>> {
    urls.iter()
        .enumerate()
        .map(|(index, url)| {
            let decoded = decode_data_url(url)
                .map_err(|e| AppError::BadRequest(format!("Image {index}: {e}")))?;
            let image = ValidImage::new(decoded.bytes, index)?;
            if let Some(declared) = decoded.mime.as_deref() {
                if !declared.eq_ignore_ascii_case(image.kind.mime()) {
                    tracing::warn!(
                        index,
                        declared,
                        detected = image.kind.mime(),
                        "Data URL MIME type does not match image content"
                    );
                }
            }
            Ok(image)
        })
        .collect()
}
