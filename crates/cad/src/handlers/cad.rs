//! Handlers for CAD generation and dimension estimation.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use scan2cad_core::dimensions::{Dimensions, PartialDimensions};
use scan2cad_core::storage::{validate_id, DataLayout};
use scan2cad_server::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::converter::ConvertError;
use crate::estimate::{estimate_dimensions, DimensionSource};
use crate::state::AppState;

/// Mesh id that is accepted without a reconstructed mesh on disk.
pub const DEMO_MESH_ID: &str = "demo";

pub const CONVERSION_FAILED: &str = "Failed to generate STL file";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CadGenerationRequest {
    pub mesh_id: String,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub dimensions: Option<PartialDimensions>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CadGenerationResponse {
    pub cad_id: String,
    pub status: &'static str,
    pub model_url: Option<String>,
    pub source_url: Option<String>,
    pub error: Option<String>,
}

impl CadGenerationResponse {
    fn completed(cad_id: String) -> Self {
        Self {
            model_url: Some(DataLayout::cad_stl_url(&cad_id)),
            source_url: Some(DataLayout::cad_source_url(&cad_id)),
            cad_id,
            status: "completed",
            error: None,
        }
    }

    fn failed(cad_id: String, error: impl Into<String>) -> Self {
        Self {
            cad_id,
            status: "failed",
            model_url: None,
            source_url: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateRequest {
    pub mesh_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateResponse {
    pub mesh_id: String,
    pub dimensions: Dimensions,
    pub source: DimensionSource,
}

#[derive(Debug, thiserror::Error)]
enum GenerateError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Conversion(#[from] ConvertError),
}

/// `cad-{mesh_id}-{8 hex chars}`.
pub fn new_cad_id(mesh_id: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("cad-{mesh_id}-{}", &suffix[..8])
}

// ---------------------------------------------------------------------------
// Generate
// ---------------------------------------------------------------------------

/// POST /generate
///
/// Writes `cad/{cadId}.jscad` and `cad/{cadId}.stl`. A failed STL
/// conversion answers 500; any other failure after validation answers 200
/// with `status: "failed"`.
pub async fn generate_cad(
    State(state): State<AppState>,
    payload: Result<Json<CadGenerationRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<CadGenerationResponse>)> {
    let Json(input) = payload?;
    validate_id(&input.mesh_id)?;
    let cad_id = new_cad_id(&input.mesh_id);

    let mesh_path = state.layout.object_glb(&input.mesh_id);
    if input.mesh_id != DEMO_MESH_ID && !tokio::fs::try_exists(&mesh_path).await? {
        return Err(AppError::not_found("Mesh", input.mesh_id));
    }

    let dimensions = match input.dimensions.filter(|d| !d.is_empty()) {
        Some(partial) => partial.resolve(Dimensions::default()),
        None => {
            let (dims, source) = estimate_dimensions(
                &state.layout,
                state.estimator.as_deref(),
                &input.mesh_id,
                state.model_deadline,
            )
            .await;
            tracing::debug!(mesh_id = %input.mesh_id, ?source, "Estimated dimensions");
            dims
        }
    }
    .checked()?;

    tracing::info!(
        cad_id = %cad_id,
        generator = state.generator.name(),
        converter = state.converter.name(),
        width = dimensions.width,
        height = dimensions.height,
        depth = dimensions.depth,
        "Generating CAD model"
    );

    match produce(&state, &cad_id, &input.prompt, &dimensions).await {
        Ok(()) => Ok((StatusCode::OK, Json(CadGenerationResponse::completed(cad_id)))),
        Err(GenerateError::Conversion(e)) => {
            tracing::error!(cad_id = %cad_id, error = %e, "STL conversion failed");
            Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(CadGenerationResponse::failed(cad_id, CONVERSION_FAILED)),
            ))
        }
        Err(e) => {
            tracing::error!(cad_id = %cad_id, error = %e, "CAD generation error");
            Ok((
                StatusCode::OK,
                Json(CadGenerationResponse::failed(cad_id, e.to_string())),
            ))
        }
    }
}

async fn produce(
    state: &AppState,
    cad_id: &str,
    prompt: &str,
    dimensions: &Dimensions,
) -> Result<(), GenerateError> {
    state.layout.ensure_cad_dir().await?;

    let source = state
        .generator
        .generate(prompt, dimensions, state.model_deadline)
        .await;
    let source_path = state.layout.cad_source(cad_id);
    tokio::fs::write(&source_path, source).await?;

    state
        .converter
        .convert(&source_path, &state.layout.cad_stl(cad_id), dimensions)
        .await?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Estimate
// ---------------------------------------------------------------------------

/// POST /estimate
pub async fn estimate(
    State(state): State<AppState>,
    payload: Result<Json<EstimateRequest>, JsonRejection>,
) -> AppResult<Json<EstimateResponse>> {
    let Json(input) = payload?;
    validate_id(&input.mesh_id)?;

    let (dimensions, source) = estimate_dimensions(
        &state.layout,
        state.estimator.as_deref(),
        &input.mesh_id,
        state.model_deadline,
    )
    .await;

    Ok(Json(EstimateResponse {
        mesh_id: input.mesh_id,
        dimensions,
        source,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cad_id_has_mesh_id_and_hex_suffix() {
        let id = new_cad_id("scan-7");
        let suffix = id.strip_prefix("cad-scan-7-").unwrap();
        assert_eq!(suffix.len(), 8);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(new_cad_id("scan-7"), id);
    }
}
