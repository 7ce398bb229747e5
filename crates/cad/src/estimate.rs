//! Best-effort dimensions of a scanned object.
//!
//! Sources are tried in order: the vision model on the first scan photo,
//! the bounding box of the reconstructed mesh, then fixed defaults.

use std::time::Duration;

use scan2cad_core::dimensions::Dimensions;
use scan2cad_core::images::list_images;
use scan2cad_core::storage::DataLayout;
use scan2cad_llm::DimensionEstimator;
use scan2cad_mesh::glb::read_bounds;
use serde::Serialize;

/// Where an estimate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DimensionSource {
    Vision,
    Mesh,
    Default,
}

/// Estimate the dimensions of `mesh_id`. Never fails.
///
/// A vision model call that takes longer than `deadline` counts as a
/// failed estimate.
pub async fn estimate_dimensions(
    layout: &DataLayout,
    estimator: Option<&DimensionEstimator>,
    mesh_id: &str,
    deadline: Duration,
) -> (Dimensions, DimensionSource) {
    if let Some(estimator) = estimator {
        if let Some(dims) = from_vision(layout, estimator, mesh_id, deadline).await {
            return (dims, DimensionSource::Vision);
        }
    }

    if let Some(dims) = from_mesh(layout, mesh_id).await {
        return (dims, DimensionSource::Mesh);
    }

    (Dimensions::default(), DimensionSource::Default)
}

async fn from_vision(
    layout: &DataLayout,
    estimator: &DimensionEstimator,
    mesh_id: &str,
    deadline: Duration,
) -> Option<Dimensions> {
    let photo = list_images(&layout.job_dir(mesh_id))
        .await
        .ok()?
        .into_iter()
        .next()?;
    let bytes = tokio::fs::read(&photo).await.ok()?;

    match tokio::time::timeout(deadline, estimator.estimate(&bytes)).await {
        Ok(Ok(Some(dims))) => Some(dims),
        Ok(Ok(None)) => {
            tracing::warn!(mesh_id, "Vision model answer had no usable dimensions");
            None
        }
        Ok(Err(e)) => {
            tracing::warn!(mesh_id, error = %e, "Vision dimension estimate failed");
            None
        }
        Err(_) => {
            tracing::warn!(mesh_id, "Vision dimension estimate timed out");
            None
        }
    }
}

async fn from_mesh(layout: &DataLayout, mesh_id: &str) -> Option<Dimensions> {
    let bytes = tokio::fs::read(layout.object_glb(mesh_id)).await.ok()?;
    let (min, max) = match read_bounds(&bytes) {
        Ok(bounds) => bounds,
        Err(e) => {
            tracing::warn!(mesh_id, error = %e, "Could not read mesh bounds");
            return None;
        }
    };
    Dimensions::new(max[0] - min[0], max[1] - min[1], max[2] - min[2])
        .checked()
        .ok()
}
