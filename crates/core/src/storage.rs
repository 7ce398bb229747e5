//! On-disk layout of the shared data directory.
//!
//! ```text
//! {root}/uploads/{job}/image_0000.jpg      orchestration API uploads
//! {root}/models/{job}/images/...           copies consumed by the pipeline
//! {root}/models/{job}/model.obj            orchestration API result
//! {root}/{job}/object.glb                  reconstruction service result
//! {root}/cad/{cad_id}.jscad                CAD source
//! {root}/cad/{cad_id}.stl                  CAD solid
//! ```

use std::path::{Path, PathBuf};

use crate::error::CoreError;

/// Maximum accepted length of a job or CAD id.
pub const MAX_ID_LEN: usize = 128;

/// URL prefix under which the data directory is served.
pub const DATA_URL_PREFIX: &str = "/data";

/// Reject ids that could escape the data directory when joined onto a path.
pub fn validate_id(id: &str) -> Result<(), CoreError> {
    if id.is_empty() {
        return Err(CoreError::Validation("Job ID must not be empty".into()));
    }
    if id.len() > MAX_ID_LEN {
        return Err(CoreError::Validation(format!(
            "Job ID exceeds {MAX_ID_LEN} characters"
        )));
    }
    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(CoreError::Validation(format!(
            "Job ID '{id}' may only contain letters, digits, '-' and '_'"
        )));
    }
    Ok(())
}

/// Paths inside a service's data directory.
#[derive(Debug, Clone)]
pub struct DataLayout {
    root: PathBuf,
}

impl DataLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    // ---- orchestration API ----

    pub fn uploads_dir(&self) -> PathBuf {
        self.root.join("uploads")
    }

    pub fn models_dir(&self) -> PathBuf {
        self.root.join("models")
    }

    pub fn upload_dir(&self, job_id: &str) -> PathBuf {
        self.uploads_dir().join(job_id)
    }

    pub fn model_dir(&self, job_id: &str) -> PathBuf {
        self.models_dir().join(job_id)
    }

    pub fn model_images_dir(&self, job_id: &str) -> PathBuf {
        self.model_dir(job_id).join("images")
    }

    pub fn model_obj(&self, job_id: &str) -> PathBuf {
        self.model_dir(job_id).join("model.obj")
    }

    // ---- reconstruction service ----

    pub fn job_dir(&self, job_id: &str) -> PathBuf {
        self.root.join(job_id)
    }

    pub fn object_glb(&self, job_id: &str) -> PathBuf {
        self.job_dir(job_id).join("object.glb")
    }

    pub fn object_glb_url(job_id: &str) -> String {
        format!("{DATA_URL_PREFIX}/{job_id}/object.glb")
    }

    // ---- CAD service ----

    pub fn cad_dir(&self) -> PathBuf {
        self.root.join("cad")
    }

    pub fn cad_source(&self, cad_id: &str) -> PathBuf {
        self.cad_dir().join(format!("{cad_id}.jscad"))
    }

    pub fn cad_stl(&self, cad_id: &str) -> PathBuf {
        self.cad_dir().join(format!("{cad_id}.stl"))
    }

    pub fn cad_stl_url(cad_id: &str) -> String {
        format!("{DATA_URL_PREFIX}/cad/{cad_id}.stl")
    }

    pub fn cad_source_url(cad_id: &str) -> String {
        format!("{DATA_URL_PREFIX}/cad/{cad_id}.jscad")
    }

    /// Create the CAD output directory if needed and return it.
    pub async fn ensure_cad_dir(&self) -> std::io::Result<PathBuf> {
        let dir = self.cad_dir();
        tokio::fs::create_dir_all(&dir).await?;
        Ok(dir)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn accepts_uuid_and_cad_ids() {
        assert!(validate_id("3f2b9c1e-1d2a-4c1b-9a77-0f6a1e2b3c4d").is_ok());
        assert!(validate_id("cad-demo-1a2b3c4d").is_ok());
        assert!(validate_id("job_01").is_ok());
    }

    #[test]
    fn rejects_path_traversal_and_empty() {
        assert_matches!(validate_id(""), Err(CoreError::Validation(_)));
        assert_matches!(validate_id("../etc"), Err(CoreError::Validation(_)));
        assert_matches!(validate_id("a/b"), Err(CoreError::Validation(_)));
        assert_matches!(
            validate_id(&"x".repeat(MAX_ID_LEN + 1)),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn layout_paths() {
        let layout = DataLayout::new("/srv/data");
        assert_eq!(
            layout.model_obj("j1"),
            PathBuf::from("/srv/data/models/j1/model.obj")
        );
        assert_eq!(
            layout.upload_dir("j1"),
            PathBuf::from("/srv/data/uploads/j1")
        );
        assert_eq!(
            layout.object_glb("j1"),
            PathBuf::from("/srv/data/j1/object.glb")
        );
        assert_eq!(
            layout.cad_stl("cad-x"),
            PathBuf::from("/srv/data/cad/cad-x.stl")
        );
    }

    #[test]
    fn public_urls() {
        assert_eq!(DataLayout::object_glb_url("j1"), "/data/j1/object.glb");
        assert_eq!(DataLayout::cad_stl_url("c1"), "/data/cad/c1.stl");
        assert_eq!(DataLayout::cad_source_url("c1"), "/data/cad/c1.jscad");
    }
}
