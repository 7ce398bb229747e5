//! Uploaded image validation and file naming.

use std::path::Path;

use image::ImageFormat;

use crate::error::CoreError;

/// File extensions the pipelines pick up from an upload directory.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// Accepted upload formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
    WebP,
}

impl ImageKind {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::WebP => "webp",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::WebP => "image/webp",
        }
    }
}

/// Identify the format of an uploaded image from its magic bytes.
pub fn sniff_image(bytes: &[u8]) -> Result<ImageKind, CoreError> {
    if bytes.is_empty() {
        return Err(CoreError::Validation("Image payload is empty".into()));
    }
    match image::guess_format(bytes) {
        Ok(ImageFormat::Jpeg) => Ok(ImageKind::Jpeg),
        Ok(ImageFormat::Png) => Ok(ImageKind::Png),
        Ok(ImageFormat::WebP) => Ok(ImageKind::WebP),
        Ok(other) => Err(CoreError::Validation(format!(
            "Unsupported image format {other:?}. Supported: JPEG, PNG, WebP"
        ))),
        Err(_) => Err(CoreError::Validation(
            "Payload is not a recognised image".into(),
        )),
    }
}

/// Stored file name for the `index`-th image of a job.
pub fn image_file_name(index: usize, kind: ImageKind) -> String {
    format!("image_{index:04}.{}", kind.extension())
}

/// Whether `path` has one of [`IMAGE_EXTENSIONS`] (case-insensitive).
pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// List image files directly inside `dir`, sorted by file name.
pub async fn list_images(dir: &Path) -> std::io::Result<Vec<std::path::PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut images = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if entry.file_type().await?.is_file() && is_image_file(&path) {
            images.push(path);
        }
    }
    images.sort();
    Ok(images)
}
