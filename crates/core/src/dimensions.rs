//! Physical object dimensions used to size generated accessories.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;

/// Fallback width in millimetres.
pub const DEFAULT_WIDTH_MM: f64 = 100.0;
/// Fallback height in millimetres.
pub const DEFAULT_HEIGHT_MM: f64 = 80.0;
/// Fallback depth in millimetres.
pub const DEFAULT_DEPTH_MM: f64 = 50.0;

/// Bounding dimensions of a scanned object, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct Dimensions {
    #[validate(range(exclusive_min = 0.0, max = 10000.0))]
    pub width: f64,
    #[validate(range(exclusive_min = 0.0, max = 10000.0))]
    pub height: f64,
    #[validate(range(exclusive_min = 0.0, max = 10000.0))]
    pub depth: f64,
}

impl Default for Dimensions {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH_MM,
            height: DEFAULT_HEIGHT_MM,
            depth: DEFAULT_DEPTH_MM,
        }
    }
}

impl Dimensions {
    pub fn new(width: f64, height: f64, depth: f64) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }

    /// `[width, height, depth]`, matching the x / y / z axes of generated parts.
    pub fn as_array(&self) -> [f64; 3] {
        [self.width, self.height, self.depth]
    }

    /// Validate, mapping failures to [`CoreError::Validation`].
    pub fn checked(self) -> Result<Self, CoreError> {
        self.validate().map_err(|e| {
            CoreError::Validation(format!(
                "Dimensions must be positive and at most 10000 mm: {e}"
            ))
        })?;
        Ok(self)
    }
}

/// Dimensions as received over HTTP, where any axis may be omitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialDimensions {
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub depth: Option<f64>,
}

impl PartialDimensions {
    pub fn is_empty(&self) -> bool {
        self.width.is_none() && self.height.is_none() && self.depth.is_none()
    }

    /// Fill missing axes from `base`.
    pub fn resolve(&self, base: Dimensions) -> Dimensions {
        Dimensions {
            width: self.width.unwrap_or(base.width),
            height: self.height.unwrap_or(base.height),
            depth: self.depth.unwrap_or(base.depth),
        }
    }
}
