//! Degrade to canned JSCAD when the hosted model is unavailable.

use std::time::Duration;

use crate::{GenerationParams, TextGenerator};

/// JSCAD returned whenever the model call fails: the 100 × 80 × 50 mm
/// case with 3 mm walls.
pub const MOCK_JSCAD: &str = r#"function main() {
  const dimensions = {
    width: 100,
    height: 80,
    depth: 50
  };

  return createCase(dimensions);
}

function createCase(dimensions) {
  const offset = 3;

  return CSG.cube({
    center: [0, 0, 0],
    radius: [
      dimensions.width/2 + offset,
      dimensions.height/2 + offset,
      dimensions.depth/2 + offset
    ]
  }).subtract(
    CSG.cube({
      center: [0, 0, offset/2],
      radius: [
        dimensions.width/2,
        dimensions.height/2,
        dimensions.depth/2
      ]
    })
  );
}"#;

/// Wraps a [`TextGenerator`] so generation never fails.
pub struct FallbackGenerator<G> {
    inner: G,
}

impl<G: TextGenerator> FallbackGenerator<G> {
    pub fn new(inner: G) -> Self {
        Self { inner }
    }

    /// Generated text, or [`MOCK_JSCAD`] if the model call failed or did
    /// not answer within `deadline`.
    pub async fn generate(
        &self,
        prompt: &str,
        params: &GenerationParams,
        deadline: Duration,
    ) -> String {
        match tokio::time::timeout(deadline, self.inner.generate(prompt, params)).await {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => {
                tracing::error!(error = %e, "API request failed");
                tracing::info!("API failed, generating mock CAD code");
                MOCK_JSCAD.to_string()
            }
            Err(_) => {
                tracing::error!(deadline_ms = deadline.as_millis() as u64, "API request timed out");
                tracing::info!("API failed, generating mock CAD code");
                MOCK_JSCAD.to_string()
            }
        }
    }
}
