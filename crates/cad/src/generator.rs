//! JSCAD source generation strategies.

use std::sync::Arc;
use std::time::Duration;

use scan2cad_core::dimensions::Dimensions;
use scan2cad_llm::prompt::jscad_prompt;
use scan2cad_llm::{FallbackGenerator, GenerationParams, TextGenerator};

use crate::jscad::case_source;

/// Produces the JSCAD program for a request.
pub enum SourceGenerator {
    Template,
    Llm {
        model: FallbackGenerator<Arc<dyn TextGenerator>>,
        params: GenerationParams,
    },
}

impl SourceGenerator {
    pub fn llm(model: Arc<dyn TextGenerator>) -> Self {
        Self::Llm {
            model: FallbackGenerator::new(model),
            params: GenerationParams::default(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Template => "template",
            Self::Llm { .. } => "llm",
        }
    }

    /// Never fails: the model path degrades to a canned design when the
    /// model errors or overruns `deadline`.
    pub async fn generate(
        &self,
        prompt: &str,
        dimensions: &Dimensions,
        deadline: Duration,
    ) -> String {
        match self {
            Self::Template => case_source(dimensions),
            Self::Llm { model, params } => {
                model
                    .generate(&jscad_prompt(prompt, dimensions), params, deadline)
                    .await
            }
        }
    }
}
