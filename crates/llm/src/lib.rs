//! Clients for the external language and vision-language models.
//!
//! [`client::HfInferenceClient`] talks to the Hugging Face Inference API;
//! [`fallback::FallbackGenerator`] wraps any [`TextGenerator`] so callers
//! always receive usable JSCAD, and [`vision::DimensionEstimator`] asks a
//! visual question-answering model for an object's size.

use std::sync::Arc;

use async_trait::async_trait;

pub mod client;
pub mod config;
pub mod fallback;
pub mod prompt;
pub mod vision;

pub use client::HfInferenceClient;
pub use config::LlmConfig;
pub use fallback::FallbackGenerator;
pub use vision::DimensionEstimator;

/// Errors from the model API layer.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The inference API returned a non-2xx status code.
    #[error("Inference API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The response body could not be interpreted.
    #[error("Unexpected inference response: {0}")]
    InvalidResponse(String),
}

/// Sampling parameters for text generation.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    pub max_tokens: u32,
    pub temperature: f64,
    pub top_p: f64,
    pub stop: Vec<String>,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_tokens: 1024,
            temperature: 0.5,
            top_p: 0.9,
            stop: Vec::new(),
        }
    }
}

/// A source of generated text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String, LlmError>;
}

#[async_trait]
impl<T: TextGenerator + ?Sized> TextGenerator for Arc<T> {
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String, LlmError> {
        (**self).generate(prompt, params).await
    }
}
