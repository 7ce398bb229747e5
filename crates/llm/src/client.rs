//! REST client for the Hugging Face Inference API.
//!
//! Wraps `POST {api_base}/models/{model_id}` for text generation using
//! [`reqwest`].

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::LlmConfig;
use crate::{GenerationParams, LlmError, TextGenerator};

/// HTTP client for one hosted text-generation model.
#[derive(Debug, Clone)]
pub struct HfInferenceClient {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
}

impl HfInferenceClient {
    /// Create a client for the configured text model.
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self::with_client(client, config, &config.model_id))
    }

    /// Create a client reusing an existing [`reqwest::Client`] (shared
    /// connection pool) for an arbitrary hosted model.
    pub fn with_client(client: reqwest::Client, config: &LlmConfig, model_id: &str) -> Self {
        tracing::info!(model_id, "Initialized API-based LLM");
        Self {
            client,
            api_url: config.model_url(model_id),
            api_key: config.api_key.clone(),
        }
    }

    /// POST an arbitrary JSON payload to the model endpoint and return the
    /// decoded JSON response.
    pub async fn post_json(&self, payload: &Value) -> Result<Value, LlmError> {
        let mut request = self.client.post(&self.api_url).json(payload);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        tracing::info!(api_url = %self.api_url, "Sending request to inference API");
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<Value>().await?)
    }
}

/// Build the text-generation request body.
pub fn generation_payload(prompt: &str, params: &GenerationParams) -> Value {
    let mut parameters = serde_json::json!({
        "max_new_tokens": params.max_tokens,
        "temperature": params.temperature,
        "top_p": params.top_p,
        "return_full_text": false,
    });
    if !params.stop.is_empty() {
        parameters["stop_sequences"] = serde_json::json!(params.stop);
    }
    serde_json::json!({
        "inputs": prompt,
        "parameters": parameters,
    })
}

/// Pull the generated text out of the response shapes the API returns.
///
/// - `[{"generated_text": ".."}]` → the text
/// - `[other, ..]` → `other` rendered as text
/// - `{"generated_text": ".."}` → the text
/// - anything else → the whole value rendered as text
pub fn extract_generated_text(value: &Value) -> String {
    let text = match value {
        Value::Array(items) if !items.is_empty() => match items[0].get("generated_text") {
            Some(text) => render(text),
            None => render(&items[0]),
        },
        Value::Object(map) if map.contains_key("generated_text") => {
            render(&map["generated_text"])
        }
        other => render(other),
    };
    text.trim().to_string()
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[async_trait]
impl TextGenerator for HfInferenceClient {
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String, LlmError> {
        let response = self.post_json(&generation_payload(prompt, params)).await?;
        Ok(extract_generated_text(&response))
    }
}
