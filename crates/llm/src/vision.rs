//! Object size estimation through a visual question-answering model.

use std::sync::OnceLock;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use regex::Regex;
use scan2cad_core::dimensions::Dimensions;
use serde_json::Value;

use crate::client::HfInferenceClient;
use crate::config::LlmConfig;
use crate::prompt::DIMENSION_QUESTION;
use crate::LlmError;

/// Asks a hosted vision-language model how large the photographed object is.
#[derive(Debug, Clone)]
pub struct DimensionEstimator {
    client: HfInferenceClient,
}

impl DimensionEstimator {
    /// `None` when no `VLM_MODEL_ID` is configured.
    pub fn from_config(
        client: reqwest::Client,
        config: &LlmConfig,
    ) -> Option<Self> {
        let model_id = config.vlm_model_id.as_deref()?;
        Some(Self {
            client: HfInferenceClient::with_client(client, config, model_id),
        })
    }

    /// Estimate dimensions from one photo.
    ///
    /// Returns `Ok(None)` when the model answered but no usable values
    /// could be read from the answer.
    pub async fn estimate(&self, image: &[u8]) -> Result<Option<Dimensions>, LlmError> {
        let payload = serde_json::json!({
            "inputs": {
                "image": STANDARD.encode(image),
                "question": DIMENSION_QUESTION,
            }
        });
        let response = self.client.post_json(&payload).await?;
        let answer = extract_answer(&response)
            .ok_or_else(|| LlmError::InvalidResponse(response.to_string()))?;

        tracing::debug!(answer = %answer, "Vision model answered");
        Ok(parse_dimensions(&answer))
    }
}

/// The answer text of a VQA or text-generation style response.
fn extract_answer(value: &Value) -> Option<String> {
    let item = match value {
        Value::Array(items) => items.first()?,
        other => other,
    };
    ["answer", "generated_text"]
        .iter()
        .find_map(|key| item.get(key).and_then(Value::as_str))
        .or_else(|| item.as_str())
        .map(str::to_string)
}

fn labelled_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(width|height|depth)\b[^0-9]{0,20}?(\d+(?:\.\d+)?)")
            .expect("valid regex")
    })
}

fn number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+(?:\.\d+)?").expect("valid regex"))
}

fn centimetre_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\d\s*(cm|centimet)").expect("valid regex"))
}

/// Read width / height / depth from free-form model output.
///
/// Labelled values win; otherwise the first three numbers are taken in
/// width, height, depth order. Answers given in centimetres are converted
/// to millimetres. Returns `None` if the values are missing or invalid.
pub fn parse_dimensions(answer: &str) -> Option<Dimensions> {
    let mut labelled = [None::<f64>; 3];
    for caps in labelled_re().captures_iter(answer) {
        let slot = match caps[1].to_ascii_lowercase().as_str() {
            "width" => 0,
            "height" => 1,
            _ => 2,
        };
        if labelled[slot].is_none() {
            labelled[slot] = caps[2].parse().ok();
        }
    }

    let values = match labelled {
        [Some(w), Some(h), Some(d)] => [w, h, d],
        _ => {
            let numbers: Vec<f64> = number_re()
                .find_iter(answer)
                .filter_map(|m| m.as_str().parse().ok())
                .take(3)
                .collect();
            match numbers.as_slice() {
                [w, h, d] => [*w, *h, *d],
                _ => return None,
            }
        }
    };

    let scale = if centimetre_re().is_match(answer) { 10.0 } else { 1.0 };
    Dimensions::new(values[0] * scale, values[1] * scale, values[2] * scale)
        .checked()
        .ok()
}
