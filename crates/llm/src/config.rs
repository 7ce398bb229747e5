/// Default text-generation model.
pub const DEFAULT_MODEL_ID: &str = "google/gemma-2b";

/// Default Inference API base URL.
pub const DEFAULT_API_BASE: &str = "https://api-inference.huggingface.co";

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Model API configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Bearer token; requests go out unauthenticated (free tier) when unset.
    pub api_key: Option<String>,
    pub model_id: String,
    pub api_base: String,
    /// Vision-language model for dimension estimation; disabled when unset.
    pub vlm_model_id: Option<String>,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model_id: DEFAULT_MODEL_ID.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            vlm_model_id: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl LlmConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var            | Default                                  |
    /// |--------------------|------------------------------------------|
    /// | `HF_API_KEY`       | unset                                    |
    /// | `HF_MODEL_ID`      | `google/gemma-2b`                        |
    /// | `HF_API_BASE`      | `https://api-inference.huggingface.co`   |
    /// | `VLM_MODEL_ID`     | unset                                    |
    /// | `LLM_TIMEOUT_SECS` | `60`                                     |
    pub fn from_env() -> Self {
        let non_empty = |key: &str| {
            std::env::var(key)
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let timeout_secs: u64 = std::env::var("LLM_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
            .parse()
            .expect("LLM_TIMEOUT_SECS must be a valid u64");

        let config = Self {
            api_key: non_empty("HF_API_KEY"),
            model_id: non_empty("HF_MODEL_ID").unwrap_or_else(|| DEFAULT_MODEL_ID.to_string()),
            api_base: non_empty("HF_API_BASE")
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
                .trim_end_matches('/')
                .to_string(),
            vlm_model_id: non_empty("VLM_MODEL_ID"),
            timeout_secs,
        };

        if config.api_key.is_none() {
            tracing::warn!("No Hugging Face API key found in HF_API_KEY environment variable");
            tracing::warn!("Running in free tier mode - expect throttling");
        }

        config
    }

    /// Inference endpoint for `model_id`.
    pub fn model_url(&self, model_id: &str) -> String {
        format!("{}/models/{}", self.api_base, model_id)
    }
}
