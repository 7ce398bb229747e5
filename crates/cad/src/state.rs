use std::sync::Arc;
use std::time::Duration;

use scan2cad_core::storage::DataLayout;
use scan2cad_llm::{DimensionEstimator, HfInferenceClient, LlmError};
use scan2cad_server::ServerConfig;

use crate::config::{CadConfig, ConverterKind, GeneratorKind};
use crate::converter::StlConverter;
use crate::generator::SourceGenerator;

/// Upper bound on model calls a single `/generate` request makes in
/// sequence (vision estimate, then source generation), plus one share
/// reserved for writing and converting the result.
const REQUEST_BUDGET_SHARES: u32 = 3;

/// Time each model call may take so a request that makes all of them
/// still answers before the request timeout.
pub fn model_deadline(config: &ServerConfig) -> Duration {
    Duration::from_secs(config.request_timeout_secs) / REQUEST_BUDGET_SHARES
}

/// Shared application state available to all Axum handlers via `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub layout: DataLayout,
    pub config: Arc<ServerConfig>,
    pub generator: Arc<SourceGenerator>,
    pub converter: Arc<StlConverter>,
    /// Present only when a vision model is configured.
    pub estimator: Option<Arc<DimensionEstimator>>,
    /// Per-call limit on model requests; see [`model_deadline`].
    pub model_deadline: Duration,
}

impl AppState {
    /// State with the given strategies and no vision model.
    pub fn new(config: ServerConfig, generator: SourceGenerator, converter: StlConverter) -> Self {
        Self {
            layout: DataLayout::new(config.data_dir.clone()),
            model_deadline: model_deadline(&config),
            config: Arc::new(config),
            generator: Arc::new(generator),
            converter: Arc::new(converter),
            estimator: None,
        }
    }

    /// Build the state described by `cad`, constructing model clients as needed.
    pub fn from_config(config: ServerConfig, cad: &CadConfig) -> Result<Self, LlmError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(cad.llm.timeout_secs))
            .build()?;

        let generator = match cad.generator {
            GeneratorKind::Template => SourceGenerator::Template,
            GeneratorKind::Llm => SourceGenerator::llm(Arc::new(HfInferenceClient::with_client(
                http.clone(),
                &cad.llm,
                &cad.llm.model_id,
            ))),
        };
        let converter = match cad.converter {
            ConverterKind::Builtin => StlConverter::Builtin,
            ConverterKind::JscadCli => StlConverter::jscad_cli(),
        };

        let mut state = Self::new(config, generator, converter);
        state.estimator = DimensionEstimator::from_config(http, &cad.llm).map(Arc::new);
        if cad.llm.timeout_secs > state.model_deadline.as_secs() {
            tracing::info!(
                llm_timeout_secs = cad.llm.timeout_secs,
                model_deadline_ms = state.model_deadline.as_millis() as u64,
                "Model calls are capped below the request timeout"
            );
        }
        Ok(state)
    }
}
