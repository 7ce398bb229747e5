use scan2cad_cad::config::CadConfig;
use scan2cad_cad::state::AppState;
use scan2cad_server::shutdown::serve;
use scan2cad_server::telemetry::init_tracing;
use scan2cad_server::{BackgroundTasks, ServerConfig};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    init_tracing("scan2cad_cad=debug,scan2cad_llm=debug,tower_http=debug");

    // --- Configuration ---
    let config = ServerConfig::from_env(8002);
    let cad = CadConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = config.port,
        data_dir = %config.data_dir.display(),
        generator = ?cad.generator,
        converter = ?cad.converter,
        vision = cad.llm.vlm_model_id.is_some(),
        "Loaded server configuration"
    );

    // --- State ---
    let state = AppState::from_config(config.clone(), &cad).expect("Failed to build model clients");
    state
        .layout
        .ensure_cad_dir()
        .await
        .expect("Failed to create CAD output directory");

    // --- Start server ---
    serve(scan2cad_cad::app(state), &config, BackgroundTasks::new()).await;
}
