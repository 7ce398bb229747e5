use scan2cad_api::state::AppState;
use scan2cad_server::shutdown::serve;
use scan2cad_server::telemetry::init_tracing;
use scan2cad_server::ServerConfig;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    init_tracing("scan2cad_api=debug,scan2cad_core=debug,tower_http=debug");

    // --- Configuration ---
    let config = ServerConfig::from_env(5000).with_port_arg(std::env::args().nth(1));
    tracing::info!(
        host = %config.host,
        port = config.port,
        data_dir = %config.data_dir.display(),
        "Loaded server configuration"
    );

    // --- Data directories ---
    let state = AppState::new(config.clone());
    for dir in [state.layout.uploads_dir(), state.layout.models_dir()] {
        tokio::fs::create_dir_all(&dir)
            .await
            .unwrap_or_else(|e| panic!("Failed to create {}: {e}", dir.display()));
    }

    // --- Start server ---
    let tasks = state.tasks.clone();
    serve(scan2cad_api::app(state), &config, tasks).await;
}
