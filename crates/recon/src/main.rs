use scan2cad_recon::state::AppState;
use scan2cad_server::shutdown::serve;
use scan2cad_server::telemetry::init_tracing;
use scan2cad_server::ServerConfig;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    init_tracing("scan2cad_recon=debug,scan2cad_core=debug,tower_http=debug");

    // --- Configuration ---
    let config = ServerConfig::from_env(8001);
    tracing::info!(
        host = %config.host,
        port = config.port,
        data_dir = %config.data_dir.display(),
        "Loaded server configuration"
    );

    tokio::fs::create_dir_all(&config.data_dir)
        .await
        .expect("Failed to create data directory");

    // --- Start server ---
    let state = AppState::new(config.clone());
    let tasks = state.tasks.clone();
    serve(scan2cad_recon::app(state), &config, tasks).await;
}
