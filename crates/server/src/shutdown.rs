use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;

use crate::background::BackgroundTasks;
use crate::config::ServerConfig;

/// How long in-flight pipelines get to observe cancellation.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Bind, serve `app` until a termination signal, then drain `tasks`.
pub async fn serve(app: Router, config: &ServerConfig, tasks: BackgroundTasks) {
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!(
        running = tasks.len(),
        "Server stopped accepting connections, cancelling background tasks"
    );
    tasks.shutdown(SHUTDOWN_GRACE).await;

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
pub async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
