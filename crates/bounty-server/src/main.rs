//! Binary entrypoint for the bounty program HTTP server.
//!
//! Configuration comes from environment variables, see [`ServerConfig`].
//! The store is opened before the listener binds and closed after graceful
//! shutdown completes.

use bounty_server::config::ServerConfig;
use bounty_server::logging::init_logging;
use bounty_server::router::build_router;
use bounty_server::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    init_logging("info");

    let config = ServerConfig::from_env()?;
    let state = AppState::new(&config.db_path)?;
    tracing::info!(db_path = %config.db_path, "store opened");

    let app = build_router(state.clone());

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("bounty server starting on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.service.close()?;
    tracing::info!("store closed, shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
