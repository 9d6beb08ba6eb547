use reloop_server::{build_router, telemetry, AppState, ServerConfig};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::load()?;
    telemetry::init(config.log_format);

    let state = AppState::from_config(&config)?;
    let app = build_router(state, config.max_upload_bytes);

    let listener = TcpListener::bind(config.bind).await?;
    tracing::info!(
        "Reloop server listening on {} (scratch dir {})",
        config.bind,
        config.receipts_dir.display()
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
