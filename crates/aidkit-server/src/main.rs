use aidkit_server::{bootstrap, cli::Cli, logging, router};
use anyhow::Result;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = bootstrap::load_config(&cli)?;
    logging::init(&config.logging);

    tracing::info!("aidkit v{} starting", env!("CARGO_PKG_VERSION"));

    let state = bootstrap::build_state(&config).await?;
    let app = router(state, &config.server.cors_origins);

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    tracing::info!("Listening on http://{}", config.server.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
    }
}
