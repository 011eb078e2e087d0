use anyhow::{anyhow, Context};
use playpen_server::config::Config;
use playpen_server::logging::init_logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = Config::from_env().map_err(|e| anyhow!(e))?;
    let store = playpen_server::open_store(&config)
        .await
        .context("failed to open snippet store")?;
    let backend = store.kind();

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        backend = %backend,
        "playpen-server listening on http://localhost:{}",
        config.port
    );

    playpen_server::serve(listener, store, shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
