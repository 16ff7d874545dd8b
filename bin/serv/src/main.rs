use lcf_api::{config::ApiConfig, state::ApiState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from .env and FLASHCARDS_* variables
    let config = ApiConfig::load()?;

    lcf_api::tracing::init_tracing(&config.env);

    let metrics_handle = if config.metrics_enabled {
        let handle = lcf_api::metrics::init_metrics()?;
        tracing::info!("Prometheus metrics exporter initialized");
        Some(handle)
    } else {
        None
    };

    // Open (and on first run seed) the card collection
    let state = ApiState::new(&config)?;

    let app = lcf_api::router::app(state, config.parsed_allowed_origins(), metrics_handle);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;

    tracing::info!(environment = %config.env, "Environment");
    tracing::info!(%address, "Server listening");
    if config.metrics_enabled {
        tracing::info!("  - Prometheus metrics at /metrics");
    }
    tracing::info!("  - Health check at /health, readiness at /health/ready");
    tracing::info!("  - Request ID tracing (X-Request-ID header)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
