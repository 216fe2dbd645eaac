use anyhow::{Context, Result};
use std::sync::Arc;
use suraksha::api::create_app_router;
use suraksha::config::SurakshaConfig;
use suraksha::registration::{QrFetcher, RegistrationFlow};
use suraksha::tracking::Dashboard;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "suraksha=info".into()),
        )
        .init();

    info!("Suraksha starting...");

    let config = SurakshaConfig::from_env().context("Invalid configuration")?;

    let dashboard = Arc::new(Dashboard::mount(&config.feeds));
    let flow = RegistrationFlow::from_config(&config.registration, &config.qr);
    let fetcher = QrFetcher::from_config(&config.qr)?;

    let app = create_app_router(Arc::clone(&dashboard), flow.clone(), fetcher);

    let listener = TcpListener::bind(&config.server.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind_addr))?;
    info!(addr = %config.server.bind_addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // Tear down: stop the feed timers and drop any in-flight registration
    flow.teardown();
    dashboard.unmount();
    info!("Suraksha stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
