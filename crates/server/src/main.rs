use std::sync::Arc;

use anyhow::Context;
use reelscope_catalog::TmdbClient;
use reelscope_server::config::ServerConfig;
use reelscope_server::state::AppState;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = ServerConfig::from_env().context("invalid configuration")?;

    // A missing credential is reported per request (500) instead of at boot.
    if config.catalog.credential.is_none() {
        warn!("neither TMDB_ACCESS_TOKEN nor TMDB_API_KEY is set; catalog requests will fail");
    }
    info!(
        base_url = %config.catalog.base_url,
        language = %config.settings.language,
        timeout_secs = config.catalog.timeout.as_secs(),
        "catalog client configured"
    );

    let client = TmdbClient::new(&config.catalog).context("failed to build HTTP client")?;
    let state = AppState::new(Arc::new(client), config.settings);

    let app = reelscope_server::routes::build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .context("failed to bind")?;
    info!(addr = %config.bind_addr, "server listening");

    axum::serve(listener, app).await?;
    Ok(())
}
