#![deny(
    clippy::expect_used,
    clippy::panic,
    clippy::print_stdout,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used
)]

use std::{net::SocketAddr, sync::Arc};

use raffle_api::{
    config::Config,
    directory::{DirectorySettings, WhopDirectory},
    http::{self, RaffleState},
    whop::{HttpWhopClient, WhopApiError},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load and validate configuration first (fail-fast)
    let config = Config::load().map_err(|e| anyhow::anyhow!("{e}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.level))
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "raffle-api starting up");

    let state = match HttpWhopClient::from_config(&config.whop) {
        Ok(client) => {
            tracing::info!(
                base_url = %config.whop.base_url,
                company_id = config.whop.company_id.as_deref().unwrap_or(""),
                "Whop client configured"
            );
            let settings = DirectorySettings::from_config(&config.directory, &config.whop);
            RaffleState::new(Arc::new(WhopDirectory::new(client, settings)))
        }
        Err(WhopApiError::MissingApiKey) => {
            tracing::warn!(
                "Whop API key not configured - directory requests will fail until RAFFLE_WHOP__API_KEY is set"
            );
            RaffleState::unconfigured()
        }
        Err(e) => return Err(e.into()),
    };

    let app = http::app(state, &config.cors, &config.security_headers);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}
