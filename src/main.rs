use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use steam_mtx_relay::api;
use steam_mtx_relay::config::Config;
use steam_mtx_relay::constants::API_VERSION;
use steam_mtx_relay::integrations::SteamClient;
use steam_mtx_relay::server::build_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "steam_mtx_relay=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    config.validate()?;

    tracing::info!("Starting Steam microtransaction relay");
    tracing::info!("Environment: {}", config.environment);
    tracing::info!("API Version: {}", API_VERSION);
    if config.steam_use_sandbox {
        tracing::info!("Using the ISteamMicroTxnSandbox interface");
    }

    let steam = SteamClient::from_config(&config)
        .map_err(|e| anyhow::anyhow!("partner client init failed: {}", e))?;

    let app_state = api::AppState {
        steam,
        config: config.clone(),
    };

    let app = build_router(app_state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
