use std::net::SocketAddr;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use city_info_api::config::AppConfig;
use city_info_api::database::DatabaseManager;
use city_info_api::{app, AppState};

#[derive(Parser)]
#[command(name = "city-info-api")]
#[command(about = "City and point of interest API server")]
#[command(version)]
struct Cli {
    #[arg(long, help = "Address to bind (overrides SERVER_HOST)")]
    host: Option<String>,

    #[arg(long, help = "Port to listen on (overrides SERVER_PORT)")]
    port: Option<u16>,

    #[arg(long, help = "`memory` or a sqlite: URL (overrides DATABASE_URL)")]
    database_url: Option<String>,

    #[arg(long, help = "Insert sample cities when the store is empty")]
    seed: Option<bool>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so DATABASE_URL, SECURITY_JWT_SECRET etc. apply
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let mut config = AppConfig::from_env();
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(url) = cli.database_url {
        config.database.url = url;
    }
    if let Some(seed) = cli.seed {
        config.database.seed_data = seed;
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.default_log_filter())),
        )
        .init();

    config.validate().context("invalid configuration")?;
    tracing::info!("Starting city info API in {:?} mode", config.environment);

    let repository = DatabaseManager::connect(&config.database)
        .await
        .context("failed to open the city store")?;

    let bind_addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| format!("invalid bind address {}:{}", config.server.host, config.server.port))?;
    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("City info API listening on http://{}", bind_addr);

    axum::serve(listener, app(AppState::new(config, repository)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("Shutting down");
}
