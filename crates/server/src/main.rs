//! Cardbox server binary.

use anyhow::{Context, Result};
use cardbox_core::config::AppConfig;
use cardbox_server::{AppState, create_router};
use clap::Parser;
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Cardbox - a flashcard study service
#[derive(Parser, Debug)]
#[command(name = "cardboxd")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(
        short,
        long,
        env = "CARDBOX_CONFIG",
        default_value = "config/server.toml"
    )]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Startup banner
    tracing::info!("Cardbox v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration. The file is optional: every field has a default
    // and env vars (CARDBOX_SERVER__BIND=...) can provide or override
    // everything.
    let config_path = std::path::Path::new(&args.config);
    let mut figment = Figment::new();

    if config_path.exists() {
        tracing::info!(config_path = %args.config, "Loading configuration from file");
        figment = figment.merge(Toml::file(&args.config));
    } else {
        tracing::debug!("No config file found at {}", args.config);
    }

    let config: AppConfig = figment
        .merge(Env::prefixed("CARDBOX_").split("__"))
        .extract()
        .context("failed to load configuration")?;

    // Initialize media store
    let media = cardbox_storage::from_config(&config.media)
        .await
        .context("failed to initialize media store")?;
    media
        .health_check()
        .await
        .context("media store health check failed")?;
    tracing::info!("Media store initialized");

    // Initialize metadata store
    let metadata = cardbox_metadata::from_config(&config.metadata)
        .await
        .context("failed to initialize metadata store")?;
    tracing::info!("Metadata store initialized");

    // Create application state and router
    let bind = config.server.bind.clone();
    let state = AppState::new(config, metadata, media);
    let app = create_router(state);

    // Parse bind address
    let addr: SocketAddr = bind.parse().context("invalid bind address")?;

    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
