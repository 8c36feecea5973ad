use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use kitten_exhibition_api::config::{AppConfig, StorageBackend};
use kitten_exhibition_api::database::{DatabaseManager, ExhibitionStore, MemoryStore, PgStore};
use kitten_exhibition_api::{app, AppState};

#[derive(Parser, Debug)]
#[command(name = "kitten-exhibition-api")]
#[command(about = "Kitten exhibition REST API server")]
#[command(version)]
struct Args {
    /// Port to listen on (overrides API_PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Storage backend: postgres or memory (overrides STORAGE_BACKEND)
    #[arg(short, long)]
    storage: Option<StorageBackend>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, SECURITY_JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("kitten_exhibition_api=info,tower_http=info")),
        )
        .init();

    let args = Args::parse();

    let mut config: AppConfig = kitten_exhibition_api::config::config().clone();
    if let Some(port) = args.port {
        config.api.port = port;
    }
    if let Some(storage) = args.storage {
        config.database.backend = storage;
    }
    config.validate().context("invalid configuration")?;

    tracing::info!(
        "Starting Kitten Exhibition API in {:?} mode with {:?} storage",
        config.environment,
        config.database.backend
    );

    let store: Arc<dyn ExhibitionStore> = match config.database.backend {
        StorageBackend::Postgres => {
            let pool = DatabaseManager::connect(&config.database)
                .await
                .context("failed to connect to database")?;
            if config.database.run_migrations {
                DatabaseManager::migrate(&pool).await.context("failed to run migrations")?;
            }
            Arc::new(PgStore::new(pool))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on shutdown");
            Arc::new(MemoryStore::new())
        }
    };

    let port = config.api.port;
    let state = AppState::new(store, config).context("failed to initialise token issuer")?;

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Kitten Exhibition API listening on http://{}", bind_addr);

    axum::serve(listener, app(state))
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
