use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use rota_core::config::StoreBackend;
use rota_gateway::app;
use rota_store::ScheduleStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rota_gateway=info,tower_http=debug".into()),
        )
        .init();

    // load config: explicit path via ROTA_CONFIG > ~/.rota/rota.toml.
    // No default credentials exist, so a missing auth section is fatal.
    let config_path = std::env::var("ROTA_CONFIG").ok();
    let config = rota_core::RotaConfig::load(config_path.as_deref())?;

    let bind = config.server.bind.clone();
    let port = config.server.port;

    let store = open_store(&config)?;
    let engine = rota_engine::ScheduleEngine::new(store);

    let state = Arc::new(app::AppState::new(config, engine));
    let router = app::build_router(state);

    let addr: SocketAddr = format!("{}:{}", bind, port).parse()?;
    info!("rota gateway listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}

/// Open the configured persistence backend.
///
/// The store lives for the whole process and is shared by every request
/// through the router state.
fn open_store(config: &rota_core::RotaConfig) -> anyhow::Result<Arc<dyn ScheduleStore>> {
    let path = &config.store.path;
    ensure_parent_dir(path)?;
    match config.store.backend {
        StoreBackend::Sqlite => {
            info!(path = %path, "opening SQLite schedule store");
            Ok(Arc::new(rota_store::SqliteStore::open(path)?))
        }
        StoreBackend::Json => {
            info!(path = %path, "opening JSON document schedule store");
            Ok(Arc::new(rota_store::JsonStore::open(path)))
        }
    }
}

/// Ensure the parent directory for a file path exists.
fn ensure_parent_dir(path: &str) -> anyhow::Result<()> {
    if let Some(parent) = std::path::Path::new(path).parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating store directory {}", parent.display()))?;
    }
    Ok(())
}
