//! ToolScout Server - REST API for the photo-first facility tool inventory
//!
//! Registers tools with reference photos, finds them again from a new
//! snapshot via 64-bit fingerprint similarity, and keeps the usual
//! inventory bookkeeping around it.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use toolscout_server::db::InventoryStore;
use toolscout_server::routes::create_router_with_config;
use toolscout_server::state::AppState;
use toolscout_server::storage::ImageStore;
use toolscout_server::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("toolscout_server=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env();

    let store = match &config.database_url {
        Some(url) => {
            let store = InventoryStore::connect(
                url,
                config.database_max_connections,
                config.database_min_connections,
            )
            .await?;
            Some(Arc::new(store))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; running without an inventory store");
            None
        }
    };

    let images = Arc::new(ImageStore::new(config.upload_dir.clone())?);

    let state = AppState {
        store,
        images,
        max_file_size: config.max_file_size_mb * 1024 * 1024,
    };

    let app = create_router_with_config(&config, state);

    let addr = config.socket_addr();
    tracing::info!("Listening on http://{}", addr);
    tracing::info!("API docs at http://{}/docs", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutdown signal received");
}
