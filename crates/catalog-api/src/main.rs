//! Catalog API - read-only HTTP access to the latest scraped product export
//!
//! Serves the products of the freshest export in the configured collection,
//! filtered, simplified, or arranged into a category tree.

mod config;
mod error;
mod server;
mod types;

use crate::config::{Config, StoreBackend};
use crate::error::Result;
use crate::server::{start_server, ServerState, SharedState};
use object_store_gateway::{FsObjectStore, HttpObjectStore, ObjectStore};
use product_catalog::CatalogCache;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let env_filter = EnvFilter::from_default_env().add_directive("catalog_api=info".parse()?);

    // Use JSON format for Cloud Logging when LOG_FORMAT=json
    if std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false)
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_stackdriver::layer())
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    };

    info!("Starting catalog API...");

    let config = Config::from_env()?;
    info!("Port: {}", config.port);
    info!("Collection: {}", config.catalog.collection);
    info!(
        "Cache policy: snapshot {:?}, products {:?}",
        config.catalog.snapshot_policy, config.catalog.products_policy
    );

    let store: Arc<dyn ObjectStore> = match &config.store {
        StoreBackend::Filesystem { root } => {
            info!("Store: filesystem at {:?}", root);
            Arc::new(FsObjectStore::new(root.clone()))
        }
        StoreBackend::Http { base_url } => {
            info!("Store: HTTP bucket at {}", base_url);
            Arc::new(HttpObjectStore::new(base_url, config.catalog.fetch_timeout)?)
        }
    };

    let catalog = CatalogCache::new(store, config.catalog);
    let state: SharedState = Arc::new(ServerState::new(catalog));

    // Start HTTP server (blocking)
    start_server(state, config.port).await?;

    Ok(())
}
