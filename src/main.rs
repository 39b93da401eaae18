//! contact-book server binary
//!
//! Reads the YAML file named by `CONTACT_BOOK_CONFIG` (default
//! `contact-book.yaml`, defaults when missing), installs logging, picks the
//! store and serves until SIGINT or SIGTERM.

use anyhow::Result;
use contact_book::config::{AppConfig, CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH, StorageBackend};
use contact_book::core::ContactStore;
use contact_book::server::ServerBuilder;
use contact_book::storage::InMemoryContactStore;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = AppConfig::load(&path)?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!(
        config = %path,
        storage = ?config.storage,
        tokens = config.tokens.len(),
        "starting contact-book"
    );

    let store = open_store(&config).await?;

    ServerBuilder::new()
        .with_config(&config)
        .with_shared_store(store)
        .serve(&config.bind)
        .await
}

async fn open_store(config: &AppConfig) -> Result<Arc<dyn ContactStore>> {
    match config.storage {
        StorageBackend::Memory => Ok(Arc::new(InMemoryContactStore::new())),
        StorageBackend::Postgres => open_postgres(config).await,
    }
}

#[cfg(feature = "postgres")]
async fn open_postgres(config: &AppConfig) -> Result<Arc<dyn ContactStore>> {
    use contact_book::storage::{PostgresContactStore, postgres};

    let url = config
        .database_url
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("storage 'postgres' requires database_url"))?;
    let pool = postgres::connect(url).await?;
    tracing::info!("connected to PostgreSQL, migrations applied");
    Ok(Arc::new(PostgresContactStore::new(pool)))
}

#[cfg(not(feature = "postgres"))]
async fn open_postgres(_config: &AppConfig) -> Result<Arc<dyn ContactStore>> {
    anyhow::bail!("storage 'postgres' requires building with the `postgres` feature")
}
