//! Service entry point.
//!
//! Initializes logging, loads configuration (YAML file named by
//! `ORDERTRACK_CONFIG`, with environment overrides), constructs the
//! selected storage backend, and serves the HTTP API.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use ordertrack::config::{AppConfig, ENV_CONFIG, StorageConfig};
use ordertrack::server::ServerBuilder;
use ordertrack::storage::InMemoryOrderStore;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = load_config()?.apply_env_overrides();

    let builder = match &config.storage {
        StorageConfig::InMemory => {
            tracing::info!("using in-memory order store");
            ServerBuilder::new().with_store(InMemoryOrderStore::new())
        }
        StorageConfig::Mongo { uri, database } => mongo_builder(uri, database).await?,
    };

    let bind_addr = config.bind_addr.clone();
    tracing::info!("starting ordertrack on {}", bind_addr);
    builder.with_config(config).serve(&bind_addr).await
}

fn load_config() -> Result<AppConfig> {
    match std::env::var(ENV_CONFIG) {
        Ok(path) => {
            tracing::info!("loading configuration from {}", path);
            AppConfig::from_yaml_file(&path)
        }
        Err(_) => Ok(AppConfig::default()),
    }
}

#[cfg(feature = "mongodb_backend")]
async fn mongo_builder(uri: &str, database: &str) -> Result<ServerBuilder> {
    use ordertrack::storage::{MongoOrderStore, connection};

    let db = connection::shared(uri).database(database).await?;
    let store = MongoOrderStore::new(db);
    store.ensure_indexes().await?;
    tracing::info!("using MongoDB order store (database: {})", database);

    Ok(ServerBuilder::new().with_store(store))
}

#[cfg(not(feature = "mongodb_backend"))]
async fn mongo_builder(_uri: &str, _database: &str) -> Result<ServerBuilder> {
    anyhow::bail!("MongoDB storage configured but the 'mongodb_backend' feature is not enabled")
}
