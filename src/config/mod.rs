//! Configuration loading and management.
//!
//! Configuration is a YAML file plus environment-variable overrides, so a
//! bare deployment can run on environment variables alone (the bind
//! address and a MongoDB connection string are enough to go from the
//! in-memory default to durable storage).

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Environment variable naming the config file to load.
pub const ENV_CONFIG: &str = "ORDERTRACK_CONFIG";

/// Environment variable overriding the bind address.
pub const ENV_BIND: &str = "ORDERTRACK_BIND";

/// Environment variable overriding the MongoDB connection string.
/// Setting it switches the storage backend to MongoDB.
pub const ENV_MONGODB_URI: &str = "MONGODB_URI";

/// Environment variable overriding the MongoDB database name.
pub const ENV_MONGODB_DATABASE: &str = "MONGODB_DATABASE";

/// Database name used when MongoDB is selected via environment variable
/// without naming one.
const DEFAULT_DATABASE: &str = "order_tracker";

/// Top-level service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Address the HTTP server binds to.
    pub bind_addr: String,

    /// Origins allowed by CORS. Empty means any origin.
    pub allowed_origins: Vec<String>,

    /// Storage backend selection.
    pub storage: StorageConfig,
}

/// Storage backend selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "kebab-case")]
pub enum StorageConfig {
    /// Keep orders in process memory. Development and tests only; nothing
    /// survives a restart.
    InMemory,

    /// MongoDB-backed persistence.
    Mongo { uri: String, database: String },
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            allowed_origins: Vec::new(),
            storage: StorageConfig::InMemory,
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file.
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Apply environment-variable overrides on top of this configuration.
    ///
    /// `MONGODB_URI` switches the backend to MongoDB even when the file
    /// selected in-memory storage, keeping the database name from the file
    /// if one was configured.
    pub fn apply_env_overrides(mut self) -> Self {
        if let Ok(bind_addr) = std::env::var(ENV_BIND) {
            self.bind_addr = bind_addr;
        }

        if let Ok(uri) = std::env::var(ENV_MONGODB_URI) {
            let database = match self.storage {
                StorageConfig::Mongo { database, .. } => database,
                StorageConfig::InMemory => DEFAULT_DATABASE.to_string(),
            };
            self.storage = StorageConfig::Mongo { uri, database };
        }

        if let Ok(database) = std::env::var(ENV_MONGODB_DATABASE)
            && let StorageConfig::Mongo { uri, .. } = &self.storage
        {
            self.storage = StorageConfig::Mongo {
                uri: uri.clone(),
                database,
            };
        }

        self
    }
}
