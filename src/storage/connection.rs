//! Process-wide cached MongoDB client.
//!
//! Short-lived execution environments pay a full connection handshake on
//! every cold start, so the client is created once per process and shared
//! by reference afterwards. A handle is only cached after the server
//! answered a ping, and [`SharedMongoClient::reset`] drops the cached
//! value, so a broken handle is never reused.

use mongodb::bson::doc;
use mongodb::{Client, Database};
use std::sync::OnceLock;
use tokio::sync::Mutex;

use crate::core::error::{OrderError, StorageError};

/// Lazily-initialized, shareable MongoDB client.
pub struct SharedMongoClient {
    uri: String,
    client: Mutex<Option<Client>>,
}

impl SharedMongoClient {
    /// Create an empty cache for the given connection string.
    ///
    /// No connection is attempted until the first [`get`](Self::get).
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            client: Mutex::new(None),
        }
    }

    /// Get the cached client, connecting and verifying on first use.
    pub async fn get(&self) -> Result<Client, OrderError> {
        let mut guard = self.client.lock().await;

        if let Some(client) = guard.as_ref() {
            return Ok(client.clone());
        }

        let client = Client::with_uri_str(&self.uri).await.map_err(|e| {
            StorageError::connection(format!("failed to create MongoDB client: {}", e))
        })?;

        // Verify before caching, so a handle that never worked is not kept.
        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| {
                StorageError::connection(format!("MongoDB ping failed: {}", e))
            })?;

        *guard = Some(client.clone());
        Ok(client)
    }

    /// Get a database handle from the cached client.
    pub async fn database(&self, name: &str) -> Result<Database, OrderError> {
        Ok(self.get().await?.database(name))
    }

    /// Drop the cached client so the next call reconnects.
    ///
    /// Call this after an operation failed in a way that suggests the
    /// connection itself is broken.
    pub async fn reset(&self) {
        *self.client.lock().await = None;
    }
}

static SHARED: OnceLock<SharedMongoClient> = OnceLock::new();

/// The process-wide client for `uri`, created on first call.
///
/// Later calls return the same handle and ignore `uri`; a process talks to
/// one cluster.
pub fn shared(uri: &str) -> &'static SharedMongoClient {
    SHARED.get_or_init(|| SharedMongoClient::new(uri))
}
