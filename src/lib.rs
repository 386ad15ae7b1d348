//! # OrderTrack
//!
//! A shipment order tracking service built around an append-only
//! delivery-status history.
//!
//! ## Features
//!
//! - **Unique serial numbers**: exactly one live order per serial number,
//!   enforced by the storage backend under concurrent writers
//! - **Append-only history**: every delivery-status change is recorded as
//!   an immutable entry; history only grows and is never reordered
//! - **Presence-based updates**: supplied fields overwrite, absent fields
//!   keep their stored value
//! - **Swappable storage**: in-memory by default, MongoDB behind the
//!   `mongodb_backend` feature flag
//! - **Thin HTTP transport**: axum routes with CORS and request tracing
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ordertrack::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     ServerBuilder::new()
//!         .with_store(InMemoryOrderStore::new())
//!         .serve("127.0.0.1:3000")
//!         .await
//! }
//! ```

pub mod config;
pub mod core;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits.
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        error::{ErrorResponse, OrderError, StorageError},
        order::{CreateOrderRequest, HistoryEntry, INITIAL_STATUS, Order, OrderUpdate},
        query::{ListParams, OWNER_ALL, OrderFilter},
        service::OrderService,
        store::OrderStore,
    };

    // === Config ===
    pub use crate::config::{AppConfig, StorageConfig};

    // === Server ===
    pub use crate::server::{AppState, ServerBuilder};

    // === Storage ===
    pub use crate::storage::InMemoryOrderStore;
    #[cfg(feature = "mongodb_backend")]
    pub use crate::storage::{MongoOrderStore, SharedMongoClient};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
    pub use uuid::Uuid;
}
