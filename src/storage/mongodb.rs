//! MongoDB storage backend using the official MongoDB async driver.
//!
//! Provides [`MongoOrderStore`], an [`OrderStore`] backed by a
//! `mongodb::Database`.
//!
//! # Feature flag
//!
//! This module is gated behind the `mongodb_backend` feature flag:
//! ```toml
//! [dependencies]
//! ordertrack = { version = "0.1", features = ["mongodb_backend"] }
//! ```
//!
//! # Storage model
//!
//! All orders live in a single `orders` collection. A unique index on
//! `serialNumber` (created by [`MongoOrderStore::ensure_indexes`]) is the
//! authoritative enforcement of the uniqueness invariant: application-side
//! existence checks are advisory, and a duplicate-key write failure
//! (server code 11000) is translated into
//! [`OrderError::DuplicateSerial`] on both insert and update.
//!
//! # Concurrency
//!
//! Updates use a per-record optimistic version check. The record is loaded,
//! the merge applied in memory, and the replacement filtered on
//! `{_id, revision}` with the revision seen at load time. A replacement
//! that matches nothing means a concurrent writer advanced the record (or
//! deleted it); the cycle retries from the load, a bounded number of times.
//!
//! # Serialization strategy
//!
//! Orders are serialized via `serde_json::Value` as an intermediate format,
//! then converted to BSON documents. This keeps UUIDs stored as strings and
//! timestamps as ISO 8601 strings. The `id` field is mapped to MongoDB's
//! `_id` convention.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{Bson, Document, doc};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::IndexOptions;
use mongodb::{Database, IndexModel};
use uuid::Uuid;

use crate::core::error::{OrderError, StorageError};
use crate::core::order::{Order, OrderUpdate};
use crate::core::query::OrderFilter;
use crate::core::store::OrderStore;

/// Collection holding all order documents.
const COLLECTION: &str = "orders";

/// MongoDB server error code for a unique-index violation.
const DUPLICATE_KEY_CODE: i32 = 11000;

/// How many times an optimistic update retries after losing a write race.
const UPDATE_RETRY_LIMIT: usize = 5;

// ---------------------------------------------------------------------------
// Conversion helpers
// ---------------------------------------------------------------------------

/// Convert a serde_json::Value (expected to be an Object) into a BSON
/// Document, renaming `id` → `_id` for MongoDB convention.
fn json_to_document(json: serde_json::Value) -> Result<Document, OrderError> {
    let bson_val = mongodb::bson::to_bson(&json)
        .map_err(|e| StorageError::serialization(format!("failed to convert JSON to BSON: {}", e)))?;

    let mut doc = match bson_val {
        Bson::Document(d) => d,
        _ => {
            return Err(
                StorageError::serialization("expected BSON document, got non-object").into(),
            );
        }
    };

    if let Some(id) = doc.remove("id") {
        doc.insert("_id", id);
    }

    Ok(doc)
}

/// Convert a BSON Document back into a serde_json::Value, renaming
/// `_id` → `id` for the domain convention.
fn document_to_json(mut doc: Document) -> serde_json::Value {
    if let Some(id) = doc.remove("_id") {
        doc.insert("id", id);
    }

    Bson::Document(doc).into_relaxed_extjson()
}

/// Convert a UUID to its BSON string representation for queries.
fn uuid_bson(id: &Uuid) -> Bson {
    Bson::String(id.to_string())
}

fn order_to_document(order: &Order) -> Result<Document, OrderError> {
    let json = serde_json::to_value(order)
        .map_err(|e| StorageError::serialization(format!("failed to serialize order: {}", e)))?;
    json_to_document(json)
}

fn document_to_order(doc: Document) -> Result<Order, OrderError> {
    let json = document_to_json(doc);
    serde_json::from_value(json).map_err(|e| {
        StorageError::serialization(format!("failed to deserialize order from document: {}", e))
            .into()
    })
}

/// Whether a MongoDB error is a unique-index violation.
fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => {
            write_error.code == DUPLICATE_KEY_CODE
        }
        ErrorKind::Command(command_error) => command_error.code == DUPLICATE_KEY_CODE,
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// MongoOrderStore
// ---------------------------------------------------------------------------

/// Order storage backed by MongoDB.
///
/// # Example
///
/// ```rust,ignore
/// use mongodb::Client;
/// use ordertrack::storage::MongoOrderStore;
///
/// let client = Client::with_uri_str("mongodb://localhost:27017").await?;
/// let store = MongoOrderStore::new(client.database("order_tracker"));
/// store.ensure_indexes().await?;
/// ```
#[derive(Clone, Debug)]
pub struct MongoOrderStore {
    database: Database,
}

impl MongoOrderStore {
    /// Create a new `MongoOrderStore` with the given database handle.
    pub fn new(database: Database) -> Self {
        Self { database }
    }

    /// Get a reference to the underlying database.
    pub fn database(&self) -> &Database {
        &self.database
    }

    fn collection(&self) -> mongodb::Collection<Document> {
        self.database.collection(COLLECTION)
    }

    /// Create the unique serial-number index.
    ///
    /// Call once at startup. The index is what actually guarantees
    /// uniqueness under concurrent writers; without it the store's
    /// pre-checks are only best effort.
    pub async fn ensure_indexes(&self) -> Result<(), OrderError> {
        let index = IndexModel::builder()
            .keys(doc! { "serialNumber": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        self.collection().create_index(index).await.map_err(|e| {
            StorageError::operation(format!("failed to create serial-number index: {}", e))
        })?;

        Ok(())
    }
}

#[async_trait]
impl OrderStore for MongoOrderStore {
    /// Insert a new order and read it back to return the stored version.
    async fn insert(&self, order: Order) -> Result<Order, OrderError> {
        let doc = order_to_document(&order)?;

        match self.collection().insert_one(doc).await {
            Ok(_) => {}
            Err(e) if is_duplicate_key(&e) => {
                return Err(OrderError::DuplicateSerial {
                    serial_number: order.serial_number,
                });
            }
            Err(e) => {
                return Err(
                    StorageError::operation(format!("failed to insert order: {}", e)).into(),
                );
            }
        }

        let stored = self
            .collection()
            .find_one(doc! { "_id": uuid_bson(&order.id) })
            .await
            .map_err(|e| {
                StorageError::operation(format!("failed to read back created order: {}", e))
            })?
            .ok_or_else(|| StorageError::operation("order not found after insert"))?;

        document_to_order(stored)
    }

    async fn get(&self, id: &Uuid) -> Result<Option<Order>, OrderError> {
        let doc = self
            .collection()
            .find_one(doc! { "_id": uuid_bson(id) })
            .await
            .map_err(|e| StorageError::operation(format!("failed to get order: {}", e)))?;

        match doc {
            Some(d) => Ok(Some(document_to_order(d)?)),
            None => Ok(None),
        }
    }

    async fn find_by_serial(&self, serial_number: &str) -> Result<Option<Order>, OrderError> {
        let doc = self
            .collection()
            .find_one(doc! { "serialNumber": serial_number })
            .await
            .map_err(|e| {
                StorageError::operation(format!("failed to find order by serial number: {}", e))
            })?;

        match doc {
            Some(d) => Ok(Some(document_to_order(d)?)),
            None => Ok(None),
        }
    }

    /// List matching orders, newest-created first.
    ///
    /// The filter is evaluated server-side: exact match on `owner`,
    /// case-insensitive substring (escaped `$regex`) on `serialNumber`.
    async fn query(&self, filter: &OrderFilter) -> Result<Vec<Order>, OrderError> {
        let mut query = Document::new();
        if let Some(owner) = &filter.owner {
            query.insert("owner", owner.as_str());
        }
        if let Some(search) = &filter.search {
            query.insert(
                "serialNumber",
                doc! { "$regex": regex::escape(search), "$options": "i" },
            );
        }

        let cursor = self
            .collection()
            .find(query)
            .sort(doc! { "createdAt": -1 })
            .await
            .map_err(|e| StorageError::operation(format!("failed to list orders: {}", e)))?;

        let docs: Vec<Document> = cursor
            .try_collect()
            .await
            .map_err(|e| StorageError::operation(format!("failed to collect orders: {}", e)))?;

        docs.into_iter().map(document_to_order).collect()
    }

    /// Optimistic read-modify-write, retried while the stored revision
    /// keeps advancing under us.
    async fn update(&self, id: &Uuid, update: &OrderUpdate) -> Result<Order, OrderError> {
        for _ in 0..UPDATE_RETRY_LIMIT {
            let Some(mut order) = self.get(id).await? else {
                return Err(OrderError::NotFound { id: *id });
            };

            // Advisory pre-check; the unique index has the final word.
            if let Some(serial_number) = &update.serial_number
                && serial_number != &order.serial_number
                && let Some(existing) = self.find_by_serial(serial_number).await?
                && existing.id != *id
            {
                return Err(OrderError::DuplicateSerial {
                    serial_number: serial_number.clone(),
                });
            }

            let loaded_revision = order.revision;
            order.apply_update(update);
            let doc = order_to_document(&order)?;

            let filter = doc! {
                "_id": uuid_bson(id),
                "revision": loaded_revision as i64,
            };
            match self.collection().replace_one(filter, doc).await {
                Ok(result) if result.matched_count > 0 => return Ok(order),
                // The record advanced (or vanished) since the read.
                Ok(_) => continue,
                Err(e) if is_duplicate_key(&e) => {
                    return Err(OrderError::DuplicateSerial {
                        serial_number: order.serial_number,
                    });
                }
                Err(e) => {
                    return Err(
                        StorageError::operation(format!("failed to update order: {}", e)).into(),
                    );
                }
            }
        }

        Err(StorageError::Contention { id: *id }.into())
    }

    async fn delete(&self, id: &Uuid) -> Result<(), OrderError> {
        let result = self
            .collection()
            .delete_one(doc! { "_id": uuid_bson(id) })
            .await
            .map_err(|e| StorageError::operation(format!("failed to delete order: {}", e)))?;

        if result.deleted_count == 0 {
            return Err(OrderError::NotFound { id: *id });
        }

        Ok(())
    }
}
