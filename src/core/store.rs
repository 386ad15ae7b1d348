//! Storage contract for order persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::error::OrderError;
use crate::core::order::{Order, OrderUpdate};
use crate::core::query::OrderFilter;

/// Persistence contract for orders.
///
/// Implementations own the two invariants that require visibility into
/// stored state:
///
/// - **Serial-number uniqueness.** `insert` and `update` must fail with
///   [`OrderError::DuplicateSerial`] when another order already holds the
///   serial number. Application-side existence checks are advisory only;
///   the backend's own constraint (a unique index, or a check performed
///   inside the write critical section) is the ultimate authority.
/// - **Atomic updates.** `update` performs a read-modify-write: load the
///   record, decide whether a history entry must be appended (the status
///   changed), merge the supplied fields, persist. Implementations must
///   close the check-then-act window against concurrent writers to the
///   same record — by holding a write lock across the whole cycle, or by
///   an optimistic version check that retries when the stored revision
///   advanced since the read.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persist a new order.
    ///
    /// Fails with [`OrderError::DuplicateSerial`] if an order with the same
    /// serial number already exists; the existing record is left untouched.
    async fn insert(&self, order: Order) -> Result<Order, OrderError>;

    /// Fetch an order by id. Returns `Ok(None)` when absent.
    async fn get(&self, id: &Uuid) -> Result<Option<Order>, OrderError>;

    /// Fetch an order by serial number. Returns `Ok(None)` when absent.
    async fn find_by_serial(&self, serial_number: &str) -> Result<Option<Order>, OrderError>;

    /// List orders matching `filter`, newest-created first.
    async fn query(&self, filter: &OrderFilter) -> Result<Vec<Order>, OrderError>;

    /// Load, merge, and persist an update.
    ///
    /// Fails with [`OrderError::NotFound`] if the order does not exist and
    /// [`OrderError::DuplicateSerial`] if a supplied serial number is held
    /// by a different order. Merge and history semantics are those of
    /// [`Order::apply_update`].
    async fn update(&self, id: &Uuid, update: &OrderUpdate) -> Result<Order, OrderError>;

    /// Remove an order permanently.
    ///
    /// Fails with [`OrderError::NotFound`] if the order does not exist.
    /// No cascading side effects.
    async fn delete(&self, id: &Uuid) -> Result<(), OrderError>;
}
