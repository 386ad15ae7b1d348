//! In-memory implementation of the order store for testing and development.
//!
//! Uses `RwLock<HashMap>` for thread-safe access. Every write operation
//! holds the map's write lock for its entire read-modify-write cycle, so
//! concurrent updates to the same order are serialized and the uniqueness
//! scan runs in the same critical section as the mutation it guards.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

use crate::core::error::{OrderError, StorageError};
use crate::core::order::{Order, OrderUpdate};
use crate::core::query::OrderFilter;
use crate::core::store::OrderStore;

/// In-memory order store.
#[derive(Clone, Default)]
pub struct InMemoryOrderStore {
    orders: Arc<RwLock<HashMap<Uuid, Order>>>,
}

impl InMemoryOrderStore {
    /// Create a new, empty in-memory store.
    pub fn new() -> Self {
        Self {
            orders: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    fn read_locked(&self) -> Result<RwLockReadGuard<'_, HashMap<Uuid, Order>>, OrderError> {
        self.orders
            .read()
            .map_err(|e| StorageError::operation(format!("failed to acquire read lock: {}", e)).into())
    }

    fn write_locked(&self) -> Result<RwLockWriteGuard<'_, HashMap<Uuid, Order>>, OrderError> {
        self.orders
            .write()
            .map_err(|e| StorageError::operation(format!("failed to acquire write lock: {}", e)).into())
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn insert(&self, order: Order) -> Result<Order, OrderError> {
        let mut orders = self.write_locked()?;

        if orders
            .values()
            .any(|existing| existing.serial_number == order.serial_number)
        {
            return Err(OrderError::DuplicateSerial {
                serial_number: order.serial_number,
            });
        }

        orders.insert(order.id, order.clone());
        Ok(order)
    }

    async fn get(&self, id: &Uuid) -> Result<Option<Order>, OrderError> {
        let orders = self.read_locked()?;
        Ok(orders.get(id).cloned())
    }

    async fn find_by_serial(&self, serial_number: &str) -> Result<Option<Order>, OrderError> {
        let orders = self.read_locked()?;
        Ok(orders
            .values()
            .find(|order| order.serial_number == serial_number)
            .cloned())
    }

    async fn query(&self, filter: &OrderFilter) -> Result<Vec<Order>, OrderError> {
        let orders = self.read_locked()?;

        let mut results: Vec<Order> = orders
            .values()
            .filter(|order| filter.matches(order))
            .cloned()
            .collect();
        results.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(results)
    }

    async fn update(&self, id: &Uuid, update: &OrderUpdate) -> Result<Order, OrderError> {
        let mut orders = self.write_locked()?;

        if !orders.contains_key(id) {
            return Err(OrderError::NotFound { id: *id });
        }

        if let Some(serial_number) = &update.serial_number
            && orders
                .values()
                .any(|other| &other.serial_number == serial_number && &other.id != id)
        {
            return Err(OrderError::DuplicateSerial {
                serial_number: serial_number.clone(),
            });
        }

        let order = orders
            .get_mut(id)
            .ok_or(OrderError::NotFound { id: *id })?;
        order.apply_update(update);
        Ok(order.clone())
    }

    async fn delete(&self, id: &Uuid) -> Result<(), OrderError> {
        let mut orders = self.write_locked()?;
        orders
            .remove(id)
            .map(|_| ())
            .ok_or(OrderError::NotFound { id: *id })
    }
}
