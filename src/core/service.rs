//! Order lifecycle use-cases.

use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::OrderError;
use crate::core::order::{CreateOrderRequest, Order, OrderUpdate};
use crate::core::query::OrderFilter;
use crate::core::store::OrderStore;

/// Use-case layer sitting above an [`OrderStore`].
///
/// The service performs request-shape validation and delegation only. The
/// business invariants — serial-number uniqueness and the history-append
/// decision — live in the store, because both depend on comparing against
/// the persisted previous value, which only the store can read atomically
/// with its own write.
#[derive(Clone)]
pub struct OrderService {
    store: Arc<dyn OrderStore>,
}

impl OrderService {
    /// Create a service over the given store.
    pub fn new(store: Arc<dyn OrderStore>) -> Self {
        Self { store }
    }

    /// Create a new order in the initial `"Pending"` state.
    ///
    /// Requires `serial_number` and `owner` non-empty and `order_date`
    /// present.
    pub async fn create_order(&self, request: CreateOrderRequest) -> Result<Order, OrderError> {
        request
            .validate()
            .map_err(|e| OrderError::from_validator(&e))?;
        let order_date = request
            .order_date
            .ok_or_else(|| OrderError::validation("order_date", "is required"))?;

        let order = Order::new(request.serial_number, request.owner, order_date);
        let created = self.store.insert(order).await?;
        tracing::info!(id = %created.id, serial_number = %created.serial_number, "order created");
        Ok(created)
    }

    /// List orders matching `filter`, newest-created first.
    pub async fn list_orders(&self, filter: OrderFilter) -> Result<Vec<Order>, OrderError> {
        self.store.query(&filter).await
    }

    /// Fetch a single order by id.
    pub async fn get_order(&self, id: &Uuid) -> Result<Order, OrderError> {
        self.store
            .get(id)
            .await?
            .ok_or(OrderError::NotFound { id: *id })
    }

    /// Update an order.
    ///
    /// Supplied fields overwrite stored values; a delivery-status change
    /// appends a history entry. Present-but-empty required fields are
    /// rejected here so the store never sees them.
    pub async fn update_order(&self, id: &Uuid, update: OrderUpdate) -> Result<Order, OrderError> {
        update
            .validate()
            .map_err(|e| OrderError::from_validator(&e))?;
        self.store.update(id, &update).await
    }

    /// Delete an order permanently.
    pub async fn delete_order(&self, id: &Uuid) -> Result<(), OrderError> {
        self.store.delete(id).await?;
        tracing::info!(id = %id, "order deleted");
        Ok(())
    }
}
