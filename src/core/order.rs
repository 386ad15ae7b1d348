//! The order record and its mutation rules.
//!
//! An [`Order`] is a tracked shipment keyed by a globally unique serial
//! number. Every change to its delivery status is captured as an immutable
//! [`HistoryEntry`]; the history only grows, is never reordered, and its
//! first entry always reflects the status the order was created with.
//!
//! The merge semantics for updates live in [`Order::apply_update`] so that
//! every storage backend shares one implementation of the field-overwrite
//! and history-append rules. Timestamp and revision maintenance happen in
//! the same place, keeping the `updated_at` contract visible and testable
//! instead of hidden in a persistence hook.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Delivery status assigned to every newly created order.
pub const INITIAL_STATUS: &str = "Pending";

/// Note recorded on the history entry that accompanies creation.
const CREATION_NOTE: &str = "Order created";

/// Immutable record of a past delivery-status value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// The delivery status that was set.
    pub status: String,

    /// When the status was recorded.
    pub timestamp: DateTime<Utc>,

    /// Optional free-form note attached to the change.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A tracked shipment order.
///
/// JSON wire format uses camelCase field names, which is also the shape
/// stored documents take in the MongoDB backend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Unique identifier, assigned at creation and never changed.
    pub id: Uuid,

    /// Globally unique serial number identifying the shipment.
    pub serial_number: String,

    /// Who the order belongs to.
    pub owner: String,

    /// When the order was placed.
    pub order_date: DateTime<Utc>,

    /// Current delivery state label. Open string, any value is accepted
    /// and recorded verbatim in history.
    pub delivery_status: String,

    /// When this record was created. Never mutated.
    pub created_at: DateTime<Utc>,

    /// When this record last changed. Refreshed on every successful update.
    pub updated_at: DateTime<Utc>,

    /// Mutation counter. Storage backends use it as the optimistic
    /// concurrency token for read-modify-write cycles.
    #[serde(default)]
    pub revision: u64,

    /// Append-only delivery-status history, insertion order preserved.
    pub history: Vec<HistoryEntry>,
}

impl Order {
    /// Create a new order in the initial `"Pending"` state.
    ///
    /// The history starts with a single entry reflecting the initial
    /// status, so it is non-empty from the moment the order exists.
    pub fn new(serial_number: String, owner: String, order_date: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            serial_number,
            owner,
            order_date,
            delivery_status: INITIAL_STATUS.to_string(),
            created_at: now,
            updated_at: now,
            revision: 0,
            history: vec![HistoryEntry {
                status: INITIAL_STATUS.to_string(),
                timestamp: now,
                notes: Some(CREATION_NOTE.to_string()),
            }],
        }
    }

    /// Apply an update to this order in place.
    ///
    /// Semantics:
    /// - A history entry is appended if and only if `delivery_status` is
    ///   supplied and differs from the current value. The entry carries the
    ///   supplied `notes`, or `"Status updated to <status>"` when absent.
    /// - Each supplied field overwrites the stored value; absent fields are
    ///   left unchanged. Presence decides, not truthiness — an explicitly
    ///   supplied value always wins.
    /// - `updated_at` is refreshed and `revision` incremented on every call,
    ///   whether or not any field actually changed.
    ///
    /// Returns `true` when the delivery status changed.
    pub fn apply_update(&mut self, update: &OrderUpdate) -> bool {
        let now = Utc::now();
        let mut status_changed = false;

        if let Some(status) = &update.delivery_status
            && status != &self.delivery_status
        {
            let notes = update
                .notes
                .clone()
                .unwrap_or_else(|| format!("Status updated to {}", status));
            self.history.push(HistoryEntry {
                status: status.clone(),
                timestamp: now,
                notes: Some(notes),
            });
            status_changed = true;
        }

        if let Some(serial_number) = &update.serial_number {
            self.serial_number = serial_number.clone();
        }
        if let Some(owner) = &update.owner {
            self.owner = owner.clone();
        }
        if let Some(order_date) = &update.order_date {
            self.order_date = *order_date;
        }
        if let Some(delivery_status) = &update.delivery_status {
            self.delivery_status = delivery_status.clone();
        }

        self.updated_at = now;
        self.revision += 1;
        status_changed
    }
}

/// Request body for creating an order.
///
/// `serial_number` and `owner` must be non-empty; `order_date` must be
/// present. Missing string fields deserialize to `""` and are rejected by
/// validation rather than by a deserialization failure, so the caller gets
/// a field-level error instead of a generic body rejection.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateOrderRequest {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub serial_number: String,

    #[validate(length(min = 1, message = "must not be empty"))]
    pub owner: String,

    #[validate(required(message = "is required"))]
    pub order_date: Option<DateTime<Utc>>,
}

/// Partial update for an order.
///
/// Every field is optional; absent fields keep their stored value. `notes`
/// only takes effect together with a delivery-status change, where it
/// becomes the note on the appended history entry.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderUpdate {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub serial_number: Option<String>,

    #[validate(length(min = 1, message = "must not be empty"))]
    pub owner: Option<String>,

    pub order_date: Option<DateTime<Utc>>,

    #[validate(length(min = 1, message = "must not be empty"))]
    pub delivery_status: Option<String>,

    pub notes: Option<String>,
}
