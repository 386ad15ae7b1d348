//! Core domain: the order record, its lifecycle rules, and the storage
//! contract they sit on.

pub mod error;
pub mod order;
pub mod query;
pub mod service;
pub mod store;

pub use error::{ErrorResponse, OrderError, StorageError};
pub use order::{CreateOrderRequest, HistoryEntry, INITIAL_STATUS, Order, OrderUpdate};
pub use query::{ListParams, OWNER_ALL, OrderFilter};
pub use service::OrderService;
pub use store::OrderStore;
