//! Shared test harness for order store backends.
//!
//! Provides helpers for building test orders and the `order_store_tests!`
//! macro, which stamps out the store-contract test suite against any
//! [`OrderStore`] implementation.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod store_harness;
//!
//! use ordertrack::storage::InMemoryOrderStore;
//! use store_harness::*;
//!
//! order_store_tests!(InMemoryOrderStore::new());
//! ```
//!
//! # Generated tests
//!
//! ## Creation
//! - `create_seeds_single_pending_history_entry`
//! - `duplicate_serial_is_rejected_and_original_untouched`
//!
//! ## Lookup
//! - `get_nonexistent_returns_none`
//! - `find_by_serial_returns_the_matching_order`
//!
//! ## Update
//! - `update_without_status_change_keeps_history`
//! - `status_change_appends_single_entry_with_default_note`
//! - `status_change_records_supplied_notes`
//! - `idempotent_resubmission_refreshes_updated_at_only`
//! - `serial_change_to_taken_value_is_rejected`
//! - `serial_change_to_free_value_moves_the_order`
//! - `update_nonexistent_returns_not_found`
//!
//! ## Delete
//! - `delete_twice_returns_success_then_not_found`
//!
//! ## Query
//! - `query_filters_owner_and_search_newest_first`
//! - `query_all_sorts_newest_first`
//!
//! ## Concurrency
//! - `concurrent_same_status_updates_append_once`
//! - `concurrent_distinct_status_updates_append_once_each`

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use ordertrack::core::order::{Order, OrderUpdate};

/// A fixed order date, so assertions never depend on the wall clock.
pub fn fixed_order_date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

/// Build an order with the given serial number and owner.
pub fn sample_order(serial_number: &str, owner: &str) -> Order {
    Order::new(
        serial_number.to_string(),
        owner.to_string(),
        fixed_order_date(),
    )
}

/// Build an order whose creation timestamp is offset by `seconds`, for
/// deterministic sort-order assertions.
pub fn sample_order_at(serial_number: &str, owner: &str, seconds: i64) -> Order {
    let mut order = sample_order(serial_number, owner);
    let created_at = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap() + Duration::seconds(seconds);
    order.created_at = created_at;
    order.updated_at = created_at;
    order
}

/// An update that only changes the delivery status.
pub fn status_update(status: &str) -> OrderUpdate {
    OrderUpdate {
        delivery_status: Some(status.to_string()),
        ..OrderUpdate::default()
    }
}

/// Generate a full `OrderStore` conformance test suite.
///
/// `$factory` must be an expression that evaluates to an instance
/// implementing `OrderStore + Clone + 'static`. It is re-evaluated for
/// each test to ensure isolation, and may contain `.await` (each test body
/// is async).
#[macro_export]
macro_rules! order_store_tests {
    ($factory:expr) => {
        mod order_store_contract_tests {
            use super::*;
            use ordertrack::core::error::OrderError;
            use ordertrack::core::order::{INITIAL_STATUS, OrderUpdate};
            use ordertrack::core::query::OrderFilter;
            use ordertrack::core::store::OrderStore;
            use uuid::Uuid;

            // ==================================================================
            // Creation
            // ==================================================================

            #[tokio::test]
            async fn create_seeds_single_pending_history_entry() {
                let store = $factory;

                let created = store.insert(sample_order("SN-1", "alice")).await.unwrap();

                assert_eq!(created.delivery_status, INITIAL_STATUS);
                assert_eq!(created.history.len(), 1);
                assert_eq!(created.history[0].status, INITIAL_STATUS);
                assert_eq!(created.history[0].notes.as_deref(), Some("Order created"));
                assert_eq!(created.created_at, created.updated_at);

                let fetched = store.get(&created.id).await.unwrap();
                assert_eq!(fetched, Some(created));
            }

            #[tokio::test]
            async fn duplicate_serial_is_rejected_and_original_untouched() {
                let store = $factory;
                let original = store.insert(sample_order("SN-1", "alice")).await.unwrap();

                let result = store.insert(sample_order("SN-1", "bob")).await;
                match result {
                    Err(OrderError::DuplicateSerial { serial_number }) => {
                        assert_eq!(serial_number, "SN-1");
                    }
                    other => panic!("expected DuplicateSerial, got {:?}", other),
                }

                // First order must be left exactly as it was
                let fetched = store.get(&original.id).await.unwrap().unwrap();
                assert_eq!(fetched, original);
                assert_eq!(
                    store.query(&OrderFilter::all()).await.unwrap().len(),
                    1,
                    "the failed create must not have persisted anything"
                );
            }

            // ==================================================================
            // Lookup
            // ==================================================================

            #[tokio::test]
            async fn get_nonexistent_returns_none() {
                let store = $factory;
                let result = store.get(&Uuid::new_v4()).await.unwrap();
                assert!(result.is_none());
            }

            #[tokio::test]
            async fn find_by_serial_returns_the_matching_order() {
                let store = $factory;
                let created = store.insert(sample_order("SN-1", "alice")).await.unwrap();
                store.insert(sample_order("SN-2", "bob")).await.unwrap();

                let found = store.find_by_serial("SN-1").await.unwrap();
                assert_eq!(found.map(|o| o.id), Some(created.id));

                let missing = store.find_by_serial("SN-404").await.unwrap();
                assert!(missing.is_none());
            }

            // ==================================================================
            // Update
            // ==================================================================

            #[tokio::test]
            async fn update_without_status_change_keeps_history() {
                let store = $factory;
                let created = store.insert(sample_order("SN-1", "alice")).await.unwrap();

                let update = OrderUpdate {
                    owner: Some("bob".to_string()),
                    ..OrderUpdate::default()
                };
                let updated = store.update(&created.id, &update).await.unwrap();

                assert_eq!(updated.owner, "bob");
                assert_eq!(updated.history.len(), 1);
                assert_eq!(updated.delivery_status, INITIAL_STATUS);
                assert!(updated.updated_at > created.updated_at);
                assert_eq!(updated.created_at, created.created_at);
            }

            #[tokio::test]
            async fn status_change_appends_single_entry_with_default_note() {
                let store = $factory;
                let created = store.insert(sample_order("SN-1", "alice")).await.unwrap();

                let updated = store
                    .update(&created.id, &status_update("Shipped"))
                    .await
                    .unwrap();

                assert_eq!(updated.delivery_status, "Shipped");
                assert_eq!(updated.history.len(), 2);
                assert_eq!(updated.history[1].status, "Shipped");
                assert_eq!(
                    updated.history[1].notes.as_deref(),
                    Some("Status updated to Shipped")
                );
                assert!(updated.updated_at > created.updated_at);
            }

            #[tokio::test]
            async fn status_change_records_supplied_notes() {
                let store = $factory;
                let created = store.insert(sample_order("SN-1", "alice")).await.unwrap();

                let update = OrderUpdate {
                    delivery_status: Some("Delivered".to_string()),
                    notes: Some("Signed by recipient".to_string()),
                    ..OrderUpdate::default()
                };
                let updated = store.update(&created.id, &update).await.unwrap();

                assert_eq!(
                    updated.history[1].notes.as_deref(),
                    Some("Signed by recipient")
                );
            }

            #[tokio::test]
            async fn idempotent_resubmission_refreshes_updated_at_only() {
                let store = $factory;
                let created = store.insert(sample_order("SN-1", "alice")).await.unwrap();

                // Same values the record already has
                let update = OrderUpdate {
                    serial_number: Some("SN-1".to_string()),
                    owner: Some("alice".to_string()),
                    order_date: Some(fixed_order_date()),
                    delivery_status: Some(INITIAL_STATUS.to_string()),
                    notes: None,
                };
                let updated = store.update(&created.id, &update).await.unwrap();

                assert_eq!(updated.history.len(), created.history.len());
                assert_eq!(updated.created_at, created.created_at);
                assert!(updated.updated_at > created.updated_at);
            }

            #[tokio::test]
            async fn serial_change_to_taken_value_is_rejected() {
                let store = $factory;
                store.insert(sample_order("SN-1", "alice")).await.unwrap();
                let second = store.insert(sample_order("SN-2", "bob")).await.unwrap();

                let update = OrderUpdate {
                    serial_number: Some("SN-1".to_string()),
                    ..OrderUpdate::default()
                };
                let result = store.update(&second.id, &update).await;
                assert!(matches!(result, Err(OrderError::DuplicateSerial { .. })));

                // The rejected update must not have touched the record
                let fetched = store.get(&second.id).await.unwrap().unwrap();
                assert_eq!(fetched, second);
            }

            #[tokio::test]
            async fn serial_change_to_free_value_moves_the_order() {
                let store = $factory;
                let created = store.insert(sample_order("SN-1", "alice")).await.unwrap();

                let update = OrderUpdate {
                    serial_number: Some("SN-9".to_string()),
                    ..OrderUpdate::default()
                };
                let updated = store.update(&created.id, &update).await.unwrap();

                assert_eq!(updated.serial_number, "SN-9");
                assert_eq!(updated.history.len(), 1);
                assert!(store.find_by_serial("SN-1").await.unwrap().is_none());
                assert!(store.find_by_serial("SN-9").await.unwrap().is_some());
            }

            #[tokio::test]
            async fn update_nonexistent_returns_not_found() {
                let store = $factory;
                let result = store
                    .update(&Uuid::new_v4(), &status_update("Shipped"))
                    .await;
                assert!(matches!(result, Err(OrderError::NotFound { .. })));
            }

            // ==================================================================
            // Delete
            // ==================================================================

            #[tokio::test]
            async fn delete_twice_returns_success_then_not_found() {
                let store = $factory;
                let created = store.insert(sample_order("SN-1", "alice")).await.unwrap();

                store.delete(&created.id).await.unwrap();
                assert!(store.get(&created.id).await.unwrap().is_none());

                let result = store.delete(&created.id).await;
                assert!(matches!(result, Err(OrderError::NotFound { .. })));
            }

            // ==================================================================
            // Query
            // ==================================================================

            #[tokio::test]
            async fn query_filters_owner_and_search_newest_first() {
                let store = $factory;
                store
                    .insert(sample_order_at("SN-100", "alice", 0))
                    .await
                    .unwrap();
                store
                    .insert(sample_order_at("SN-200", "alice", 10))
                    .await
                    .unwrap();
                store
                    .insert(sample_order_at("XX-300", "alice", 20))
                    .await
                    .unwrap();
                store
                    .insert(sample_order_at("SN-400", "bob", 30))
                    .await
                    .unwrap();

                let filter = OrderFilter::all().with_owner("alice").with_search("sn-");
                let results = store.query(&filter).await.unwrap();

                let serials: Vec<&str> =
                    results.iter().map(|o| o.serial_number.as_str()).collect();
                assert_eq!(serials, vec!["SN-200", "SN-100"]);
            }

            #[tokio::test]
            async fn query_all_sorts_newest_first() {
                let store = $factory;
                store
                    .insert(sample_order_at("SN-1", "alice", 0))
                    .await
                    .unwrap();
                store
                    .insert(sample_order_at("SN-2", "bob", 10))
                    .await
                    .unwrap();
                store
                    .insert(sample_order_at("SN-3", "carol", 20))
                    .await
                    .unwrap();

                let results = store.query(&OrderFilter::all()).await.unwrap();

                let serials: Vec<&str> =
                    results.iter().map(|o| o.serial_number.as_str()).collect();
                assert_eq!(serials, vec!["SN-3", "SN-2", "SN-1"]);
            }

            // ==================================================================
            // Concurrency
            // ==================================================================

            #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
            async fn concurrent_same_status_updates_append_once() {
                let store = $factory;
                let created = store.insert(sample_order("SN-1", "alice")).await.unwrap();
                let id = created.id;

                let (a, b) = (store.clone(), store.clone());
                let first = tokio::spawn(async move { a.update(&id, &status_update("Shipped")).await });
                let second =
                    tokio::spawn(async move { b.update(&id, &status_update("Shipped")).await });

                first.await.unwrap().unwrap();
                second.await.unwrap().unwrap();

                let order = store.get(&id).await.unwrap().unwrap();
                assert_eq!(order.delivery_status, "Shipped");
                assert_eq!(
                    order.history.len(),
                    2,
                    "only the writer that saw Pending may append"
                );
            }

            #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
            async fn concurrent_distinct_status_updates_append_once_each() {
                let store = $factory;
                let created = store.insert(sample_order("SN-1", "alice")).await.unwrap();
                let id = created.id;

                let (a, b) = (store.clone(), store.clone());
                let first = tokio::spawn(async move { a.update(&id, &status_update("Shipped")).await });
                let second =
                    tokio::spawn(async move { b.update(&id, &status_update("Delivered")).await });

                first.await.unwrap().unwrap();
                second.await.unwrap().unwrap();

                let order = store.get(&id).await.unwrap().unwrap();
                assert_eq!(
                    order.history.len(),
                    3,
                    "both writers changed the status relative to what they read"
                );
                assert!(order.history.iter().any(|entry| entry.status == "Shipped"));
                assert!(order.history.iter().any(|entry| entry.status == "Delivered"));
            }
        }
    };
}
