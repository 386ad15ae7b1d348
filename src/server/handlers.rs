//! HTTP handlers for order operations.
//!
//! Handlers are thin: extract, delegate to the [`OrderService`], serialize.
//! Every failure path returns a typed [`OrderError`], which carries its own
//! status code and JSON body.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::OrderError;
use crate::core::order::{CreateOrderRequest, Order, OrderUpdate};
use crate::core::query::ListParams;
use crate::core::service::OrderService;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<OrderService>,
}

/// Response body for a successful delete.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
}

/// `GET /orders` — list orders, newest-created first.
///
/// Accepts `owner` (exact match, `"All"` disables) and `search`
/// (case-insensitive substring against the serial number).
pub async fn list_orders(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Order>>, OrderError> {
    let orders = state.service.list_orders(params.into()).await?;
    Ok(Json(orders))
}

/// `POST /orders` — create a new order in the `"Pending"` state.
pub async fn create_order(
    State(state): State<AppState>,
    Json(request): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<Order>), OrderError> {
    let order = state.service.create_order(request).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// `GET /orders/{id}` — fetch a single order.
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Order>, OrderError> {
    let order = state.service.get_order(&id).await?;
    Ok(Json(order))
}

/// `PUT /orders/{id}` — merge the supplied fields into the order.
///
/// A delivery-status change appends a history entry; other changes do not.
pub async fn update_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<OrderUpdate>,
) -> Result<Json<Order>, OrderError> {
    let order = state.service.update_order(&id, update).await?;
    Ok(Json(order))
}

/// `DELETE /orders/{id}` — remove the order permanently.
pub async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResponse>, OrderError> {
    state.service.delete_order(&id).await?;
    Ok(Json(DeleteResponse {
        message: "Order deleted".to_string(),
    }))
}

/// Health check endpoint handler.
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "ordertrack"
    }))
}
