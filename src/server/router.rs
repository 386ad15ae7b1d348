//! Router assembly for the order API.

use axum::Router;
use axum::http::{HeaderValue, Method, header};
use axum::routing::get;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::server::handlers::{self, AppState};

/// Build the order CRUD routes:
/// - `GET /orders` — list with `owner`/`search` filters
/// - `POST /orders` — create
/// - `GET /orders/{id}` — fetch
/// - `PUT /orders/{id}` — update
/// - `DELETE /orders/{id}` — delete
pub fn build_order_routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/orders",
            get(handlers::list_orders).post(handlers::create_order),
        )
        .route(
            "/orders/{id}",
            get(handlers::get_order)
                .put(handlers::update_order)
                .delete(handlers::delete_order),
        )
        .with_state(state)
}

/// Build health check routes.
pub fn build_health_routes() -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/healthz", get(handlers::health_check))
}

/// Build the CORS layer from the configured allowed origins.
///
/// An empty list is permissive (any origin), which keeps local development
/// working without a config file. Origins that fail to parse as header
/// values are skipped.
pub fn build_cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origin = if allowed_origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(
            allowed_origins
                .iter()
                .filter_map(|origin| origin.parse::<HeaderValue>().ok()),
        )
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}
