//! HTTP transport: handlers, router assembly, and the server builder.

pub mod builder;
pub mod handlers;
pub mod router;

pub use builder::ServerBuilder;
pub use handlers::AppState;
pub use router::{build_cors_layer, build_health_routes, build_order_routes};
