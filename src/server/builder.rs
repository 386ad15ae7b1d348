//! ServerBuilder for fluent API to build the HTTP server.

use anyhow::{Result, anyhow};
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::core::service::OrderService;
use crate::core::store::OrderStore;
use crate::server::handlers::AppState;
use crate::server::router::{build_cors_layer, build_health_routes, build_order_routes};

/// Builder for the order tracking HTTP server.
///
/// # Example
///
/// ```ignore
/// ServerBuilder::new()
///     .with_store(InMemoryOrderStore::new())
///     .serve("127.0.0.1:3000")
///     .await?;
/// ```
pub struct ServerBuilder {
    config: AppConfig,
    store: Option<Arc<dyn OrderStore>>,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder with the default configuration.
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
            store: None,
            custom_routes: Vec::new(),
        }
    }

    /// Use the given configuration (CORS origins, bind address).
    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the order store (required).
    pub fn with_store(mut self, store: impl OrderStore + 'static) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    /// Set an already-shared order store.
    pub fn with_shared_store(mut self, store: Arc<dyn OrderStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Add custom routes to the server.
    ///
    /// Use this for routes that don't fit the order CRUD pattern, such as
    /// metrics endpoints or webhooks.
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Build the axum router.
    pub fn build(self) -> Result<Router> {
        let store = self
            .store
            .ok_or_else(|| anyhow!("ServerBuilder requires a store (use with_store)"))?;
        let service = Arc::new(OrderService::new(store));
        let state = AppState { service };

        let mut app = build_health_routes().merge(build_order_routes(state));
        for routes in self.custom_routes {
            app = app.merge(routes);
        }

        Ok(app
            .layer(build_cors_layer(&self.config.allowed_origins))
            .layer(TraceLayer::new_for_http()))
    }

    /// Build the router and serve it on `addr` until the process exits.
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;

        let listener = TcpListener::bind(addr).await?;
        tracing::info!("listening on {}", addr);

        axum::serve(listener, app)
            .await
            .map_err(|e| anyhow!("server error: {}", e))
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
