//! ServerBuilder for fluent API to build HTTP servers

use super::auth::require_principal;
use crate::config::AppConfig;
use crate::core::auth::{AuthProvider, StaticTokenProvider};
use crate::core::store::ContactStore;
use crate::docs::openapi_for;
use crate::entities::{AppState, address, contact};
use anyhow::{Result, anyhow};
use axum::{Json, Router, middleware, routing::get};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Builder for the contact-book HTTP application
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_store(InMemoryContactStore::new())
///     .with_auth_provider(StaticTokenProvider::new().with_token("t", user_id))
///     .build()?;
/// ```
pub struct ServerBuilder {
    store: Option<Arc<dyn ContactStore>>,
    auth_provider: Option<Arc<dyn AuthProvider>>,
    base_path: String,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder
    pub fn new() -> Self {
        Self {
            store: None,
            auth_provider: None,
            base_path: AppConfig::default().base_path,
            custom_routes: Vec::new(),
        }
    }

    /// Set the contact store (required)
    pub fn with_store(self, store: impl ContactStore + 'static) -> Self {
        self.with_shared_store(Arc::new(store))
    }

    /// Set an already shared contact store
    pub fn with_shared_store(mut self, store: Arc<dyn ContactStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the auth provider (required)
    pub fn with_auth_provider(mut self, provider: impl AuthProvider + 'static) -> Self {
        self.auth_provider = Some(Arc::new(provider));
        self
    }

    /// Prefix every resource route with `base_path`
    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    /// Take the base path and the token table from configuration
    pub fn with_config(self, config: &AppConfig) -> Self {
        let provider = StaticTokenProvider::from_config(config);
        if provider.is_empty() {
            tracing::warn!("no tokens configured; every request will be rejected with 401");
        } else {
            tracing::debug!(tokens = provider.len(), "loaded static tokens");
        }
        self.with_base_path(config.base_path.clone())
            .with_auth_provider(provider)
    }

    /// Add routes outside the base path and outside authentication
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Build the final router
    ///
    /// Layout:
    /// - `{base_path}/contacts...` behind the auth middleware
    /// - `{base_path}/openapi.json` unauthenticated
    /// - `/health` unauthenticated
    pub fn build(self) -> Result<Router> {
        let store = self
            .store
            .ok_or_else(|| anyhow!("ContactStore is required. Call .with_store()"))?;
        let auth_provider = self
            .auth_provider
            .ok_or_else(|| anyhow!("AuthProvider is required. Call .with_auth_provider()"))?;
        if !self.base_path.starts_with('/') {
            return Err(anyhow!(
                "base path must start with '/', got {:?}",
                self.base_path
            ));
        }

        let state = AppState::new(store);
        let protected = contact::routes(state.clone())
            .merge(address::routes(state))
            .route_layer(middleware::from_fn_with_state(auth_provider, require_principal));

        let base_path = self.base_path.trim_end_matches('/');
        let api = docs_routes(base_path).merge(protected);

        let mut app = if base_path.is_empty() {
            api
        } else {
            Router::new().nest(base_path, api)
        };
        app = app.merge(health_routes());
        for custom_router in self.custom_routes {
            app = app.merge(custom_router);
        }

        tracing::debug!(
            base_path = if base_path.is_empty() { "/" } else { base_path },
            "router built"
        );
        Ok(app.layer(TraceLayer::new_for_http()))
    }

    /// Serve the application with graceful shutdown
    ///
    /// This will:
    /// - Bind to the provided address
    /// - Start serving requests
    /// - Handle SIGTERM and SIGINT (Ctrl+C) for graceful shutdown
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn docs_routes(base_path: &str) -> Router {
    let doc = openapi_for(if base_path.is_empty() { "/" } else { base_path });
    Router::new().route(
        "/openapi.json",
        get(move || {
            let doc = doc.clone();
            async move { Json(doc) }
        }),
    )
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "contact-book"
    }))
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
