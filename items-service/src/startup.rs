//! Application startup and lifecycle management.

use crate::config::{AuthLevel, ItemsConfig, StoreBackend};
use crate::routes::route_table;
use crate::services::{DocumentStore, InMemoryStore, MongoDb};
use axum::{
    extract::DefaultBodyLimit,
    middleware::{from_fn, from_fn_with_state},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    function_key::{function_key_middleware, FunctionKeyConfig},
    metrics::metrics_middleware,
    security_headers::security_headers_middleware,
    tracing::request_id_middleware,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

/// Shared application state. Cloned per request; holds no mutable data of its own.
#[derive(Clone)]
pub struct AppState {
    pub config: ItemsConfig,
    pub store: Arc<dyn DocumentStore>,
}

/// Build the HTTP router from the route table.
pub fn build_router(state: AppState) -> Router {
    let function_keys = FunctionKeyConfig::new(state.config.auth.function_key.clone());

    let mut router = Router::new();
    for route in route_table(&state.config) {
        tracing::info!(
            route = route.name,
            method = %route.method,
            path = route.path,
            auth = %route.auth,
            "Registering route"
        );

        let handler = match route.auth {
            AuthLevel::Anonymous => route.handler,
            AuthLevel::Function => route.handler.route_layer(from_fn_with_state(
                function_keys.clone(),
                function_key_middleware,
            )),
        };
        router = router.route(route.path, handler);
    }

    router
        .layer(DefaultBodyLimit::max(state.config.http.max_body_bytes))
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application, connecting to the store named in `config`.
    pub async fn build(config: ItemsConfig) -> Result<Self, AppError> {
        config.validate()?;

        let store: Arc<dyn DocumentStore> = match config.store.backend {
            StoreBackend::Mongo => {
                let db = MongoDb::connect(
                    &config.mongodb.uri,
                    &config.mongodb.database,
                    &config.mongodb.collection,
                )
                .await
                .map_err(|e| {
                    tracing::error!("Failed to connect to MongoDB: {}", e);
                    e
                })?;

                db.initialize_indexes().await.map_err(|e| {
                    tracing::error!("Failed to initialize database indexes: {}", e);
                    e
                })?;

                Arc::new(db)
            }
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory item store; data is lost on restart");
                Arc::new(InMemoryStore::new())
            }
        };

        Self::build_with_store(config, store).await
    }

    /// Build the application around an already constructed store.
    pub async fn build_with_store(
        config: ItemsConfig,
        store: Arc<dyn DocumentStore>,
    ) -> Result<Self, AppError> {
        config.validate()?;

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        Ok(Self {
            port,
            listener,
            state: AppState { config, store },
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn store(&self) -> Arc<dyn DocumentStore> {
        self.state.store.clone()
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = build_router(self.state);
        axum::serve(self.listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
