#![allow(dead_code)]

use async_trait::async_trait;
use items_service::config::{ItemsConfig, StoreBackend};
use items_service::models::Item;
use items_service::services::{DocumentStore, InMemoryStore, StoreError};
use items_service::startup::Application;
use serde_json::Value;
use std::sync::Arc;

pub const TEST_FUNCTION_KEY: &str = "test-function-key";
pub const SIMULATED_OUTAGE: &str = "simulated store outage";

/// Store double whose every call fails, standing in for an unreachable database.
pub struct FailingStore;

#[async_trait]
impl DocumentStore for FailingStore {
    async fn put(&self, _item: &Item) -> Result<String, StoreError> {
        Err(StoreError::Unavailable(SIMULATED_OUTAGE.to_string()))
    }

    async fn query_all(&self) -> Result<Vec<Value>, StoreError> {
        Err(StoreError::Unavailable(SIMULATED_OUTAGE.to_string()))
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Err(StoreError::Unavailable(SIMULATED_OUTAGE.to_string()))
    }
}

/// In-memory config on a random port.
pub fn test_config() -> ItemsConfig {
    let mut config = ItemsConfig::default();
    config.common.port = 0; // Random port for testing
    config.store.backend = StoreBackend::Memory;
    config.log_level = "error".to_string();
    config
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub client: reqwest::Client,
}

impl TestApp {
    /// Spawn the service backed by `store` with the default test config.
    pub async fn spawn(store: Arc<InMemoryStore>) -> Self {
        Self::spawn_with(test_config(), store).await
    }

    pub async fn spawn_with(config: ItemsConfig, store: Arc<dyn DocumentStore>) -> Self {
        let app = Application::build_with_store(config, store)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for HTTP server to be ready by polling health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            client,
        }
    }

    pub fn items_url(&self) -> String {
        format!("{}/api/items", self.address)
    }

    pub async fn post_item(&self, body: &str) -> reqwest::Response {
        self.client
            .post(self.items_url())
            .header("content-type", "application/json")
            .body(body.to_string())
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn list_items(&self) -> reqwest::Response {
        self.client
            .get(self.items_url())
            .send()
            .await
            .expect("Failed to execute request")
    }
}
