use super::store::{DocumentStore, StoreError};
use crate::models::Item;
use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

/// Process-local store, kept in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    items: RwLock<Vec<Item>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }

    pub async fn get(&self, id: &str) -> Option<Item> {
        self.items
            .read()
            .await
            .iter()
            .find(|item| item.id == id)
            .cloned()
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn put(&self, item: &Item) -> Result<String, StoreError> {
        let mut items = self.items.write().await;
        match items.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => *existing = item.clone(),
            None => items.push(item.clone()),
        }
        Ok(item.id.clone())
    }

    async fn query_all(&self) -> Result<Vec<Value>, StoreError> {
        self.items
            .read()
            .await
            .iter()
            .map(|item| {
                serde_json::to_value(item).map_err(|e| StoreError::Serialization(e.to_string()))
            })
            .collect()
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
