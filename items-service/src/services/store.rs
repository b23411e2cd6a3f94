use crate::models::Item;
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Failed to convert document: {0}")]
    Serialization(String),

    #[error("{0}")]
    Unavailable(String),
}

/// The collection the item handlers read from and write to.
///
/// Implementations own connection management and durability. Handlers never
/// retry, so any error returned here ends the request.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Write `item`, replacing any stored item with the same id. Returns the id.
    async fn put(&self, item: &Item) -> Result<String, StoreError>;

    /// Every document in the collection, as JSON.
    async fn query_all(&self) -> Result<Vec<Value>, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}
