pub mod database;
pub mod memory;
pub mod metrics;
pub mod store;

pub use database::{bson_to_json, MongoDb};
pub use memory::InMemoryStore;
pub use metrics::{get_metrics, init_metrics};
pub use store::{DocumentStore, StoreError};
