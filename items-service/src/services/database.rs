use super::store::{DocumentStore, StoreError};
use crate::models::Item;
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::{
    bson::{doc, Bson, Document},
    options::{IndexOptions, ReplaceOptions},
    Client as MongoClient, Collection, Database, IndexModel,
};
use serde_json::Value;
use service_core::error::AppError;

#[derive(Clone)]
pub struct MongoDb {
    client: MongoClient,
    db: Database,
    collection: String,
}

impl MongoDb {
    pub async fn connect(uri: &str, database: &str, collection: &str) -> Result<Self, AppError> {
        tracing::info!("Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB: {}", e);
            AppError::from(e)
        })?;
        let db = client.database(database);
        tracing::info!(
            database = %database,
            collection = %collection,
            "Successfully connected to MongoDB database"
        );
        Ok(Self {
            client,
            db,
            collection: collection.to_string(),
        })
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        tracing::info!("Creating MongoDB indexes for items-service");

        let item_id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .name("item_id_unique".to_string())
                    .unique(true)
                    .build(),
            )
            .build();

        self.items()
            .create_index(item_id_index, None)
            .await
            .map_err(|e| {
                tracing::error!(
                    "Failed to create unique id index on {} collection: {}",
                    self.collection,
                    e
                );
                AppError::from(e)
            })?;
        tracing::info!("Created unique index on {}.id", self.collection);

        Ok(())
    }

    pub fn items(&self) -> Collection<Document> {
        self.db.collection(&self.collection)
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

#[async_trait]
impl DocumentStore for MongoDb {
    async fn put(&self, item: &Item) -> Result<String, StoreError> {
        let document = item_document(item)?;
        let options = ReplaceOptions::builder().upsert(true).build();

        self.items()
            .replace_one(doc! { "id": &item.id }, document, options)
            .await?;

        Ok(item.id.clone())
    }

    async fn query_all(&self) -> Result<Vec<Value>, StoreError> {
        let mut cursor = self.items().find(None, None).await?;

        let mut items = Vec::new();
        while let Some(document) = cursor.try_next().await? {
            items.push(bson_to_json(Bson::Document(document)));
        }

        Ok(items)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                StoreError::from(e)
            })?;
        Ok(())
    }
}

/// Field MongoDB reserves for its own primary key.
const MONGO_ID_FIELD: &str = "_id";

/// Build the document written for `item`.
///
/// A client `_id` is dropped so that re-posting an id never trips MongoDB's
/// immutable primary key on upsert. Integers beyond `i64` are stored as doubles.
fn item_document(item: &Item) -> Result<Document, StoreError> {
    let value =
        serde_json::to_value(item).map_err(|e| StoreError::Serialization(e.to_string()))?;

    let mut document = match json_to_bson(value) {
        Bson::Document(document) => document,
        other => {
            return Err(StoreError::Serialization(format!(
                "item serialized to {:?} instead of a document",
                other.element_type()
            )));
        }
    };

    if document.remove(MONGO_ID_FIELD).is_some() {
        tracing::debug!(item_id = %item.id, "Dropped client-supplied _id");
    }

    Ok(document)
}

/// Convert a JSON value to BSON without the range limits of the bson serializer.
fn json_to_bson(value: Value) -> Bson {
    match value {
        Value::Null => Bson::Null,
        Value::Bool(b) => Bson::Boolean(b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => Bson::Int64(i),
            None => Bson::Double(n.as_f64().unwrap_or(f64::NAN)),
        },
        Value::String(s) => Bson::String(s),
        Value::Array(values) => Bson::Array(values.into_iter().map(json_to_bson).collect()),
        Value::Object(map) => Bson::Document(
            map.into_iter()
                .map(|(key, value)| (key, json_to_bson(value)))
                .collect(),
        ),
    }
}

/// Convert a stored BSON value to JSON.
///
/// Types without a JSON counterpart (ObjectId, dates, timestamps, decimals,
/// binary, regexes, code) become strings.
pub fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::Null | Bson::Undefined => Value::Null,
        Bson::Boolean(b) => Value::Bool(b),
        Bson::Int32(n) => Value::from(n),
        Bson::Int64(n) => Value::from(n),
        Bson::Double(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(f.to_string())),
        Bson::String(s) => Value::String(s),
        Bson::Array(values) => Value::Array(values.into_iter().map(bson_to_json).collect()),
        Bson::Document(document) => Value::Object(
            document
                .into_iter()
                .map(|(key, value)| (key, bson_to_json(value)))
                .collect(),
        ),
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(dt) => Value::String(
            dt.try_to_rfc3339_string()
                .unwrap_or_else(|_| dt.timestamp_millis().to_string()),
        ),
        other => Value::String(other.to_string()),
    }
}
