use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

pub const ID_FIELD: &str = "id";
pub const CREATED_AT_FIELD: &str = "createdAt";

/// A stored record: the client's fields plus the server-managed `id` and `createdAt`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    pub id: String,
    #[serde(rename = "createdAt", with = "iso8601")]
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Item {
    /// Build an item from a parsed request body.
    ///
    /// A usable client `id` is kept (numbers and booleans in their string form);
    /// a missing, null or empty one gets [`content_id`] of the body as received.
    /// Structured ids are refused earlier by `parse_item_body`. `createdAt` is
    /// always replaced with `now`.
    pub fn new(mut fields: Map<String, Value>, now: DateTime<Utc>) -> Self {
        let id = match fields.get(ID_FIELD) {
            Some(Value::String(id)) if !id.is_empty() => id.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            _ => content_id(&fields),
        };

        fields.remove(ID_FIELD);
        fields.remove(CREATED_AT_FIELD);

        Self {
            id,
            created_at: now,
            fields,
        }
    }
}

/// Hex SHA-256 of the body serialized with object keys sorted at every level,
/// so bodies that differ only in key order share an id.
pub fn content_id(fields: &Map<String, Value>) -> String {
    let canonical = canonicalize(&Value::Object(fields.clone())).to_string();
    hex::encode(Sha256::digest(canonical.as_bytes()))
}

fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut sorted = Map::with_capacity(map.len());
            for key in keys {
                sorted.insert(key.clone(), canonicalize(&map[key]));
            }
            Value::Object(sorted)
        }
        Value::Array(values) => Value::Array(values.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}

mod iso8601 {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Micros, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
