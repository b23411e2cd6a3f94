use crate::error::ItemError;
use crate::models::ID_FIELD;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const ITEM_CREATED_MESSAGE: &str = "Item created!";

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct CreateItemResponse {
    pub message: String,
    pub id: String,
}

impl CreateItemResponse {
    pub fn new(id: String) -> Self {
        Self {
            message: ITEM_CREATED_MESSAGE.to_string(),
            id,
        }
    }
}

/// Parse a create request body into the client's field map.
///
/// Falsy JSON values (`{}`, `[]`, `null`, `""`, `0`, `false`) count as empty.
/// An `id` holding an array or object is rejected rather than replaced.
pub fn parse_item_body(body: &[u8]) -> Result<Map<String, Value>, ItemError> {
    let value: Value =
        serde_json::from_slice(body).map_err(|e| ItemError::InvalidInput(e.to_string()))?;

    if is_empty(&value) {
        return Err(ItemError::EmptyInput);
    }

    match value {
        Value::Object(fields) => {
            if let Some(id @ (Value::Array(_) | Value::Object(_))) = fields.get(ID_FIELD) {
                return Err(ItemError::InvalidInput(format!(
                    "id must be a string, number or boolean, got {}",
                    kind(id)
                )));
            }
            Ok(fields)
        }
        other => Err(ItemError::InvalidInput(format!(
            "expected a JSON object, got {}",
            kind(&other)
        ))),
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(values) => values.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_object_body() {
        let fields = parse_item_body(br#"{"title":"buy milk","qty":2}"#).unwrap();
        assert_eq!(fields["title"], "buy milk");
        assert_eq!(fields["qty"], 2);
    }

    #[test]
    fn malformed_json_is_invalid_input() {
        assert!(matches!(
            parse_item_body(b"{not json"),
            Err(ItemError::InvalidInput(_))
        ));
        assert!(matches!(parse_item_body(b""), Err(ItemError::InvalidInput(_))));
    }

    #[test]
    fn falsy_values_are_empty_input() {
        for body in ["{}", "[]", "null", "\"\"", "0", "false", " {} "] {
            assert!(
                matches!(parse_item_body(body.as_bytes()), Err(ItemError::EmptyInput)),
                "body {body:?} should be empty"
            );
        }
    }

    #[test]
    fn non_object_values_are_invalid_input() {
        for body in ["[1,2]", "\"text\"", "7", "true"] {
            assert!(
                matches!(
                    parse_item_body(body.as_bytes()),
                    Err(ItemError::InvalidInput(_))
                ),
                "body {body:?} should be rejected"
            );
        }
    }

    #[test]
    fn structured_id_is_invalid_input() {
        for body in [r#"{"id":[1],"title":"x"}"#, r#"{"id":{"k":"v"},"title":"x"}"#] {
            assert!(
                matches!(
                    parse_item_body(body.as_bytes()),
                    Err(ItemError::InvalidInput(_))
                ),
                "body {body:?} should be rejected"
            );
        }
    }

    #[test]
    fn scalar_and_null_ids_are_accepted() {
        for body in [r#"{"id":"a"}"#, r#"{"id":7}"#, r#"{"id":true}"#, r#"{"id":null,"t":1}"#] {
            assert!(parse_item_body(body.as_bytes()).is_ok(), "body {body:?}");
        }
    }

    #[test]
    fn created_response_shape() {
        let body = serde_json::to_value(CreateItemResponse::new("abc".into())).unwrap();
        assert_eq!(body, serde_json::json!({"message": "Item created!", "id": "abc"}));
    }
}
