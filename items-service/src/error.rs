use crate::services::StoreError;
use service_core::error::AppError;
use thiserror::Error;

/// Ways an item request can fail. Every variant is terminal for the request.
#[derive(Debug, Error)]
pub enum ItemError {
    /// Body is not JSON, or is JSON but not an object.
    #[error("Invalid JSON: {0}")]
    InvalidInput(String),

    #[error("Empty body")]
    EmptyInput,

    #[error("Failed to write item: {0}")]
    StoreWrite(#[source] StoreError),

    #[error("Failed to read items: {0}")]
    StoreRead(#[source] StoreError),
}

impl From<ItemError> for AppError {
    fn from(err: ItemError) -> Self {
        match err {
            ItemError::InvalidInput(_) => AppError::BadRequest(anyhow::anyhow!("Invalid JSON")),
            ItemError::EmptyInput => AppError::BadRequest(anyhow::anyhow!("Empty body")),
            ItemError::StoreWrite(e) | ItemError::StoreRead(e) => {
                AppError::DatabaseError(anyhow::Error::new(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_errors_map_to_bad_request_messages() {
        let invalid = AppError::from(ItemError::InvalidInput("expected value".into()));
        assert!(matches!(&invalid, AppError::BadRequest(e) if e.to_string() == "Invalid JSON"));

        let empty = AppError::from(ItemError::EmptyInput);
        assert!(matches!(&empty, AppError::BadRequest(e) if e.to_string() == "Empty body"));
    }

    #[test]
    fn store_errors_keep_the_store_message() {
        let err = AppError::from(ItemError::StoreWrite(StoreError::Unavailable(
            "connection reset".into(),
        )));
        match err {
            AppError::DatabaseError(e) => assert!(e.to_string().contains("connection reset")),
            other => panic!("unexpected mapping: {:?}", other),
        }
    }
}
