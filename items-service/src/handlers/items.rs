use crate::dtos::{parse_item_body, CreateItemResponse};
use crate::error::ItemError;
use crate::models::Item;
use crate::startup::AppState;
use axum::{body::Bytes, extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use metrics::counter;
use serde_json::Value;
use service_core::error::AppError;

/// POST /api/items
pub async fn create_item(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let fields = parse_item_body(&body).map_err(|e| {
        tracing::warn!(error = %e, body_len = body.len(), "Rejected item body");
        e
    })?;

    let item = Item::new(fields, Utc::now());

    tracing::info!(
        item_id = %item.id,
        field_count = item.fields.len(),
        "Creating item"
    );

    let id = state.store.put(&item).await.map_err(|e| {
        tracing::error!(item_id = %item.id, error = %e, "Failed to write item to store");
        counter!("item_store_errors_total", "operation" => "put").increment(1);
        ItemError::StoreWrite(e)
    })?;

    counter!("items_created_total").increment(1);
    tracing::info!(item_id = %id, "Item created");

    Ok((StatusCode::CREATED, Json(CreateItemResponse::new(id))))
}

/// GET /api/items
pub async fn list_items(State(state): State<AppState>) -> Result<Json<Vec<Value>>, AppError> {
    let items = state.store.query_all().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to read items from store");
        counter!("item_store_errors_total", "operation" => "query_all").increment(1);
        ItemError::StoreRead(e)
    })?;

    tracing::debug!(count = items.len(), "Listed items");

    Ok(Json(items))
}
