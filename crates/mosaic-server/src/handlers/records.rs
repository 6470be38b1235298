//! Record lookup, listing, and discover handlers

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{Query, State};
use axum::response::Json;
use mosaic_core::Lookup;
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Deserialize)]
pub struct SingleParams {
    pub id: String,
}

/// Get a single record, with internal geometry stripped.
pub async fn single(
    State(state): State<AppState>,
    Query(params): Query<SingleParams>,
) -> Result<Json<Value>, ApiError> {
    match state.serving.get_by_id(&params.id)? {
        Lookup::Found(record) => Ok(Json(serde_json::to_value(record).map_err(|e| {
            ApiError::internal(e.to_string())
        })?)),
        Lookup::NotFound => Err(ApiError::not_found("Record not found")),
    }
}

#[derive(Deserialize)]
pub struct ListingsParams {
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

fn default_page() -> usize {
    1
}

fn default_page_size() -> usize {
    10
}

/// Paginated record listing with an optional type filter.
pub async fn listings(
    State(state): State<AppState>,
    Query(params): Query<ListingsParams>,
) -> Result<Json<Value>, ApiError> {
    let result = state
        .serving
        .list(params.page, params.page_size, params.kind.as_deref())?;

    Ok(Json(json!({
        "page": result.page,
        "page_size": result.page_size,
        "data": result.data,
        "total_count": result.total_count,
        "total_pages": result.total_pages,
    })))
}

/// Up to 200 coordinate-bearing records, projected for map consumption.
pub async fn discover(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let points = state.serving.discover()?;
    Ok(Json(serde_json::to_value(points).map_err(|e| {
        ApiError::internal(e.to_string())
    })?))
}
