//! Similarity search handlers

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{Query, State};
use axum::response::Json;
use mosaic_core::{Record, SIMILAR_DEFAULT_N};
use serde::Deserialize;

const SEARCH_DEFAULT_N: usize = 12;

#[derive(Deserialize)]
pub struct SearchParams {
    pub query: String,
    #[serde(default = "search_default_n")]
    pub n: usize,
}

fn search_default_n() -> usize {
    SEARCH_DEFAULT_N
}

/// Free-text similarity search: embed the query, look up nearest neighbors,
/// hydrate records.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Record>>, ApiError> {
    let records = state
        .serving
        .search_similar_to_query(&params.query, params.n)
        .await?;
    Ok(Json(records))
}

#[derive(Deserialize)]
pub struct SimilarParams {
    pub id: String,
    #[serde(default = "similar_default_n")]
    pub n: usize,
}

fn similar_default_n() -> usize {
    SIMILAR_DEFAULT_N
}

/// Similar items for a stored record, using its type-specific derived query.
pub async fn get_similar(
    State(state): State<AppState>,
    Query(params): Query<SimilarParams>,
) -> Result<Json<Vec<Record>>, ApiError> {
    match state
        .serving
        .search_similar_to_record(&params.id, params.n)
        .await?
    {
        Some(records) => Ok(Json(records)),
        None => Err(ApiError::not_found("Record not found")),
    }
}
