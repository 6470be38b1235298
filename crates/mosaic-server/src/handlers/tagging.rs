//! Tagging trigger and job status handlers

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use mosaic_core::tag_records;
use serde_json::{json, Value};

/// Trigger a background tagging batch over untagged records.
///
/// Records are fetched inside the request cycle so the caller gets an
/// immediate queued count; classification and writes happen in a spawned
/// task tracked by the job registry.
pub async fn process_unprocessed(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    tracing::info!("Received request to process unprocessed records");

    if !state.store.ping() {
        return Err(ApiError::unavailable("Record store unavailable"));
    }

    let records = state
        .store
        .fetch_untagged(state.batch_limit)
        .map_err(|e| ApiError::internal(format!("Failed to fetch records: {}", e)))?;
    let num_records = records.len();

    if num_records == 0 {
        tracing::info!("No unprocessed records found to process");
        return Ok((
            StatusCode::ACCEPTED,
            Json(json!({
                "status": "success",
                "message": "No unprocessed records found.",
                "records_queued": 0,
            })),
        ));
    }

    let job_id = state.jobs.create(num_records);
    let store = state.store.clone();
    let classifier = state.classifier.clone();
    let jobs = state.jobs.clone();

    tokio::spawn(async move {
        jobs.start(job_id);
        let report = tag_records(store, classifier, records).await;
        jobs.finish(job_id, report);
    });

    tracing::info!("Queued {} records for background tagging", num_records);
    Ok((
        StatusCode::ACCEPTED,
        Json(json!({
            "status": "accepted",
            "message": format!("Background task started to process {} records.", num_records),
            "records_queued": num_records,
            "job_id": job_id,
        })),
    ))
}

/// Poll the status of a tagging job.
pub async fn job_status(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Value>, ApiError> {
    match state.jobs.get(id) {
        Some(job) => Ok(Json(serde_json::to_value(job).map_err(|e| {
            ApiError::internal(e.to_string())
        })?)),
        None => Err(ApiError::not_found("Job not found")),
    }
}
