//! Health check handler

use crate::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use serde_json::{json, Value};

/// Health check: 503 when the record store is unreachable.
pub async fn check(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let connected = state.store.ping();
    let db_status = if connected { "connected" } else { "disconnected" };

    let status_code = if connected {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(json!({
            "status": if connected { "ok" } else { "error" },
            "database": db_status,
            "timestamp": chrono::Utc::now(),
        })),
    )
}
