//! API error responses

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use mosaic_core::MosaicError;
use serde_json::json;

/// Error that renders as a JSON body with a matching status code
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }

    /// 503 is reserved for "dependency not initialized or disconnected"
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE,
            message: message.into(),
        }
    }
}

impl From<MosaicError> for ApiError {
    fn from(error: MosaicError) -> Self {
        match &error {
            MosaicError::InvalidInput(msg) => Self::validation(msg.clone()),
            MosaicError::RecordNotFound(msg) => Self::not_found(msg.clone()),
            _ => Self::internal(error.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
