use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use congress_trades_sdk::TradesError;
use serde_json::json;

/// Renders as a JSON `{"error": "..."}` body with the matching status code.
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.into(),
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }

    pub fn bad_gateway(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            message: msg.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, error = %self.message, "request failed");
        }
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<TradesError> for AppError {
    fn from(e: TradesError) -> Self {
        match &e {
            TradesError::NotFound(msg) => AppError::not_found(msg.clone()),
            TradesError::InvalidArgument(msg) => AppError::bad_request(msg.clone()),
            TradesError::Http(_) => AppError::bad_gateway(e.to_string()),
            _ => AppError::internal(e.to_string()),
        }
    }
}
