use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

use service::errors::ServiceError;

/// JSON error response: `{ "error": ..., "detail": ... }`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub error: &'static str,
    pub detail: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, error: &'static str, detail: Option<String>) -> Self {
        Self { status, error, detail }
    }

    pub fn not_found(entity: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, "Not Found", Some(format!("{} not found", entity)))
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = %self.status, detail = ?self.detail, "request failed");
        }
        let body = serde_json::json!({ "error": self.error, "detail": self.detail });
        (self.status, Json(body)).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(msg) => {
                Self::new(StatusCode::BAD_REQUEST, "Validation Error", Some(msg))
            }
            ServiceError::NotFound(msg) => Self::new(StatusCode::NOT_FOUND, "Not Found", Some(msg)),
            ServiceError::Conflict(msg) => Self::new(StatusCode::CONFLICT, "Conflict", Some(msg)),
            ServiceError::Db(msg) => {
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", Some(msg))
            }
        }
    }
}
