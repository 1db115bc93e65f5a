//! HTTP error response conversion
//!
//! Wraps `AppError` so it can implement `IntoResponse` (orphan rules), and
//! maps each variant to a status code and a JSON `ErrorResponse` body.
//! Validation failures carry field-level messages in `details`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use coursecraft_core::AppError;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub details: Option<serde_json::Value>,
}

#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        if self.0.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        }

        let (status, body) = match &self.0 {
            AppError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorResponse {
                    error: "Validation failed".to_string(),
                    details: serde_json::to_value(errors).ok(),
                },
            ),
            AppError::UploadRejected(e) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: format!("Upload rejected: {e}"),
                    details: None,
                },
            ),
            AppError::InvalidInput(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: msg.clone(),
                    details: None,
                },
            ),
            AppError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                ErrorResponse {
                    error: format!("Not found: {what}"),
                    details: None,
                },
            ),
            AppError::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse {
                    error: "A database error occurred".to_string(),
                    details: None,
                },
            ),
            AppError::Storage(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse {
                    error: "A storage error occurred".to_string(),
                    details: None,
                },
            ),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse {
                    error: "Internal server error".to_string(),
                    details: None,
                },
            ),
        };

        (status, Json(body)).into_response()
    }
}
