use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use contact_core::ValidationErrors;
use serde_json::json;
use thiserror::Error;

pub const GENERIC_FAILURE: &str = "An error occurred while processing your request";
pub const MALFORMED_BODY: &str = "Invalid request body";
pub const MISSING_FIELDS: &str = "Some fields are missing or invalid";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Failures the caller cannot correct answer 200 with `success: false` and a
/// generic message; the cause is only logged. Field-level rejections answer
/// 400 and anything but POST/OPTIONS answers 405.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Malformed body: {0}")]
    MalformedBody(String),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::MalformedBody(detail) => {
                tracing::warn!("Rejected malformed body: {detail}");
                (
                    StatusCode::OK,
                    json!({ "success": false, "message": MALFORMED_BODY }),
                )
            }
            AppError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "success": false,
                    "message": MISSING_FIELDS,
                    "errors": errors,
                }),
            ),
            AppError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                json!({ "error": "method not allowed" }),
            ),
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::OK,
                    json!({ "success": false, "message": GENERIC_FAILURE }),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::OK,
                    json!({ "success": false, "message": GENERIC_FAILURE }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
