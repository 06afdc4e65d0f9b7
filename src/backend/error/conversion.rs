/**
 * Error Conversion
 *
 * Conversions into and out of `BackendError`: the HTTP response rendering
 * and the mapping of storage, I/O and multipart failures onto the API
 * error taxonomy.
 *
 * # Response Format
 *
 * ```json
 * {
 *   "error": "not_found",
 *   "message": "Book not found",
 *   "status": 404
 * }
 * ```
 *
 * # Storage Errors
 *
 * - unique constraint violation -> `Conflict`
 * - foreign key violation -> `NotFound` (the referenced row is missing)
 * - `RowNotFound` -> `NotFound`
 * - anything else -> `Internal`
 */

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

use crate::backend::error::types::BackendError;

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = serde_json::json!({
            "error": self.code(),
            "message": self.message(),
            "status": status.as_u16(),
        });

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for BackendError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => BackendError::not_found("Resource not found"),
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                tracing::warn!("Unique constraint violated: {}", db_err);
                BackendError::conflict("Resource already exists")
            }
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                tracing::warn!("Foreign key violated: {}", db_err);
                BackendError::not_found("Referenced resource not found")
            }
            _ => BackendError::internal(format!("Database error: {:?}", err)),
        }
    }
}

impl From<std::io::Error> for BackendError {
    fn from(err: std::io::Error) -> Self {
        BackendError::internal(format!("I/O error: {}", err))
    }
}

impl From<MultipartError> for BackendError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            tracing::warn!("Upload rejected by body limit: {}", err.body_text());
            BackendError::PayloadTooLarge("File too large".to_string())
        } else {
            tracing::warn!("Malformed multipart body: {}", err.body_text());
            BackendError::bad_request(format!("Invalid multipart body: {}", err.body_text()))
        }
    }
}

impl From<tokio::task::JoinError> for BackendError {
    fn from(err: tokio::task::JoinError) -> Self {
        BackendError::internal(format!("Blocking task failed: {}", err))
    }
}
