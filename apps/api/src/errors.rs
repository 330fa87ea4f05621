use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// A collection the operation needs is empty (no profiles, no applications).
    #[error("No records: {0}")]
    NoRecords(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// An explicit list index outside `[0, len)`.
    #[error("Invalid index: {0}")]
    InvalidIndex(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Completion error: {0}")]
    Completion(String),

    #[error("Scraper error: {0}")]
    Scraper(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Text extraction error: {0}")]
    Extraction(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::NoRecords(msg) => (StatusCode::NOT_FOUND, "NO_RECORDS", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::InvalidIndex(msg) => (StatusCode::BAD_REQUEST, "INVALID_INDEX", msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Unauthorized".to_string(),
            ),
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "Internal server error".to_string(),
                )
            }
            AppError::Completion(msg) => {
                tracing::error!("Completion service error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "COMPLETION_ERROR",
                    "Internal server error".to_string(),
                )
            }
            AppError::Scraper(msg) => {
                tracing::error!("Scraper error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "SCRAPER_ERROR",
                    "Internal server error".to_string(),
                )
            }
            AppError::Storage(msg) => {
                tracing::error!("Storage error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "Internal server error".to_string(),
                )
            }
            AppError::Extraction(msg) => {
                tracing::error!("Text extraction error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "EXTRACTION_ERROR",
                    "Internal server error".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message,
            "code": code,
        }));

        (status, body).into_response()
    }
}

impl From<crate::llm_client::LlmError> for AppError {
    fn from(e: crate::llm_client::LlmError) -> Self {
        AppError::Completion(e.to_string())
    }
}

/// Bounds-checks an explicit index against a list length.
///
/// Negative and too-large indices are rejected identically.
pub fn check_index(index: i64, len: usize, what: &str) -> Result<usize, AppError> {
    usize::try_from(index)
        .ok()
        .filter(|&i| i < len)
        .ok_or_else(|| AppError::InvalidIndex(format!("Invalid {what} index: {index}")))
}
