/**
 * Routes Module
 * API route handlers
 */
use axum::{http::StatusCode, Json};
use serde::Serialize;

use crate::db::store::StoreError;

pub mod auth;
pub mod blog;
pub mod experience;
pub mod health;
pub mod media;
pub mod profile;
pub mod projects;
pub mod rss;
pub mod site;
pub mod stack;
pub mod taxonomy;

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: None,
        }
    }

    pub fn with_message(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: Some(message.into()),
        }
    }
}

/// Success response (for delete and fire-and-forget writes)
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

pub fn bad_request(message: &str) -> (StatusCode, Json<ErrorResponse>) {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(message)))
}

pub fn not_found() -> (StatusCode, Json<ErrorResponse>) {
    (StatusCode::NOT_FOUND, Json(ErrorResponse::new("Not found")))
}

/// Map a store failure on a write or single-entity read to its response.
/// Write failures are logged here and surfaced to the caller, never
/// swallowed into a success shape.
pub fn store_error(e: StoreError, context: &str) -> (StatusCode, Json<ErrorResponse>) {
    match e {
        StoreError::NotFound => not_found(),
        StoreError::Unavailable => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse::new("Database not available")),
        ),
        StoreError::Database(e) => {
            tracing::error!("Database error {}: {}", context, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Database error")),
            )
        }
    }
}
