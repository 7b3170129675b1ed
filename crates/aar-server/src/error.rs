//! Error types for the mission API.
//!
//! [`ApiError`] unifies all failure modes of a request. Its
//! [`IntoResponse`](axum::response::IntoResponse) implementation logs the
//! underlying cause and answers with a fixed, generic 500 body: clients
//! never see database details, and a missing mission is reported the same
//! way as any other failure.

use aar_db::DbError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Message sent to clients for every failed request.
pub const GENERIC_ERROR_MESSAGE: &str = "Internal Server Error";

/// Errors that can occur while serving a mission request.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The data layer failed (query, connectivity, row decode, not found).
    #[error("database error: {0}")]
    Database(#[from] DbError),

    /// The mission id in the request path is not a UUID.
    #[error("invalid mission id {raw:?}: {source}")]
    InvalidMissionId {
        /// The path segment as received.
        raw: String,
        /// The parse failure.
        source: uuid::Error,
    },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Database(e) if e.is_not_found() => {
                tracing::warn!(error = %self, "Mission not found");
            }
            _ => tracing::error!(error = %self, "Request failed"),
        }

        let status = StatusCode::INTERNAL_SERVER_ERROR;
        let body = serde_json::json!({
            "error": GENERIC_ERROR_MESSAGE,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
