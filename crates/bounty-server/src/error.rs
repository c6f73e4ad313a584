//! Service and API error types with HTTP status code mapping.
//!
//! [`ServiceError`] is what [`crate::service::ProgramService`] returns.
//! [`ApiError`] is the unified error type for all API endpoints; it
//! implements `axum::response::IntoResponse` to produce `{ "error": ... }`
//! JSON bodies. Storage failures collapse into a fixed per-endpoint message
//! and their cause only reaches the server log.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use bounty_storage::StorageError;

use crate::query::QueryError;
use crate::validation::ValidationIssue;

pub const NOT_FOUND_MESSAGE: &str = "Program not found";
pub const VALIDATION_FAILED_MESSAGE: &str = "Validation failed";

/// Errors produced by the program service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Listing parameters were rejected.
    #[error(transparent)]
    InvalidQuery(#[from] QueryError),

    /// No program has the requested id.
    #[error("program not found")]
    NotFound,

    /// A create payload failed validation.
    #[error("validation failed with {} issue(s)", .0.len())]
    ValidationFailed(Vec<ValidationIssue>),

    /// Anything the store reported, including malformed ids.
    #[error("storage failure: {0}")]
    Storage(#[from] StorageError),
}

/// JSON body of every error response.
#[derive(Debug, Clone, Serialize)]
pub struct ApiErrorBody {
    /// Human-readable error message.
    pub error: String,
    /// Structured validation issues, when there are any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationIssue>>,
}

/// API errors with HTTP status code mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Invalid listing parameters (400).
    #[error(transparent)]
    InvalidQuery(#[from] QueryError),

    /// Entity not found (404).
    #[error("Program not found")]
    NotFound,

    /// Payload validation failed (400).
    #[error("Validation failed")]
    ValidationFailed(Vec<ValidationIssue>),

    /// Request body was not JSON (400).
    #[error("Invalid JSON body")]
    MalformedBody,

    /// Query string could not be decoded (400).
    #[error("Invalid query string")]
    MalformedQuery,

    /// Internal server error (500) carrying the endpoint's fixed message.
    #[error("{0}")]
    Internal(&'static str),
}

impl ApiError {
    /// Maps a service error for an endpoint whose unexpected failures are
    /// reported as `failure`. Storage errors are logged here and replaced by
    /// the fixed message.
    pub fn from_service(err: ServiceError, failure: &'static str) -> Self {
        match err {
            ServiceError::InvalidQuery(query) => ApiError::InvalidQuery(query),
            ServiceError::NotFound => ApiError::NotFound,
            ServiceError::ValidationFailed(issues) => ApiError::ValidationFailed(issues),
            ServiceError::Storage(source) => {
                tracing::error!(error = %source, "{failure}");
                ApiError::Internal(failure)
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidQuery(_)
            | ApiError::ValidationFailed(_)
            | ApiError::MalformedBody
            | ApiError::MalformedQuery => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = self.to_string();
        let details = match self {
            ApiError::ValidationFailed(issues) => Some(issues),
            _ => None,
        };
        (status, axum::Json(ApiErrorBody { error, details })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_errors_become_the_fixed_message() {
        let err = ApiError::from_service(
            ServiceError::Storage(StorageError::MalformedId("invalid-uuid".to_string())),
            "Failed to fetch program",
        );
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Failed to fetch program");
    }

    #[test]
    fn client_errors_keep_their_meaning() {
        let not_found = ApiError::from_service(ServiceError::NotFound, "unused");
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
        assert_eq!(not_found.to_string(), NOT_FOUND_MESSAGE);

        let query = ApiError::from_service(
            ServiceError::InvalidQuery(QueryError::InvalidPage("0".to_string())),
            "unused",
        );
        assert_eq!(query.status(), StatusCode::BAD_REQUEST);
        assert_eq!(query.to_string(), "Page must be greater than 0");

        let invalid = ApiError::from_service(ServiceError::ValidationFailed(Vec::new()), "unused");
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
        assert_eq!(invalid.to_string(), VALIDATION_FAILED_MESSAGE);
    }

    #[tokio::test]
    async fn undecodable_query_is_a_json_bad_request() {
        let response = ApiError::MalformedQuery.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, serde_json::json!({ "error": "Invalid query string" }));
    }
}
