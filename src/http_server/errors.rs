//! HTTP API errors.
//!
//! Maps domain outcomes to status codes. Storage failures surface as a
//! generic 500; the detail goes to the structured log, never to the
//! client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::domain::Violation;
use crate::observability::Logger;
use crate::service::ServiceError;

/// Result type for HTTP handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// HTTP API errors
#[derive(Debug, Error)]
pub enum ApiError {
    // ==================
    // Client Errors (4xx)
    // ==================
    /// Request payload failed validation
    #[error("Validation failed")]
    Validation(Vec<Violation>),

    /// No incident with the given id
    #[error("Incident not found with id: {0}")]
    NotFound(i64),

    /// Status string names no known status
    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    // ==================
    // Server Errors (5xx)
    // ==================
    /// Storage failure; message is intentionally generic
    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidStatus(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(id) => ApiError::NotFound(id),
            ServiceError::Store(store_err) => {
                Logger::error("STORE_FAILURE", &[("detail", store_err.to_string().as_str())]);
                ApiError::Internal
            }
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violations: Option<Vec<Violation>>,
}

impl From<ApiError> for ErrorResponse {
    fn from(err: ApiError) -> Self {
        let code = err.status_code().as_u16();
        let error = err.to_string();
        let violations = match err {
            ApiError::Validation(violations) => Some(violations),
            _ => None,
        };
        Self {
            error,
            code,
            violations,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse::from(self));
        (status, body).into_response()
    }
}
