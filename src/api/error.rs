//! API error handling.
//!
//! Every failed request is answered with an [`ApiError`] body. Service
//! errors and extractor rejections are converted here so handlers can use
//! `?` throughout.

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::service::ServiceError;

// =============================================================================
// API Error
// =============================================================================

/// API error structure for JSON responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Field-level errors, present for validation failures tied to a field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

impl ApiError {
    #[must_use]
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a validation error with field-level details.
    #[must_use]
    pub fn validation(message: impl Into<String>, details: Vec<FieldError>) -> Self {
        Self {
            code: "VALIDATION_ERROR".to_string(),
            message: message.into(),
            details: Some(details),
        }
    }
}

/// Field-level error for validation failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

// =============================================================================
// API Error Response
// =============================================================================

/// API error response containing status code and error details.
#[derive(Debug, Clone)]
pub struct ApiErrorResponse {
    pub status: StatusCode,
    pub error: ApiError,
}

impl ApiErrorResponse {
    #[must_use]
    pub const fn new(status: StatusCode, error: ApiError) -> Self {
        Self { status, error }
    }

    /// Creates a 400 Bad Request response.
    #[must_use]
    pub fn bad_request(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ApiError::new(code, message))
    }

    /// Creates a 400 Bad Request response for validation errors.
    #[must_use]
    pub fn validation_error(message: impl Into<String>, details: Vec<FieldError>) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            ApiError::validation(message, details),
        )
    }

    /// Creates a 404 Not Found response.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, ApiError::new("NOT_FOUND", message))
    }

    /// Creates a 409 Conflict response for a duplicate unique field.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, ApiError::new("CONFLICT", message))
    }

    /// Creates a 500 Internal Server Error response.
    #[must_use]
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::new("INTERNAL_ERROR", message),
        )
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<ServiceError> for ApiErrorResponse {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::BadRequest {
                field: Some(field),
                message,
            } => {
                let details = vec![FieldError::new(field, message.clone())];
                Self::validation_error(message, details)
            }
            ServiceError::BadRequest {
                field: None,
                message,
            } => Self::bad_request("VALIDATION_ERROR", message),
            ServiceError::Conflict(message) => Self::conflict(message),
            ServiceError::NotFound(message) => Self::not_found(message),
            ServiceError::Internal(detail) => {
                tracing::error!(error = %detail, "Internal error");
                Self::internal_error("An internal error occurred")
            }
        }
    }
}

// =============================================================================
// Extractor rejections
// =============================================================================

impl From<JsonRejection> for ApiErrorResponse {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request("INVALID_BODY", rejection.body_text())
    }
}

impl From<QueryRejection> for ApiErrorResponse {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request("INVALID_QUERY", rejection.body_text())
    }
}

// =============================================================================
// Tests
// =============================================================================
