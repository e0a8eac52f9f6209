//! Error kinds surfaced by service operations.

use thiserror::Error;

use crate::infrastructure::RepositoryError;

/// Why a service operation failed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Malformed input: a missing or invalid field, or a malformed identifier.
    #[error("{message}")]
    BadRequest {
        field: Option<String>,
        message: String,
    },

    /// A unique field is already taken.
    #[error("{0}")]
    Conflict(String),

    /// The target or a referenced record does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Unexpected storage failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// A bad request attributed to `field`.
    #[must_use]
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BadRequest {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    /// A bad request not tied to one field.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            field: None,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::NotFound(message) => Self::NotFound(message),
            RepositoryError::Conflict(message) => Self::Conflict(message),
            RepositoryError::DatabaseError(_) | RepositoryError::SerializationError(_) => {
                Self::Internal(error.to_string())
            }
        }
    }
}
