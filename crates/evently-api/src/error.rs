//! API error handling.
//!
//! One taxonomy for the whole service. Ownership and role failures map to
//! 403, authentication failures to 401, and the two are never conflated:
//! the service layer fetches a resource before gating on it, so a caller
//! can tell "not there" from "not yours".

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use evently_store::StoreError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Error body returned to callers, the failure half of the uniform envelope.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Always `false`
    pub success: bool,
    /// Stable machine-readable code
    pub code: String,
    /// Human-readable message
    pub message: String,
}

impl ErrorBody {
    fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Application error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing, malformed, expired, or otherwise unusable credentials.
    #[error("authentication required")]
    Unauthenticated,

    /// Login failure. Deliberately carries no detail: the response shape is
    /// identical whether the email is unknown or the password wrong.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("duplicate: {0}")]
    Duplicate(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                ErrorBody::new("UNAUTHENTICATED", "Authentication required"),
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ErrorBody::new("INVALID_CREDENTIALS", "Invalid credentials"),
            ),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, ErrorBody::new("FORBIDDEN", msg)),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorBody::new("NOT_FOUND", format!("{resource} not found")),
            ),
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, ErrorBody::new("VALIDATION", msg))
            }
            AppError::Duplicate(msg) => (StatusCode::CONFLICT, ErrorBody::new("DUPLICATE", msg)),
            AppError::Internal(detail) => {
                // Detail stays in the logs; callers get a generic message.
                tracing::error!(detail = %detail, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::new("INTERNAL_ERROR", "Internal server error"),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail => AppError::Duplicate("Email already registered".to_string()),
            StoreError::Backend(msg) => AppError::Internal(msg),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}
