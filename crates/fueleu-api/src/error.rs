//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps engine validation failures and store misses to HTTP status codes
//! with JSON error bodies. Internal error details (database failures) are
//! logged but never exposed to clients.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use fueleu_engine::{BankingError, CbError, ComparisonError, PoolError};

/// Structured JSON error response body.
///
/// All error responses use this format for consistency across the API
/// surface.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// The error payload.
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "VALIDATION_ERROR").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Request validation failed (422) — covers every deterministic engine
    /// rejection except a missing snapshot.
    #[error("validation error: {0}")]
    Validation(String),

    /// Request body could not be parsed (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Conflict with current resource state (409).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Internal server error (500). Message is logged but not returned to
    /// the client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // Never expose internal error messages to clients.
        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        };

        if matches!(&self, Self::Internal(_)) {
            tracing::error!(error = %self, "internal server error");
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Identifier construction failures are client errors.
impl From<fueleu_core::ValidationError> for AppError {
    fn from(err: fueleu_core::ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// CB computation rejections are client errors.
impl From<CbError> for AppError {
    fn from(err: CbError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Banking rejections map to 404 for a missing snapshot (the referenced
/// resource does not exist) and 422 for everything else.
impl From<BankingError> for AppError {
    fn from(err: BankingError) -> Self {
        match &err {
            BankingError::NoSnapshot { .. } => Self::NotFound(err.to_string()),
            _ => Self::Validation(err.to_string()),
        }
    }
}

/// Pool allocation rejections are client errors.
impl From<PoolError> for AppError {
    fn from(err: PoolError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Comparison rejections are client errors.
impl From<ComparisonError> for AppError {
    fn from(err: ComparisonError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Database failures are internal; details stay in the logs.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        Self::Internal(err.to_string())
    }
}
