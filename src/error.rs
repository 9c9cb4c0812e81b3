use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type. Handlers return `ApiResult<T>`; the
/// `IntoResponse` impl renders the JSON `{"message": ...}` body the
/// client expects.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or out-of-range input, rejected before any store write (400).
    #[error("{field} {reason}")]
    Validation {
        field: &'static str,
        reason: &'static str,
    },

    /// Authorization header absent or not `Bearer <token>` (401).
    #[error("No token")]
    MissingToken,

    /// Token failed signature or expiration checks (401).
    #[error("Invalid token")]
    InvalidToken,

    /// Login mismatch; deliberately identical for unknown email and
    /// wrong password (401).
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Unique constraint hit on registration (409).
    #[error("Email already exists")]
    Duplicate,

    /// No resource owned by the caller matches; a foreign item's id is
    /// indistinguishable from a nonexistent one (404).
    #[error("Not found")]
    NotFound,

    /// Unexpected fault; logged server-side, generic to the client (500).
    #[error("Server error")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::MissingToken | ApiError::InvalidToken | ApiError::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::Duplicate => StatusCode::CONFLICT,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(err) => {
                tracing::error!(error = %err, "internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = match &self {
            ApiError::Validation { field, reason } => json!({
                "message": self.to_string(),
                "field": field,
                "reason": reason,
            }),
            _ => json!({ "message": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound,
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => ApiError::Duplicate,
            other => ApiError::Internal(other.into()),
        }
    }
}
