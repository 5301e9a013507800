//! Service error type. Wraps `StoreError` and maps to the taxonomy in §7;
//! `IntoResponse` wraps the body in the shared `{"error": {...}}` envelope.
//! The `traceId` field is filled in by `middleware::trace_id` after the
//! handler returns, not here — this type only needs to carry the kind.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use cmp_domain::error::ErrorKind;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Store(#[from] cmp_store::StoreError),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("unauthenticated")]
    Unauthenticated,

    #[error("forbidden")]
    Forbidden,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Store(e) => e.kind(),
            ApiError::Validation(_) => ErrorKind::Validation,
            ApiError::Unauthenticated => ErrorKind::Unauthenticated,
            ApiError::Forbidden => ErrorKind::Forbidden,
            ApiError::Internal(_) => ErrorKind::Internal,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let status = StatusCode::from_u16(kind.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        match kind {
            ErrorKind::Internal => tracing::error!(error = %self, "request failed"),
            ErrorKind::Upstream | ErrorKind::Unavailable => tracing::warn!(error = %self, "request failed"),
            _ => tracing::debug!(error = %self, "request failed"),
        }

        let code = match kind {
            ErrorKind::Validation => "validation",
            ErrorKind::Unauthenticated => "unauthenticated",
            ErrorKind::Forbidden => "forbidden",
            ErrorKind::NotFound => "not_found",
            ErrorKind::InsufficientCredits => "insufficient_credits",
            ErrorKind::Conflict => "conflict",
            ErrorKind::Upstream => "upstream",
            ErrorKind::Unavailable => "unavailable",
            ErrorKind::Internal => "internal",
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": self.to_string(),
                "traceId": "",
            }
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
