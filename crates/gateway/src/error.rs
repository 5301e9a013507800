use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use cmp_domain::error::ErrorKind;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("unauthenticated")]
    Unauthenticated,

    #[error("forbidden origin")]
    ForbiddenOrigin,

    #[error("insufficient credits")]
    InsufficientCredits,

    #[error("upstream dependency failed: {0}")]
    Upstream(String),

    #[error("validation failed: {0}")]
    Validation(String),
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Unauthenticated => ErrorKind::Unauthenticated,
            ApiError::ForbiddenOrigin => ErrorKind::Forbidden,
            ApiError::InsufficientCredits => ErrorKind::InsufficientCredits,
            ApiError::Upstream(_) => ErrorKind::Upstream,
            ApiError::Validation(_) => ErrorKind::Validation,
        }
    }
}

impl From<cmp_client::ClientError> for ApiError {
    fn from(e: cmp_client::ClientError) -> Self {
        ApiError::Upstream(e.to_string())
    }
}

impl From<crate::runner::RunnerError> for ApiError {
    fn from(e: crate::runner::RunnerError) -> Self {
        ApiError::Upstream(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let status = StatusCode::from_u16(kind.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        match kind {
            ErrorKind::Upstream | ErrorKind::Unavailable => tracing::error!(error = %self, "request failed"),
            ErrorKind::InsufficientCredits => tracing::warn!(error = %self, "run denied"),
            _ => tracing::debug!(error = %self, "request failed"),
        }
        (status, Json(json!({ "error": { "message": self.to_string() } }))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
