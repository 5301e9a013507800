use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Maps to the SPEC_FULL §4.4 contract: only transport-layer or policy
/// failures surface as non-200. Execution failures below the HTTP layer are
/// carried in a 200 envelope by the handler instead.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("connector binding not found")]
    NotFound,
    #[error("connector binding is disabled")]
    Disabled,
    #[error("failed to communicate with control plane")]
    ControlPlaneUnavailable,
    #[error("failed to retrieve connector secrets")]
    SecretsUnavailable,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Disabled => StatusCode::FORBIDDEN,
            ApiError::ControlPlaneUnavailable => StatusCode::BAD_GATEWAY,
            ApiError::SecretsUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
        };
        tracing::warn!(error = %self, "connector execute rejected");
        (status, Json(json!({ "error": { "message": self.to_string() } }))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
