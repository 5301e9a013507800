use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProvisionerError {
    #[error("invalid signature")]
    InvalidSignature,

    #[error("malformed payload: {0}")]
    Validation(String),

    #[error(transparent)]
    Client(#[from] cmp_client::ClientError),
}

impl IntoResponse for ProvisionerError {
    fn into_response(self) -> Response {
        let status = match &self {
            ProvisionerError::InvalidSignature => StatusCode::UNAUTHORIZED,
            ProvisionerError::Validation(_) => StatusCode::BAD_REQUEST,
            ProvisionerError::Client(_) => StatusCode::BAD_GATEWAY,
        };
        match status {
            StatusCode::UNAUTHORIZED => tracing::warn!(error = %self, "webhook rejected"),
            _ => tracing::error!(error = %self, "webhook processing failed"),
        }
        (status, Json(json!({ "error": { "message": self.to_string() } }))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ProvisionerError>;
