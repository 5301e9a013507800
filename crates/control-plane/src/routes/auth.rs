//! API key introspection for the Gateway and Connector Gateway (§4.1.7).
//! Open, service-to-service — callers already hold the raw key.

use crate::error::Result;
use crate::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use cmp_store::billing;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct ValidateApiKeyBody {
    pub api_key: String,
}

#[derive(Debug, Serialize)]
pub struct ValidateApiKeyResponse {
    pub instance_id: uuid::Uuid,
    pub org_id: uuid::Uuid,
    pub project_id: uuid::Uuid,
}

pub async fn validate_api_key(
    State(state): State<AppState>,
    Json(body): Json<ValidateApiKeyBody>,
) -> Result<(StatusCode, Json<Option<ValidateApiKeyResponse>>)> {
    let instance = billing::validate_api_key(&state.db, &body.api_key).await?;
    match instance {
        Some(instance) => Ok((
            StatusCode::OK,
            Json(Some(ValidateApiKeyResponse {
                instance_id: instance.id,
                org_id: instance.org_id,
                project_id: instance.project_id,
            })),
        )),
        None => Ok((StatusCode::NOT_FOUND, Json(None))),
    }
}
