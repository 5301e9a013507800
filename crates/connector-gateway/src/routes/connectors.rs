//! `POST /connectors/execute`, `GET /connectors/bindings/{id}/validate` (§4.4).

use crate::dispatch::{Executor, ToolCallResponse};
use crate::error::{ApiError, Result};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct ToolCallRequest {
    pub instance_id: Uuid,
    pub org_id: Uuid,
    pub project_id: Uuid,
    pub binding_id: Uuid,
    pub tool_name: String,
    #[serde(default = "default_input")]
    pub tool_input: Value,
    #[serde(default)]
    pub request_id: Option<String>,
    pub timeout: Option<u64>,
}

fn default_input() -> Value {
    json!({})
}

fn map_binding_error(e: cmp_client::ClientError) -> ApiError {
    if let cmp_client::ClientError::Upstream { status: 404, .. } = e {
        ApiError::NotFound
    } else {
        ApiError::ControlPlaneUnavailable
    }
}

pub async fn execute_tool_call(State(state): State<AppState>, Json(req): Json<ToolCallRequest>) -> Result<Json<ToolCallResponse>> {
    let log_span = tracing::info_span!(
        "connector_execute",
        instance_id = %req.instance_id,
        binding_id = %req.binding_id,
        tool_name = %req.tool_name,
        request_id = req.request_id.as_deref().unwrap_or(""),
    );
    let _enter = log_span.enter();
    tracing::info!("executing tool call");

    let binding = state.control_plane.get_connector_binding(req.binding_id).await.map_err(map_binding_error)?;

    if !binding.enabled() {
        return Err(ApiError::Disabled);
    }

    let secrets = state.secrets.get_secrets(&binding.secret_path).await.ok_or(ApiError::SecretsUnavailable)?;

    let executor = Executor {
        connector_type: binding.connector_type,
        config: binding.config,
        secrets,
        timeout_secs: req.timeout.unwrap_or(state.config.external_request_timeout_secs),
    };

    let response = executor.execute(&req.tool_name, &req.tool_input).await;
    tracing::info!(execution_time_ms = response.execution_time_ms, "tool call executed");
    Ok(Json(response))
}

#[derive(Debug, Serialize)]
pub struct ValidateBindingResponse {
    pub binding_id: Uuid,
    pub valid: bool,
    pub enabled: bool,
    pub secrets_configured: bool,
    pub connector_type: String,
}

pub async fn validate_binding(State(state): State<AppState>, Path(binding_id): Path<Uuid>) -> Result<Json<ValidateBindingResponse>> {
    let binding = state.control_plane.get_connector_binding(binding_id).await.map_err(map_binding_error)?;
    let secrets_configured = state.secrets.get_secrets(&binding.secret_path).await.is_some();

    Ok(Json(ValidateBindingResponse {
        binding_id,
        valid: binding.enabled() && secrets_configured,
        enabled: binding.enabled(),
        secrets_configured,
        connector_type: binding.connector_type,
    }))
}
