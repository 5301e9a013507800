//! Connector bindings (§3, §4.1.8, §6). Credentials are written to and
//! masked-read from the secret store here; masking happens at this service's
//! boundary per §6 ("masking is applied at the Control Plane boundary").
//! The Connector Gateway reads the same secrets directly at dispatch time
//! (§4.4) but never through this API.

use crate::auth::AuthUser;
use crate::error::{ApiError, Result};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use cmp_domain::entities::connector::{mask_secret, secret_path, ConnectorBinding, ConnectorBindingStatus};
use cmp_store::repositories::connector;
use cmp_store::StoreError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CreateBindingBody {
    pub org_id: Uuid,
    pub project_id: Uuid,
    pub connector_id: String,
    pub connector_type: String,
    pub display_name: String,
    #[serde(default = "default_config")]
    pub config: serde_json::Value,
    /// Written to the external secret store at the computed `secret_path`.
    /// Never persisted or echoed back by Control Plane itself.
    #[serde(default)]
    pub credentials: Option<serde_json::Value>,
}

fn default_config() -> serde_json::Value {
    serde_json::json!({})
}

pub async fn create_binding(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(body): Json<CreateBindingBody>,
) -> Result<Json<ConnectorBinding>> {
    let id = Uuid::new_v4();
    let binding = ConnectorBinding {
        id,
        org_id: body.org_id,
        project_id: body.project_id,
        secret_path: secret_path(&state.config.secret_mount, body.org_id, body.project_id, &body.connector_id, id),
        connector_id: body.connector_id,
        connector_type: body.connector_type,
        display_name: body.display_name,
        config: body.config,
        status: ConnectorBindingStatus::Active,
        created_at: Utc::now(),
    };
    connector::insert_binding(state.db.pool(), &binding).await?;

    if let Some(credentials) = &body.credentials {
        if !state.secrets.put_secrets(&binding.secret_path, credentials).await {
            tracing::error!(binding_id = %binding.id, "failed to write connector credentials to secret store");
        }
    }

    Ok(Json(binding))
}

pub async fn list_bindings(State(state): State<AppState>, Path(project_id): Path<Uuid>) -> Result<Json<Vec<ConnectorBinding>>> {
    Ok(Json(connector::list_bindings_for_project(state.db.pool(), project_id).await?))
}

pub async fn get_binding(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<ConnectorBinding>> {
    let binding = connector::find_binding_by_id(state.db.pool(), id)
        .await?
        .ok_or_else(|| ApiError::Store(StoreError::NotFound(format!("connector binding {id}"))))?;
    Ok(Json(binding))
}

pub async fn revoke_binding(State(state): State<AppState>, _auth: AuthUser, Path(id): Path<Uuid>) -> Result<Json<ConnectorBinding>> {
    let existing = connector::find_binding_by_id(state.db.pool(), id)
        .await?
        .ok_or_else(|| ApiError::Store(StoreError::NotFound(format!("connector binding {id}"))))?;

    if !state.secrets.delete_secret(&existing.secret_path).await {
        tracing::error!(binding_id = %id, "failed to delete connector credentials from secret store");
    }

    connector::revoke_binding(state.db.pool(), id).await?;
    let binding = connector::find_binding_by_id(state.db.pool(), id)
        .await?
        .ok_or_else(|| ApiError::Store(StoreError::NotFound(format!("connector binding {id}"))))?;
    Ok(Json(binding))
}

#[derive(Debug, Serialize)]
pub struct MaskedCredentials {
    pub binding_id: Uuid,
    pub connector_id: String,
    /// Each stored credential value, masked (first two and last two
    /// characters kept, middle replaced by stars). The raw secret is never
    /// returned through this API.
    pub credentials: std::collections::HashMap<String, String>,
}

pub async fn get_credentials(State(state): State<AppState>, _auth: AuthUser, Path(id): Path<Uuid>) -> Result<Json<MaskedCredentials>> {
    let binding = connector::find_binding_by_id(state.db.pool(), id)
        .await?
        .ok_or_else(|| ApiError::Store(StoreError::NotFound(format!("connector binding {id}"))))?;

    let secrets = state.secrets.get_secrets(&binding.secret_path).await;
    let credentials = secrets
        .and_then(|v| v.as_object().cloned())
        .map(|map| {
            map.into_iter()
                .map(|(k, v)| (k, mask_secret(v.as_str().unwrap_or_default())))
                .collect()
        })
        .unwrap_or_default();

    Ok(Json(MaskedCredentials {
        binding_id: binding.id,
        connector_id: binding.connector_id,
        credentials,
    }))
}
