//! `X-API-Key` introspection against the Control Plane (§4.3 step 1).

use crate::error::ApiError;
use crate::state::AppState;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct ApiKeyContext {
    pub instance_id: Uuid,
    pub org_id: Uuid,
    pub project_id: Uuid,
}

pub async fn introspect(state: &AppState, api_key: &str) -> Result<ApiKeyContext, ApiError> {
    let resp = state
        .control_plane
        .validate_api_key(api_key)
        .await
        .map_err(ApiError::from)?;
    resp.map(|r| ApiKeyContext {
        instance_id: r.instance_id,
        org_id: r.org_id,
        project_id: r.project_id,
    })
    .ok_or(ApiError::Unauthenticated)
}
