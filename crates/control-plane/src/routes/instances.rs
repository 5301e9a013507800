use crate::auth::AuthUser;
use crate::error::{ApiError, Result};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use cmp_domain::entities::instance::{ApiKey, Instance, InstanceState};
use cmp_domain::{api_key, config_merge};
use cmp_store::billing::{self, TrialResult};
use cmp_store::repositories::{instance as instance_repo, offering};
use cmp_store::StoreError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CreateInstanceBody {
    pub offering_slug: String,
    pub plan_slug: Option<String>,
    #[serde(default = "default_empty_object")]
    pub overrides: Value,
}

fn default_empty_object() -> Value {
    json!({})
}

#[derive(Debug, Serialize)]
pub struct CreateInstanceResponse {
    pub instance_id: Uuid,
    pub api_key: String,
}

pub async fn create_instance(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateInstanceBody>,
) -> Result<Json<CreateInstanceResponse>> {
    let (org, project, _wallet) = billing::resolve_workspace(&state.db, &auth.user_id).await?;

    let found_offering = offering::find_by_slug(state.db.pool(), &body.offering_slug)
        .await?
        .ok_or_else(|| ApiError::Store(StoreError::NotFound(format!("offering {}", body.offering_slug))))?;
    let version = offering::newest_version(state.db.pool(), found_offering.id)
        .await?
        .ok_or_else(|| ApiError::Store(StoreError::NotFound("offering has no version".to_string())))?;

    let plan = match &body.plan_slug {
        Some(slug) => offering::list_plans(state.db.pool(), found_offering.id)
            .await?
            .into_iter()
            .find(|p| &p.slug == slug)
            .ok_or_else(|| ApiError::Store(StoreError::NotFound(format!("plan {slug}"))))?,
        None => offering::find_cheapest_plan(state.db.pool(), found_offering.id)
            .await?
            .ok_or_else(|| ApiError::Store(StoreError::NotFound("offering has no plan".to_string())))?,
    };

    let now = Utc::now();
    let effective_config = config_merge::effective_config(&version.defaults, &plan.limits, &body.overrides);
    let instance = Instance {
        id: Uuid::new_v4(),
        offering_version_id: version.id,
        org_id: org.id,
        project_id: project.id,
        plan_id: plan.id,
        name: format!("{} instance", found_offering.name),
        state: InstanceState::Active,
        overrides: body.overrides,
        effective_config,
        idempotency_key: None,
        created_at: now,
        updated_at: now,
    };
    instance_repo::insert_instance(state.db.pool(), &instance).await?;

    let generated = api_key::generate();
    let key_row = ApiKey {
        id: Uuid::new_v4(),
        instance_id: instance.id,
        name: "Default Key".to_string(),
        prefix: generated.prefix.clone(),
        hash: generated.hash.clone(),
        last_used_at: None,
        expires_at: None,
        is_active: true,
        created_at: now,
    };
    instance_repo::insert_api_key(state.db.pool(), &key_row).await?;

    Ok(Json(CreateInstanceResponse {
        instance_id: instance.id,
        api_key: generated.full_key,
    }))
}

pub async fn get_instance(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<Instance>> {
    let instance = instance_repo::find_instance_by_id(state.db.pool(), id)
        .await?
        .ok_or_else(|| ApiError::Store(StoreError::NotFound(format!("instance {id}"))))?;
    Ok(Json(instance))
}

pub async fn get_entitlements(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<Value>> {
    let instance = instance_repo::find_instance_by_id(state.db.pool(), id)
        .await?
        .ok_or_else(|| ApiError::Store(StoreError::NotFound(format!("instance {id}"))))?;
    Ok(Json(instance.effective_config))
}

#[derive(Debug, Serialize)]
pub struct ApiKeySummary {
    pub id: Uuid,
    pub name: String,
    pub prefix: String,
    pub is_active: bool,
    pub last_used_at: Option<chrono::DateTime<Utc>>,
}

pub async fn list_api_keys(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<Vec<ApiKeySummary>>> {
    let keys = instance_repo::list_api_keys_for_instance(state.db.pool(), id).await?;
    Ok(Json(
        keys.into_iter()
            .map(|k| ApiKeySummary {
                id: k.id,
                name: k.name,
                prefix: k.prefix,
                is_active: k.is_active,
                last_used_at: k.last_used_at,
            })
            .collect(),
    ))
}

#[derive(Debug, Deserialize)]
pub struct CreateApiKeyBody {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct CreateApiKeyResponse {
    pub id: Uuid,
    pub api_key: String,
}

pub async fn create_api_key(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<CreateApiKeyBody>,
) -> Result<Json<CreateApiKeyResponse>> {
    let generated = api_key::generate();
    let row = ApiKey {
        id: Uuid::new_v4(),
        instance_id: id,
        name: body.name,
        prefix: generated.prefix.clone(),
        hash: generated.hash.clone(),
        last_used_at: None,
        expires_at: None,
        is_active: true,
        created_at: Utc::now(),
    };
    instance_repo::insert_api_key(state.db.pool(), &row).await?;
    Ok(Json(CreateApiKeyResponse {
        id: row.id,
        api_key: generated.full_key,
    }))
}

pub async fn revoke_api_key(State(state): State<AppState>, Path((_id, key_id)): Path<(Uuid, Uuid)>) -> Result<Json<Value>> {
    instance_repo::revoke_api_key(state.db.pool(), key_id).await?;
    Ok(Json(json!({ "revoked": true })))
}

#[derive(Debug, Deserialize)]
pub struct StartTrialBody {
    pub product_slug: String,
}

pub async fn start_trial(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<StartTrialBody>,
) -> Result<Json<TrialResult>> {
    let result = billing::start_trial(&state.db, &auth.user_id, &body.product_slug).await?;
    Ok(Json(result))
}
