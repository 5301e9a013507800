//! Organizations, projects, and memberships (§4.1.9, §6).

use crate::auth::AuthUser;
use crate::error::{ApiError, Result};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use cmp_domain::entities::org::{slugify, Membership, Organization, Project, Role};
use cmp_store::billing;
use cmp_store::repositories::org;
use cmp_store::StoreError;
use serde::Deserialize;
use uuid::Uuid;

/// Auto-creates (or returns the existing) workspace owned by the caller.
pub async fn auto_create(State(state): State<AppState>, auth: AuthUser) -> Result<Json<Organization>> {
    let (org, _project, _wallet) = billing::resolve_workspace(&state.db, &auth.user_id).await?;
    Ok(Json(org))
}

pub async fn get_org(State(state): State<AppState>, auth: AuthUser, Path(id): Path<Uuid>) -> Result<Json<Organization>> {
    require_membership(&state, id, &auth.user_id).await?;
    let found = org::find_org_by_id(state.db.pool(), id)
        .await?
        .ok_or_else(|| ApiError::Store(StoreError::NotFound(format!("org {id}"))))?;
    Ok(Json(found))
}

async fn require_membership(state: &AppState, org_id: Uuid, user_id: &str) -> Result<Membership> {
    org::find_membership(state.db.pool(), org_id, user_id)
        .await?
        .ok_or(ApiError::Forbidden)
}

#[derive(Debug, Deserialize)]
pub struct CreateProjectBody {
    pub name: String,
    #[serde(default)]
    pub is_default: bool,
}

pub async fn create_project(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(org_id): Path<Uuid>,
    Json(body): Json<CreateProjectBody>,
) -> Result<Json<Project>> {
    let membership = require_membership(&state, org_id, &auth.user_id).await?;
    if !membership.role.can_manage_wallet() {
        return Err(ApiError::Forbidden);
    }
    let project = Project {
        id: Uuid::new_v4(),
        org_id,
        slug: slugify(&body.name),
        name: body.name,
        is_default: body.is_default,
        created_at: Utc::now(),
    };
    org::insert_project(state.db.pool(), &project).await?;
    Ok(Json(project))
}

pub async fn get_default_project(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(org_id): Path<Uuid>,
) -> Result<Json<Project>> {
    require_membership(&state, org_id, &auth.user_id).await?;
    let project = org::find_default_project(state.db.pool(), org_id)
        .await?
        .ok_or_else(|| ApiError::Store(StoreError::NotFound(format!("default project for org {org_id}"))))?;
    Ok(Json(project))
}

#[derive(Debug, Deserialize)]
pub struct InviteMemberBody {
    pub user_id: String,
    pub role: Role,
}

pub async fn invite_member(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(org_id): Path<Uuid>,
    Json(body): Json<InviteMemberBody>,
) -> Result<Json<Membership>> {
    let membership = require_membership(&state, org_id, &auth.user_id).await?;
    if !membership.role.can_manage_wallet() {
        return Err(ApiError::Forbidden);
    }
    let new_membership = Membership {
        id: Uuid::new_v4(),
        org_id,
        user_id: body.user_id,
        role: body.role,
        teams: Vec::new(),
        created_at: Utc::now(),
    };
    org::insert_membership(state.db.pool(), &new_membership).await?;
    Ok(Json(new_membership))
}

pub async fn get_membership(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(org_id): Path<Uuid>,
) -> Result<Json<Membership>> {
    Ok(Json(require_membership(&state, org_id, &auth.user_id).await?))
}
