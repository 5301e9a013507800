//! Wallet self-service: balance, ledger history, and top-ups (§4.1.9).
//! Top-ups are restricted to org OWNER/ADMIN.

use crate::auth::AuthUser;
use crate::error::{ApiError, Result};
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::Json;
use cmp_domain::entities::wallet::{LedgerEntry, Wallet};
use cmp_store::repositories::{org, wallet as wallet_repo};
use cmp_store::StoreError;
use serde::Deserialize;
use uuid::Uuid;

async fn membership_role(state: &AppState, org_id: Uuid, user_id: &str) -> Result<cmp_domain::entities::org::Role> {
    let membership = org::find_membership(state.db.pool(), org_id, user_id)
        .await?
        .ok_or(ApiError::Forbidden)?;
    Ok(membership.role)
}

pub async fn get_my_wallet(State(state): State<AppState>, auth: AuthUser) -> Result<Json<Wallet>> {
    let org = org::find_owned_org(state.db.pool(), &auth.user_id)
        .await?
        .ok_or_else(|| ApiError::Store(StoreError::NotFound("no workspace for user".to_string())))?;
    let wallet = wallet_repo::find_wallet_by_org(state.db.pool(), org.id)
        .await?
        .ok_or_else(|| ApiError::Store(StoreError::NotFound(format!("wallet for org {}", org.id))))?;
    Ok(Json(wallet))
}

pub async fn get_my_ledger(State(state): State<AppState>, auth: AuthUser) -> Result<Json<Vec<LedgerEntry>>> {
    let org = org::find_owned_org(state.db.pool(), &auth.user_id)
        .await?
        .ok_or_else(|| ApiError::Store(StoreError::NotFound("no workspace for user".to_string())))?;
    let wallet = wallet_repo::find_wallet_by_org(state.db.pool(), org.id)
        .await?
        .ok_or_else(|| ApiError::Store(StoreError::NotFound(format!("wallet for org {}", org.id))))?;
    Ok(Json(wallet_repo::list_ledger_for_wallet(state.db.pool(), wallet.id).await?))
}

pub async fn get_wallet(State(state): State<AppState>, auth: AuthUser, Path(id): Path<Uuid>) -> Result<Json<Wallet>> {
    let wallet = wallet_repo::find_wallet_by_id(state.db.pool(), id)
        .await?
        .ok_or_else(|| ApiError::Store(StoreError::NotFound(format!("wallet {id}"))))?;
    membership_role(&state, wallet.org_id, &auth.user_id).await?;
    Ok(Json(wallet))
}

#[derive(Debug, Deserialize)]
pub struct TopupBody {
    pub credits_amount: i64,
    pub idempotency_key: String,
}

pub async fn create_topup(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<TopupBody>,
) -> Result<Json<Wallet>> {
    let wallet = wallet_repo::find_wallet_by_id(state.db.pool(), id)
        .await?
        .ok_or_else(|| ApiError::Store(StoreError::NotFound(format!("wallet {id}"))))?;
    let role = membership_role(&state, wallet.org_id, &auth.user_id).await?;
    if !role.can_manage_wallet() {
        return Err(ApiError::Forbidden);
    }
    let updated = cmp_store::billing::wallet_topup(&state.db, id, body.credits_amount, &body.idempotency_key).await?;
    Ok(Json(updated))
}
