//! Service-to-service billing endpoints (§4.1.1, §4.1.2). Open — these are
//! called by the Gateway and Provisioner over the internal network, not
//! end users, so no bearer auth is required here.

use crate::error::Result;
use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use cmp_domain::pricing::Usage;
use cmp_store::billing;
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct AuthorizeBody {
    pub instance_id: Uuid,
    pub requested_budget: Option<i64>,
}

pub async fn authorize(State(state): State<AppState>, Json(body): Json<AuthorizeBody>) -> Result<Json<billing::AuthorizeResult>> {
    let result = billing::authorize(&state.db, body.instance_id, body.requested_budget).await?;
    Ok(Json(result))
}

#[derive(Debug, Deserialize)]
pub struct SettleBody {
    pub reservation_id: Uuid,
    pub instance_id: Uuid,
    pub usage: Option<Usage>,
}

pub async fn settle(State(state): State<AppState>, Json(body): Json<SettleBody>) -> Result<Json<billing::SettleResult>> {
    let result = billing::settle(&state.db, body.reservation_id, body.instance_id, body.usage).await?;
    Ok(Json(result))
}
