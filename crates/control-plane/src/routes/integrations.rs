//! Commerce integration surface (§4.1.3, §4.1.4). Open, service-to-service —
//! reached by the Provisioner and by operators replaying a normalized
//! order-paid event directly against the Control Plane.

use crate::error::Result;
use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use cmp_store::billing::{self, AddCreditsResult, ProvisionInstanceRequest, ProvisionResult};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;

static CREDIT_PACK_SKU: Lazy<Regex> = Lazy::new(|| Regex::new(r"^CREDITS-(\d+)$").unwrap());

#[derive(Debug, Deserialize)]
pub struct ProvisionBody {
    pub order_id: String,
    pub user_email: String,
    pub offering_id: String,
    pub plan_id: String,
    #[serde(default = "empty_metadata")]
    pub metadata: serde_json::Value,
}

fn empty_metadata() -> serde_json::Value {
    json!({})
}

pub async fn provision(State(state): State<AppState>, Json(body): Json<ProvisionBody>) -> Result<Json<ProvisionResult>> {
    let result = billing::provision_instance(
        &state.db,
        ProvisionInstanceRequest {
            order_id: body.order_id,
            user_email: body.user_email,
            offering_id: body.offering_id,
            plan_id: body.plan_id,
            metadata: body.metadata,
        },
    )
    .await?;
    Ok(Json(result))
}

#[derive(Debug, Deserialize)]
pub struct AddCreditsBody {
    pub order_id: String,
    pub user_email: String,
    pub credit_amount: i64,
}

pub async fn add_credits(State(state): State<AppState>, Json(body): Json<AddCreditsBody>) -> Result<Json<AddCreditsResult>> {
    let result = billing::add_credits(&state.db, &body.order_id, &body.user_email, body.credit_amount).await?;
    Ok(Json(result))
}

#[derive(Debug, Deserialize)]
pub struct OrderLineItem {
    pub sku: String,
    pub quantity: i64,
    pub product_name: String,
    pub product_id: String,
    pub variant_id: String,
}

#[derive(Debug, Deserialize)]
pub struct OrderPaidBody {
    pub order_id: String,
    pub customer_email: String,
    pub line_items: Vec<OrderLineItem>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LineOutcome {
    CreditsAdded { wallet_id: uuid::Uuid, new_balance: i64 },
    Provisioned { instance_id: uuid::Uuid, api_key_prefix: Option<String> },
    Failed { error: String },
}

/// Classifies each line item per §4.2 step 3 and dispatches it. One failing
/// line does not abort the others.
pub async fn order_paid(State(state): State<AppState>, Json(body): Json<OrderPaidBody>) -> Result<Json<Vec<LineOutcome>>> {
    let mut outcomes = Vec::with_capacity(body.line_items.len());
    for line in &body.line_items {
        let outcome = if let Some(captures) = CREDIT_PACK_SKU.captures(&line.sku) {
            let per_unit: i64 = captures[1].parse().unwrap_or(0);
            match billing::add_credits(&state.db, &body.order_id, &body.customer_email, per_unit * line.quantity).await {
                Ok(result) => LineOutcome::CreditsAdded {
                    wallet_id: result.wallet_id,
                    new_balance: result.new_balance,
                },
                Err(e) => LineOutcome::Failed { error: e.to_string() },
            }
        } else {
            let metadata = json!({
                "product_name": line.product_name,
                "cp_offering_id": line.product_id,
            });
            match billing::provision_instance(
                &state.db,
                ProvisionInstanceRequest {
                    order_id: body.order_id.clone(),
                    user_email: body.customer_email.clone(),
                    offering_id: line.product_id.clone(),
                    plan_id: line.variant_id.clone(),
                    metadata,
                },
            )
            .await
            {
                Ok(result) => LineOutcome::Provisioned {
                    instance_id: result.instance_id,
                    api_key_prefix: result.api_key.as_deref().map(cmp_domain::api_key::prefix_of),
                },
                Err(e) => LineOutcome::Failed { error: e.to_string() },
            }
        };
        outcomes.push(outcome);
    }
    Ok(Json(outcomes))
}
