//! Commerce webhook ingestion (§4.2).

use crate::error::{ProvisionerError, Result};
use crate::hmac_verify;
use crate::state::AppState;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use cmp_client::types::{AddCreditsRequest, ProvisionInstanceRequest};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;

static CREDIT_PACK_SKU: Lazy<Regex> = Lazy::new(|| Regex::new(r"^CREDITS-(\d+)$").unwrap());

const SIGNATURE_HEADER: &str = "x-webhook-signature";

#[derive(Debug, Deserialize)]
pub struct OrderLineItem {
    pub sku: String,
    pub quantity: i64,
    pub product_name: String,
    pub product_id: String,
    pub variant_id: String,
}

#[derive(Debug, Deserialize)]
pub struct OrderPaidEvent {
    pub order_id: String,
    pub customer_email: String,
    pub line_items: Vec<OrderLineItem>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LineOutcome {
    AlreadyProcessed,
    CreditsAdded { wallet_id: uuid::Uuid, new_balance: i64 },
    Provisioned { instance_id: uuid::Uuid, api_key_prefix: Option<String> },
    Failed { error: String },
}

pub async fn order_paid(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Vec<LineOutcome>>> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if !hmac_verify::verify(&state.config.webhook_secret, &body, signature) {
        return Err(ProvisionerError::InvalidSignature);
    }

    let event: OrderPaidEvent =
        serde_json::from_slice(&body).map_err(|e| ProvisionerError::Validation(e.to_string()))?;

    if state.idempotency.check_and_record("order_paid", &event.order_id) {
        tracing::debug!(order_id = %event.order_id, "order-paid already processed, short-circuiting");
        return Ok(Json(vec![LineOutcome::AlreadyProcessed]));
    }

    let mut outcomes = Vec::with_capacity(event.line_items.len());
    for line in &event.line_items {
        outcomes.push(process_line(&state, &event.order_id, &event.customer_email, line).await);
    }
    Ok(Json(outcomes))
}

async fn process_line(state: &AppState, order_id: &str, customer_email: &str, line: &OrderLineItem) -> LineOutcome {
    if let Some(captures) = CREDIT_PACK_SKU.captures(&line.sku) {
        let per_unit: i64 = captures[1].parse().unwrap_or(0);
        let req = AddCreditsRequest {
            order_id: order_id.to_string(),
            user_email: customer_email.to_string(),
            credit_amount: per_unit * line.quantity,
        };
        return match state.control_plane.add_credits(&req).await {
            Ok(resp) => LineOutcome::CreditsAdded {
                wallet_id: resp.wallet_id,
                new_balance: resp.new_balance,
            },
            Err(e) => LineOutcome::Failed { error: e.to_string() },
        };
    }

    let req = ProvisionInstanceRequest {
        order_id: order_id.to_string(),
        user_email: customer_email.to_string(),
        offering_id: line.product_id.clone(),
        plan_id: line.variant_id.clone(),
        metadata: json!({ "product_name": line.product_name, "cp_offering_id": line.product_id }),
    };
    match state.control_plane.provision_instance(&req).await {
        Ok(resp) => LineOutcome::Provisioned {
            instance_id: resp.instance_id,
            api_key_prefix: resp.api_key.as_deref().map(cmp_domain::api_key::prefix_of),
        },
        Err(e) => LineOutcome::Failed { error: e.to_string() },
    }
}
