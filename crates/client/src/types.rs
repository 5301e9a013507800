//! Wire DTOs for the Control Plane's service-to-service endpoints (§6).
//! These mirror `cmp_store::billing`'s request/result types but live here
//! so the SDK has no compile-time dependency on the store crate.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct AuthorizeRequest {
    pub instance_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_budget: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthorizeResponse {
    pub allowed: bool,
    pub reservation_id: Uuid,
    pub budget: i64,
    pub balance: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SettleRequest {
    pub reservation_id: Uuid,
    pub instance_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<cmp_domain::pricing::Usage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SettleResponse {
    pub debited: i64,
    pub balance: i64,
    pub ledger_entry_id: Uuid,
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProvisionInstanceRequest {
    pub order_id: String,
    pub user_email: String,
    pub offering_id: String,
    pub plan_id: String,
    pub metadata: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProvisionInstanceResponse {
    pub instance_id: Uuid,
    pub api_key: Option<String>,
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddCreditsRequest {
    pub order_id: String,
    pub user_email: String,
    pub credit_amount: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddCreditsResponse {
    pub wallet_id: Uuid,
    pub credits_added: i64,
    pub new_balance: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ValidateApiKeyResponse {
    pub instance_id: Uuid,
    pub org_id: Uuid,
    pub project_id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConnectorBindingResponse {
    pub id: Uuid,
    pub org_id: Uuid,
    pub project_id: Uuid,
    pub connector_id: String,
    pub connector_type: String,
    pub secret_path: String,
    #[serde(default)]
    pub config: serde_json::Value,
    pub status: String,
}

impl ConnectorBindingResponse {
    pub fn enabled(&self) -> bool {
        self.status == "ACTIVE"
    }
}
