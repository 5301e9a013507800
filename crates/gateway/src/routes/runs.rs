//! `POST /v1/runs` (§4.3). Authorize → execute → settle.

use crate::auth::AuthContext;
use crate::error::{ApiError, Result};
use crate::metering;
use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use cmp_domain::pricing::Usage;
use cmp_domain::DEFAULT_RUN_BUDGET;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Instant;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct RunRequest {
    /// Required when authenticating with a bearer token; an API key is
    /// already instance-scoped and this field is ignored in that case.
    pub instance_id: Option<Uuid>,
    #[serde(default = "default_input")]
    pub input: Value,
    #[serde(default = "default_input")]
    pub metadata: Value,
}

fn default_input() -> Value {
    json!({})
}

#[derive(Debug, Serialize)]
pub struct BillingInfo {
    pub debited: i64,
    pub balance: i64,
}

#[derive(Debug, Serialize)]
pub struct RunResponse {
    pub run_id: Uuid,
    pub output: Value,
    pub usage: Usage,
    pub billing: BillingInfo,
}

pub async fn create_run(State(state): State<AppState>, auth: AuthContext, Json(body): Json<RunRequest>) -> Result<Json<RunResponse>> {
    let instance_id = match &auth {
        AuthContext::ApiKey(ctx) => ctx.instance_id,
        AuthContext::User(_) => body
            .instance_id
            .ok_or_else(|| ApiError::Validation("instance_id is required".to_string()))?,
    };

    let run_id = Uuid::new_v4();
    let started = Instant::now();

    let auth_result = state
        .control_plane
        .authorize(instance_id, Some(DEFAULT_RUN_BUDGET))
        .await?;

    if !auth_result.allowed {
        return Err(ApiError::InsufficientCredits);
    }

    let run_outcome = state.runner.execute(instance_id, &body.input, &body.metadata).await;

    let run_output = match run_outcome {
        Ok(output) => output,
        Err(e) => {
            if let Err(settle_err) = state.control_plane.settle(auth_result.reservation_id, instance_id, None).await {
                tracing::error!(error = %settle_err, "failed to release reservation after run failure");
            }
            return Err(e.into());
        }
    };

    let duration_ms = started.elapsed().as_millis() as u64;

    let billing = match state
        .control_plane
        .settle(auth_result.reservation_id, instance_id, Some(run_output.usage.clone()))
        .await
    {
        Ok(settle) => BillingInfo {
            debited: settle.debited,
            balance: settle.balance,
        },
        Err(e) => {
            tracing::error!(error = %e, "settle failed after successful run, surfacing debited=0");
            BillingInfo {
                debited: 0,
                balance: auth_result.balance,
            }
        }
    };

    metering::log_run(instance_id, None, &run_id.to_string(), &run_output.usage, billing.debited, duration_ms, "success");

    Ok(Json(RunResponse {
        run_id,
        output: run_output.output,
        usage: run_output.usage,
        billing,
    }))
}
