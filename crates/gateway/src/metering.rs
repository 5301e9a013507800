//! Structured per-run usage logging. The Control Plane ledger is the
//! billing source of truth (`settle` already records it); this is an
//! observability trail for operators correlating a run with its debit.

use cmp_domain::pricing::Usage;
use uuid::Uuid;

#[allow(clippy::too_many_arguments)]
pub fn log_run(instance_id: Uuid, org_id: Option<Uuid>, run_id: &str, usage: &Usage, debited: i64, duration_ms: u64, status: &str) {
    tracing::info!(
        instance_id = %instance_id,
        org_id = org_id.map(|o| o.to_string()).unwrap_or_default(),
        run_id,
        llm_tokens_in = usage.llm_tokens_in,
        llm_tokens_out = usage.llm_tokens_out,
        tool_calls = usage.tool_calls,
        requests = usage.requests,
        debited,
        duration_ms,
        status,
        "run completed"
    );
}
