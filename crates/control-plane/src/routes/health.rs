use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use cmp_store::health::HealthMonitor;
use serde_json::{json, Value};

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn ready(State(state): State<AppState>) -> Json<Value> {
    let report = HealthMonitor::new(&state.db).check().await;
    Json(json!({ "status": if report.database_reachable { "ok" } else { "degraded" }, "database": report }))
}
