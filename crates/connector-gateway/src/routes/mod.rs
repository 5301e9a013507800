mod connectors;
mod health;

use crate::state::AppState;
use axum::routing::{get, post};
use axum::Router;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/connectors/execute", post(connectors::execute_tool_call))
        .route("/connectors/bindings/:id/validate", get(connectors::validate_binding))
        .with_state(state)
}
