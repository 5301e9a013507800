mod health;
mod runs;
mod widget;

use crate::state::AppState;
use axum::routing::{get, post};
use axum::Router;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/v1/runs", post(runs::create_run))
        .route("/v1/widget/session:init", post(widget::init_session))
        .with_state(state)
}
